use abide_core::FileStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{
    AiCommand, BackupCommand, ConfigCommand, GraceCommand, JournalCommand, PrayerCommand,
    ProgressCommand, ScriptureCommand, ThemeCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "abide")]
#[command(version)]
#[command(about = "A devotional journal: reading progress, prayers and backups", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export or import a backup of all data
    Backup(BackupCommand),

    /// Write and review journal entries
    Journal(JournalCommand),

    /// Manage the prayer list
    Prayer(PrayerCommand),

    /// Show Bible reading progress
    Progress(ProgressCommand),

    /// Show grace points
    Grace(GraceCommand),

    /// Show or switch the theme
    Theme(ThemeCommand),

    /// Run an AI action directly
    Ai(AiCommand),

    /// Read a chapter of the Bible
    Scripture(ScriptureCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("abide=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Save config path for config init
    let cli_config_path = cli.config.clone();
    let config = Config::load(cli.config)?;
    let mut store = FileStore::new(config.data_dir.value.clone());

    match &cli.command {
        Commands::Backup(cmd) => cmd.run(&mut store, &config),
        Commands::Journal(cmd) => cmd.run(&mut store, &config),
        Commands::Prayer(cmd) => cmd.run(&mut store),
        Commands::Progress(cmd) => cmd.run(&mut store),
        Commands::Grace(cmd) => cmd.run(&store),
        Commands::Theme(cmd) => cmd.run(&mut store),
        Commands::Ai(cmd) => cmd.run(&mut store, &config),
        Commands::Scripture(cmd) => cmd.run(&config),
        Commands::Config(cmd) => cmd.run(&config, cli_config_path),
    }
}
