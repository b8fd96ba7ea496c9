use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::{Config, ConfigValue};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# abide configuration

# Directory holding the journal data (default: ~/.local/share/abide)
# data_dir: ~/.local/share/abide

# AI features need a Gemini API key (or set GEMINI_API_KEY)
# ai:
#   api_key: your-key
#   model: gemini-2.5-flash

# Bible text lookup
# scripture:
#   version: nstrunv
#   base_url: https://bible.fhl.net/qb.php

# How backups are merged on import
# import:
#   records: append_only        # or last_writer_wins
#   grace_points: additive      # or overwrite
#   overrides:
#     prayerItems: last_writer_wins
"#;

fn print_value<T: std::fmt::Display>(name: &str, value: &ConfigValue<T>) {
    println!("{}: {}", name, value.value);
    println!("  source: {}", value.source);
}

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("data_dir: {}", config.data_dir.value.display());
                        println!("  source: {}", config.data_dir.source);
                        println!();

                        let key = if config.ai.api_key.value.is_some() {
                            "********"
                        } else {
                            "(not set, AI features unavailable)"
                        };
                        println!("ai.api_key: {}", key);
                        println!("  source: {}", config.ai.api_key.source);
                        print_value("ai.model", &config.ai.model);
                        println!();

                        print_value("scripture.version", &config.scripture.version);
                        print_value("scripture.base_url", &config.scripture.base_url);
                        println!();

                        println!("import.records: {:?}", config.import.records);
                        println!("import.grace_points: {:?}", config.import.grace_points);
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = config_path.unwrap_or_else(Config::default_config_path);

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'abide config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}
