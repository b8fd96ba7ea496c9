mod ai;
mod backup;
mod config_cmd;
mod journal;
mod prayer;
mod progress;
mod scripture;
mod theme;

pub use ai::AiCommand;
pub use backup::BackupCommand;
pub use config_cmd::ConfigCommand;
pub use journal::JournalCommand;
pub use prayer::PrayerCommand;
pub use progress::{GraceCommand, ProgressCommand};
pub use scripture::ScriptureCommand;
pub use theme::ThemeCommand;

use clap::ValueEnum;
use std::io::{self, Write};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Asks a yes/no question on stdin. Anything but `y` is a no.
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    tokio::runtime::Runtime::new().map_err(|e| format!("Failed to start runtime: {}", e).into())
}
