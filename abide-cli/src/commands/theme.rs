use abide_core::store::{dark_mode, set_dark_mode};
use abide_core::FileStore;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct ThemeCommand {
    #[command(subcommand)]
    pub command: ThemeSubcommand,
}

#[derive(Subcommand)]
pub enum ThemeSubcommand {
    /// Show the current theme
    Show,
    /// Switch to dark mode
    Dark,
    /// Switch to light mode
    Light,
}

impl ThemeCommand {
    pub fn run(&self, store: &mut FileStore) -> Result<(), Box<dyn std::error::Error>> {
        let enabled = match self.command {
            ThemeSubcommand::Show => dark_mode(&*store)?,
            ThemeSubcommand::Dark => {
                set_dark_mode(store, true)?;
                true
            }
            ThemeSubcommand::Light => {
                set_dark_mode(store, false)?;
                false
            }
        };
        println!("Theme: {}", if enabled { "dark" } else { "light" });
        Ok(())
    }
}
