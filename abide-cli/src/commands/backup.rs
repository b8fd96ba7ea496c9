use std::fs;
use std::path::PathBuf;

use abide_core::backup::{backup_filename, export_json, import_backup};
use abide_core::FileStore;
use chrono::Local;
use clap::{Args, Subcommand};

use crate::config::Config;

#[derive(Args)]
pub struct BackupCommand {
    #[command(subcommand)]
    pub command: BackupSubcommand,
}

#[derive(Subcommand)]
pub enum BackupSubcommand {
    /// Write every stored key to a backup file
    Export {
        /// Output path (default: abide-backup-<date>.json in the current directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Merge a backup file into the local data
    Import {
        /// Backup file to import
        file: PathBuf,
    },
}

impl BackupCommand {
    pub fn run(&self, store: &mut FileStore, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            BackupSubcommand::Export { output } => {
                let text = export_json(store)?;
                let path = output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(backup_filename(Local::now().date_naive())));
                fs::write(&path, text)?;
                println!("Exported backup to {}", path.display());
                Ok(())
            }

            BackupSubcommand::Import { file } => {
                let text = fs::read_to_string(file)
                    .map_err(|e| format!("Failed to read '{}': {}", file.display(), e))?;

                let _lock = store.lock_import()?;
                let report = import_backup(store, &text, &config.import)?;

                println!("Imported {}", file.display());
                println!();
                for outcome in &report.outcomes {
                    println!("  {:<22} {}", outcome.key.as_str(), outcome.status);
                }

                let failed = report.failed();
                if !failed.is_empty() {
                    let keys: Vec<&str> = failed.iter().map(|(key, _)| key.as_str()).collect();
                    return Err(format!(
                        "Import partially failed; not committed: {}",
                        keys.join(", ")
                    )
                    .into());
                }
                Ok(())
            }
        }
    }
}
