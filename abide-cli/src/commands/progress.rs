use abide_core::scripture::{Testament, BIBLE_BOOKS};
use abide_core::store::grace_points;
use abide_core::{FileStore, Journal, ProgressMap};
use clap::{Args, Subcommand};

use super::OutputFormat;

#[derive(Args)]
pub struct ProgressCommand {
    #[command(subcommand)]
    pub command: ProgressSubcommand,
}

#[derive(Subcommand)]
pub enum ProgressSubcommand {
    /// Show chapters read, book by book
    Show {
        /// Include books with no chapters read
        #[arg(long)]
        all: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Rebuild progress from completed journal entries
    Rebuild,
}

#[derive(Args)]
pub struct GraceCommand {}

impl ProgressCommand {
    pub fn run(&self, store: &mut FileStore) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ProgressSubcommand::Show { all, format } => {
                let progress = ProgressMap::load(&*store)?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&progress.to_json())?)
                    }
                    OutputFormat::Text => print!("{}", summary(&progress, *all)),
                }
                Ok(())
            }

            ProgressSubcommand::Rebuild => {
                let progress = Journal::new(store).rebuild_progress()?;
                println!(
                    "Rebuilt progress: {} chapter(s) in {} book(s)",
                    progress.total_completed(),
                    progress.books().count()
                );
                Ok(())
            }
        }
    }
}

impl GraceCommand {
    pub fn run(&self, store: &FileStore) -> Result<(), Box<dyn std::error::Error>> {
        println!("Grace points: {}", grace_points(store)?);
        Ok(())
    }
}

/// Renders progress in canonical book order. Books not in the Bible list
/// (legacy names) are listed last.
fn summary(progress: &ProgressMap, all: bool) -> String {
    let total: u32 = BIBLE_BOOKS.iter().map(|b| b.chapters).sum();
    let mut out = String::new();
    let mut testament = None;

    for book in &BIBLE_BOOKS {
        let read = progress.chapters(book.name).count();
        if read == 0 && !all {
            continue;
        }
        if testament != Some(book.testament) {
            testament = Some(book.testament);
            let heading = match book.testament {
                Testament::Old => "Old Testament",
                Testament::New => "New Testament",
            };
            out.push_str(&format!("{}\n", heading));
        }
        out.push_str(&format!("  {:<8} {:>3}/{}\n", book.name, read, book.chapters));
    }

    for name in progress.books() {
        if !BIBLE_BOOKS.iter().any(|b| b.name == name) {
            out.push_str(&format!("  {:<8} {:>3}\n", name, progress.chapters(name).count()));
        }
    }

    out.push_str(&format!(
        "\nTotal: {}/{} chapters\n",
        progress.total_completed(),
        total
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_read_books_in_canonical_order() {
        let mut progress = ProgressMap::new();
        progress.mark("約翰福音", 3);
        progress.mark("創世記", 1);
        progress.mark("創世記", 2);

        let text = summary(&progress, false);
        let genesis = text.find("創世記").unwrap();
        let john = text.find("約翰福音").unwrap();
        assert!(genesis < john);
        assert!(text.contains("  2/50"));
        assert!(text.contains("Total: 3/1189 chapters"));
        assert!(!text.contains("出埃及記"));
    }

    #[test]
    fn test_summary_all_includes_unread_books() {
        let text = summary(&ProgressMap::new(), true);
        assert!(text.contains("出埃及記"));
        assert!(text.contains("Old Testament"));
        assert!(text.contains("New Testament"));
    }

    #[test]
    fn test_unknown_book_names_are_kept() {
        let mut progress = ProgressMap::new();
        progress.mark("Psalm", 1);
        assert!(summary(&progress, false).contains("Psalm"));
    }
}
