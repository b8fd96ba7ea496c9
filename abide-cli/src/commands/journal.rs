use abide_core::ai::{AiAction, AiOutput, AiService, TextGenerator};
use abide_core::models::today;
use abide_core::{
    find_book, EntryText, FileStore, IdGenerator, Journal, JournalEntry, ListQuery, SortOrder,
    UuidIds,
};
use clap::{Args, Subcommand, ValueEnum};
use serde_json::json;

use super::{confirm, runtime, OutputFormat};
use crate::commands::ai::ai_service;
use crate::config::Config;

#[derive(Args)]
pub struct JournalCommand {
    #[command(subcommand)]
    pub command: JournalSubcommand,
}

#[derive(Subcommand)]
pub enum JournalSubcommand {
    /// Start a journal entry for a chapter
    Add {
        /// Book name (e.g. 詩篇, 詩, Psalms)
        book: String,

        /// Chapter number
        chapter: u32,

        /// Verse range within the chapter (e.g. 1-6)
        #[arg(long)]
        verse: Option<String>,

        /// Entry title (defaults to the scripture reference)
        #[arg(long)]
        title: Option<String>,

        /// What stood out while reading
        #[arg(long)]
        highlights: Option<String>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Mark the entry completed right away
        #[arg(long)]
        completed: bool,
    },

    /// List journal entries
    List {
        /// Only show entries containing this text
        #[arg(long, short)]
        search: Option<String>,

        /// Show oldest entries first
        #[arg(long)]
        oldest_first: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one entry
    Show {
        /// Entry ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Edit an entry's text
    Edit {
        /// Entry ID
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        highlights: Option<String>,

        #[arg(long)]
        analysis: Option<String>,

        #[arg(long)]
        application: Option<String>,

        #[arg(long)]
        god_message: Option<String>,

        #[arg(long)]
        prayer: Option<String>,
    },

    /// Mark an entry completed
    Complete {
        /// Entry ID
        id: String,
    },

    /// Mark a completed entry as in progress again
    Reopen {
        /// Entry ID
        id: String,
    },

    /// Delete one or more entries
    Delete {
        /// Entry IDs
        #[arg(required = true)]
        ids: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Fill in a section of an entry with generated text
    Generate {
        /// Entry ID
        id: String,

        /// Section to generate
        #[arg(value_enum)]
        section: GeneratedSection,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GeneratedSection {
    Analysis,
    Application,
    Prayer,
}

impl GeneratedSection {
    fn action(self) -> AiAction {
        match self {
            GeneratedSection::Analysis => AiAction::ScriptureAnalysis,
            GeneratedSection::Application => AiAction::ApplicationHelper,
            GeneratedSection::Prayer => AiAction::SituationalPrayer,
        }
    }

    fn field(self) -> EntryText {
        match self {
            GeneratedSection::Analysis => EntryText::ScriptureAnalysis,
            GeneratedSection::Application => EntryText::ApplicationHelper,
            GeneratedSection::Prayer => EntryText::Prayer,
        }
    }

    /// Prayers are written from the entry's highlights, the rest from the passage.
    fn payload(self, entry: &JournalEntry) -> serde_json::Value {
        match self {
            GeneratedSection::Prayer => json!({ "highlights": entry.highlights }),
            _ => json!({ "book": entry.book, "chapter": entry.chapter }),
        }
    }
}

impl JournalCommand {
    pub fn run(&self, store: &mut FileStore, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            JournalSubcommand::Add {
                book,
                chapter,
                verse,
                title,
                highlights,
                date,
                completed,
            } => {
                let book = find_book(book).ok_or_else(|| format!("Unknown book: {}", book))?;
                if !book.has_chapter(*chapter) {
                    return Err(format!(
                        "{} has {} chapters; {} is out of range",
                        book.name, book.chapters, chapter
                    )
                    .into());
                }

                let date = date.clone().unwrap_or_else(today);
                let mut entry = JournalEntry::new(UuidIds.next_id(), date, book.name, *chapter)
                    .completed(*completed);
                entry.verse = verse.clone();
                entry.title = title.clone();
                if let Some(h) = highlights {
                    entry = entry.with_highlights(h);
                }

                Journal::new(store).save(&entry)?;

                println!("Created journal entry:");
                println!();
                print_entry_line(&entry);
                Ok(())
            }

            JournalSubcommand::List {
                search,
                oldest_first,
                format,
            } => {
                let mut query = ListQuery::new();
                if let Some(term) = search {
                    query = query.with_search(term.as_str());
                }
                if *oldest_first {
                    query = query.with_order(SortOrder::OldestFirst);
                }

                let entries = query.apply(Journal::new(store).entries()?);
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&entries)?);
                    }
                    OutputFormat::Text => {
                        if entries.is_empty() {
                            println!("No journal entries found.");
                        } else {
                            for entry in &entries {
                                print_entry_line(entry);
                            }
                        }
                    }
                }
                Ok(())
            }

            JournalSubcommand::Show { id, format } => {
                let entry = Journal::new(store)
                    .get(id)?
                    .ok_or_else(|| format!("Journal entry not found: {}", id))?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entry)?),
                    OutputFormat::Text => print!("{}", entry),
                }
                Ok(())
            }

            JournalSubcommand::Edit {
                id,
                title,
                highlights,
                analysis,
                application,
                god_message,
                prayer,
            } => {
                let mut journal = Journal::new(store);
                let mut entry = journal
                    .get(id)?
                    .ok_or_else(|| format!("Journal entry not found: {}", id))?;

                if let Some(t) = title {
                    entry.title = Some(t.clone());
                }
                let edits = [
                    (highlights, &mut entry.highlights),
                    (analysis, &mut entry.scripture_analysis),
                    (application, &mut entry.application_helper),
                    (god_message, &mut entry.god_message),
                    (prayer, &mut entry.prayer),
                ];
                for (value, field) in edits {
                    if let Some(v) = value {
                        *field = v.clone();
                    }
                }

                journal.save(&entry)?;
                println!("Updated journal entry {}", entry.id);
                Ok(())
            }

            JournalSubcommand::Complete { id } => set_completed(store, id, true),
            JournalSubcommand::Reopen { id } => set_completed(store, id, false),

            JournalSubcommand::Delete { ids, yes } => {
                if !yes {
                    let prompt = format!("Delete {} journal entr{}?", ids.len(), plural_y(ids.len()));
                    if !confirm(&prompt)? {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                let removed = Journal::new(store).delete_many(ids)?;
                println!("Deleted {} journal entr{}", removed, plural_y(removed));
                Ok(())
            }

            JournalSubcommand::Generate { id, section } => {
                let entry = Journal::new(store)
                    .get(id)?
                    .ok_or_else(|| format!("Journal entry not found: {}", id))?;

                let service = ai_service(config);
                let text = runtime()?.block_on(generate(&service, *section, &entry))?;
                let Some(text) = text else {
                    println!("{}", abide_core::ai::UNAVAILABLE_MESSAGE);
                    return Ok(());
                };

                if Journal::new(store).attach_text(id, section.field(), text.as_str())? {
                    println!("{}", text);
                } else {
                    println!("Entry {} was deleted; generated text discarded.", id);
                }
                Ok(())
            }
        }
    }
}

/// Runs the section's action for `entry`. `None` when AI is unavailable.
async fn generate<G: TextGenerator>(
    service: &AiService<G>,
    section: GeneratedSection,
    entry: &JournalEntry,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    if !service.is_available() {
        return Ok(None);
    }
    match service.run(section.action(), &section.payload(entry)).await? {
        AiOutput::Text(text) => Ok(Some(text)),
        other => Ok(Some(other.to_string())),
    }
}

fn set_completed(
    store: &mut FileStore,
    id: &str,
    completed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !Journal::new(store).set_completed(id, completed)? {
        return Err(format!("Journal entry not found: {}", id).into());
    }
    let grace = abide_core::store::grace_points(&*store)?;
    if completed {
        println!("Completed {} (grace points: {})", id, grace);
    } else {
        println!("Reopened {} (grace points: {})", id, grace);
    }
    Ok(())
}

fn print_entry_line(entry: &JournalEntry) {
    let status = if entry.completed { "x" } else { " " };
    println!(
        "[{}] {}  {}  {}",
        status,
        entry.date,
        entry.display_title(),
        entry.id
    );
}

fn plural_y(n: usize) -> &'static str {
    if n == 1 {
        "y"
    } else {
        "ies"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prayer_section_uses_highlights() {
        let entry = JournalEntry::new("j1", "2025-01-01", "詩篇", 23).with_highlights("牧者");
        let payload = GeneratedSection::Prayer.payload(&entry);
        assert_eq!(payload, json!({"highlights": "牧者"}));
        assert_eq!(GeneratedSection::Prayer.action(), AiAction::SituationalPrayer);
    }

    #[test]
    fn test_analysis_section_uses_passage() {
        let entry = JournalEntry::new("j1", "2025-01-01", "詩篇", 23);
        let payload = GeneratedSection::Analysis.payload(&entry);
        assert_eq!(payload, json!({"book": "詩篇", "chapter": 23}));
    }

    #[test]
    fn test_generate_without_generator_is_none() {
        let service = AiService::<abide_core::GeminiClient>::unavailable();
        let entry = JournalEntry::new("j1", "2025-01-01", "詩篇", 23);
        let rt = tokio::runtime::Runtime::new().unwrap();
        let text = rt
            .block_on(generate(&service, GeneratedSection::Analysis, &entry))
            .unwrap();
        assert!(text.is_none());
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural_y(1), "y");
        assert_eq!(plural_y(3), "ies");
    }
}
