use abide_core::models::today;
use abide_core::{
    Collection, FileStore, IdGenerator, ListQuery, PrayerItem, Selection, SortOrder, UuidIds,
};
use clap::{Args, Subcommand};

use super::{confirm, OutputFormat};

#[derive(Args)]
pub struct PrayerCommand {
    #[command(subcommand)]
    pub command: PrayerSubcommand,
}

#[derive(Subcommand)]
pub enum PrayerSubcommand {
    /// Add an item to the prayer list
    Add {
        /// What to pray for
        title: String,

        /// Who the prayer is for
        #[arg(long, short, default_value = "")]
        person: String,

        /// Details
        #[arg(long)]
        content: Option<String>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// List prayer items
    List {
        /// Only show items containing this text
        #[arg(long, short)]
        search: Option<String>,

        /// Show oldest items first
        #[arg(long)]
        oldest_first: bool,

        /// Hide answered prayers
        #[arg(long)]
        unanswered: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Record that a prayer was answered
    Answer {
        /// Prayer item ID
        id: String,

        /// How God answered
        #[arg(long)]
        response: Option<String>,

        /// Date answered (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Delete prayer items
    Delete {
        /// Prayer item IDs
        ids: Vec<String>,

        /// Select every item matching the search (or every item without one)
        #[arg(long)]
        all: bool,

        /// Restrict --all to items containing this text
        #[arg(long, short)]
        search: Option<String>,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

impl PrayerCommand {
    pub fn run(&self, store: &mut FileStore) -> Result<(), Box<dyn std::error::Error>> {
        let mut prayers = Collection::<_, PrayerItem>::new(store);

        match &self.command {
            PrayerSubcommand::Add {
                title,
                person,
                content,
                date,
            } => {
                let date = date.clone().unwrap_or_else(today);
                let mut item = PrayerItem::new(UuidIds.next_id(), title.as_str(), person.as_str(), date);
                if let Some(c) = content {
                    item = item.with_content(c);
                }
                prayers.upsert(&item)?;

                println!("Added prayer item {}", item.id);
                Ok(())
            }

            PrayerSubcommand::List {
                search,
                oldest_first,
                unanswered,
                format,
            } => {
                let mut items = query(search, *oldest_first).apply(prayers.list()?);
                if *unanswered {
                    items.retain(|item| !item.answered);
                }

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
                    OutputFormat::Text => {
                        if items.is_empty() {
                            println!("No prayer items found.");
                        }
                        for item in &items {
                            let mark = if item.answered { "x" } else { " " };
                            println!("[{}] {}  {}  {}", mark, item.prayer_date, item.title, item.id);
                        }
                    }
                }
                Ok(())
            }

            PrayerSubcommand::Answer { id, response, date } => {
                let date = date.clone().unwrap_or_else(today);
                let found = prayers.update(id, |item| item.mark_answered(date, response.clone()))?;
                if !found {
                    return Err(format!("Prayer item not found: {}", id).into());
                }
                println!("Marked {} answered", id);
                Ok(())
            }

            PrayerSubcommand::Delete {
                ids,
                all,
                search,
                yes,
            } => {
                let mut selection = Selection::new();
                for id in ids {
                    selection.select(id.as_str());
                }
                if *all {
                    let visible = query(search, false).apply(prayers.list()?);
                    selection.select_all(visible.into_iter().map(|item| item.id));
                }

                if selection.is_empty() {
                    return Err("No prayer items selected".into());
                }

                if !yes {
                    let prompt = format!("Delete {} prayer item(s)?", selection.len());
                    if !confirm(&prompt)? {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                let removed = prayers.delete_many(selection.ids())?;
                println!("Deleted {} prayer item(s)", removed);
                Ok(())
            }
        }
    }
}

fn query(search: &Option<String>, oldest_first: bool) -> ListQuery {
    let mut query = ListQuery::new();
    if let Some(term) = search {
        query = query.with_search(term.as_str());
    }
    if oldest_first {
        query = query.with_order(SortOrder::OldestFirst);
    }
    query
}
