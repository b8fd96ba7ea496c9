use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::comment::Comment;
use super::Record;
use crate::store::StoreKey;

/// A devotional journal entry for one chapter of scripture.
///
/// Fields missing from stored JSON take their defaults, and fields this type
/// does not know about are carried in `extra` so rewriting an entry never
/// loses data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub book: String,
    #[serde(default, deserialize_with = "super::chapter_number")]
    pub chapter: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub highlights: String,
    #[serde(default)]
    pub scripture_analysis: String,
    #[serde(default)]
    pub application_helper: String,
    #[serde(default)]
    pub god_message: String,
    #[serde(default)]
    pub prayer: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JournalEntry {
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        book: impl Into<String>,
        chapter: u32,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            book: book.into(),
            chapter,
            verse: None,
            title: None,
            highlights: String::new(),
            scripture_analysis: String::new(),
            application_helper: String::new(),
            god_message: String::new(),
            prayer: String::new(),
            completed: false,
            likes: 0,
            liked: false,
            comments: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_verse(mut self, verse: impl Into<String>) -> Self {
        self.verse = Some(verse.into());
        self
    }

    pub fn with_highlights(mut self, highlights: impl Into<String>) -> Self {
        self.highlights = highlights.into();
        self
    }

    pub fn with_god_message(mut self, message: impl Into<String>) -> Self {
        self.god_message = message.into();
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// The scripture reference, e.g. `詩篇 23` or `詩篇 23:1-3`.
    pub fn reference(&self) -> String {
        match self.verse.as_deref().filter(|v| !v.is_empty()) {
            Some(verse) => format!("{} {}:{}", self.book, self.chapter, verse),
            None => format!("{} {}", self.book, self.chapter),
        }
    }

    /// The display title: the stored title, or the scripture reference.
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.reference())
    }
}

impl Record for JournalEntry {
    const KEY: StoreKey = StoreKey::JournalEntries;

    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.display_title(), self.date)?;
        writeln!(f, "{}", "=".repeat(30))?;
        writeln!(
            f,
            "Status: {}",
            if self.completed { "completed" } else { "in progress" }
        )?;

        let sections = [
            ("Highlights", &self.highlights),
            ("Scripture analysis", &self.scripture_analysis),
            ("Application", &self.application_helper),
            ("What God is saying", &self.god_message),
            ("Prayer", &self.prayer),
        ];
        for (heading, text) in sections {
            if !text.is_empty() {
                writeln!(f, "\n{}:\n{}", heading, text)?;
            }
        }

        Ok(())
    }
}
