//! Bible reading progress: which chapters of which books are completed.
//!
//! Stored under `bibleTrackerProgress` as `{"<book>": {"<chapter>": true}}`.
//! Only completed chapters are kept, and a book with no completed chapters
//! has no entry at all.

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::models::JournalEntry;
use crate::store::{KeyValueStore, StoreError, StoreKey};

/// Completed chapters per book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressMap {
    books: BTreeMap<String, BTreeSet<u32>>,
}

impl ProgressMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from stored JSON, keeping only chapters marked `true`.
    ///
    /// Anything that is not an object of objects of booleans is ignored.
    pub fn from_json(value: &Value) -> Self {
        let mut map = Self::new();
        map.apply_json(value);
        map
    }

    /// Builds the map implied by the completed entries of a journal.
    pub fn derive<'a>(entries: impl IntoIterator<Item = &'a JournalEntry>) -> Self {
        let mut map = Self::new();
        for entry in entries.into_iter().filter(|e| e.completed) {
            map.mark(&entry.book, entry.chapter);
        }
        map
    }

    /// Loads the map from the store. A missing key is an empty map.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(store
            .get_json(StoreKey::BibleTrackerProgress)?
            .map(|value| Self::from_json(&value))
            .unwrap_or_default())
    }

    /// Writes the map to the store.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.set_json(StoreKey::BibleTrackerProgress, &self.to_json())
    }

    /// Marks a chapter completed. Returns true if it was not already.
    pub fn mark(&mut self, book: &str, chapter: u32) -> bool {
        if book.is_empty() || chapter == 0 {
            return false;
        }
        self.books
            .entry(book.to_string())
            .or_default()
            .insert(chapter)
    }

    /// Clears a chapter. Returns true if it was marked.
    ///
    /// Clearing the last chapter of a book removes the book.
    pub fn unmark(&mut self, book: &str, chapter: u32) -> bool {
        let Some(chapters) = self.books.get_mut(book) else {
            return false;
        };
        let removed = chapters.remove(&chapter);
        if chapters.is_empty() {
            self.books.remove(book);
        }
        removed
    }

    pub fn is_completed(&self, book: &str, chapter: u32) -> bool {
        self.books
            .get(book)
            .is_some_and(|chapters| chapters.contains(&chapter))
    }

    /// Completed chapters of `book`, ascending.
    pub fn chapters(&self, book: &str) -> impl Iterator<Item = u32> + '_ {
        self.books.get(book).into_iter().flatten().copied()
    }

    /// Books with at least one completed chapter.
    pub fn books(&self) -> impl Iterator<Item = &str> {
        self.books.keys().map(String::as_str)
    }

    pub fn contains_book(&self, book: &str) -> bool {
        self.books.contains_key(book)
    }

    /// Total completed chapters across all books.
    pub fn total_completed(&self) -> usize {
        self.books.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Applies an imported progress object on top of this map.
    ///
    /// Imported booleans win for the chapters they name: `true` marks the
    /// chapter, `false` clears it. Chapters the import does not mention are
    /// left alone. Returns true if the map changed.
    pub fn apply_json(&mut self, imported: &Value) -> bool {
        let Some(books) = imported.as_object() else {
            return false;
        };

        let mut changed = false;
        for (book, chapters) in books {
            let Some(chapters) = chapters.as_object() else {
                continue;
            };
            for (chapter, done) in chapters {
                let (Some(chapter), Some(done)) = (parse_chapter(chapter), done.as_bool()) else {
                    continue;
                };
                changed |= if done {
                    self.mark(book, chapter)
                } else {
                    self.unmark(book, chapter)
                };
            }
        }
        changed
    }

    /// The stored JSON form.
    pub fn to_json(&self) -> Value {
        let books = self
            .books
            .iter()
            .map(|(book, chapters)| {
                let chapters = chapters
                    .iter()
                    .map(|chapter| (chapter.to_string(), Value::Bool(true)))
                    .collect();
                (book.clone(), Value::Object(chapters))
            })
            .collect();
        Value::Object(books)
    }
}

impl Serialize for ProgressMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.books.len()))?;
        for (book, chapters) in &self.books {
            let chapters: BTreeMap<String, bool> =
                chapters.iter().map(|c| (c.to_string(), true)).collect();
            map.serialize_entry(book, &chapters)?;
        }
        map.end()
    }
}

fn parse_chapter(key: &str) -> Option<u32> {
    key.trim().parse::<u32>().ok().filter(|&chapter| chapter > 0)
}
