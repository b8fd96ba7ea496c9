//! Journal entries and the bookkeeping driven by their completion.
//!
//! Completing an entry marks its chapter in the progress map and earns one
//! grace point. Un-completing or deleting a completed entry gives the point
//! back (never below zero) and clears the chapter, unless another completed
//! entry still covers the same chapter.

use thiserror::Error;

use crate::collection::{Collection, CollectionError};
use crate::models::JournalEntry;
use crate::progress::ProgressMap;
use crate::store::{self, KeyValueStore, StoreError};

#[derive(Debug, Error)]
pub enum JournalError {
    #[error(transparent)]
    Collection(#[from] CollectionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Entries could not be read: {}; progress left unchanged", .0.join(", "))]
    Undecodable(Vec<String>),
}

/// A generated text field of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryText {
    Highlights,
    ScriptureAnalysis,
    ApplicationHelper,
    GodMessage,
    Prayer,
}

impl EntryText {
    fn field_mut(self, entry: &mut JournalEntry) -> &mut String {
        match self {
            EntryText::Highlights => &mut entry.highlights,
            EntryText::ScriptureAnalysis => &mut entry.scripture_analysis,
            EntryText::ApplicationHelper => &mut entry.application_helper,
            EntryText::GodMessage => &mut entry.god_message,
            EntryText::Prayer => &mut entry.prayer,
        }
    }
}

/// Journal operations over a store.
pub struct Journal<'a, S: ?Sized> {
    store: &'a mut S,
}

impl<'a, S: KeyValueStore + ?Sized> Journal<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    fn entries_collection(&mut self) -> Collection<'_, S, JournalEntry> {
        Collection::new(&mut *self.store)
    }

    pub fn entries(&mut self) -> Result<Vec<JournalEntry>, JournalError> {
        Ok(self.entries_collection().list()?)
    }

    pub fn get(&mut self, id: &str) -> Result<Option<JournalEntry>, JournalError> {
        Ok(self.entries_collection().get(id)?)
    }

    /// Adds or replaces an entry and applies any completion change.
    pub fn save(&mut self, entry: &JournalEntry) -> Result<(), JournalError> {
        let previous = self.get(&entry.id)?;
        self.entries_collection().upsert(entry)?;

        let was_completed = previous.as_ref().is_some_and(|p| p.completed);
        match (was_completed, entry.completed) {
            (false, true) => {
                self.mark(&entry.book, entry.chapter)?;
                self.adjust_grace(1)?;
            }
            (true, false) => {
                if let Some(previous) = &previous {
                    self.release(&previous.book, previous.chapter)?;
                }
                self.adjust_grace(-1)?;
            }
            (true, true) => {
                if let Some(previous) = previous
                    .as_ref()
                    .filter(|p| p.book != entry.book || p.chapter != entry.chapter)
                {
                    self.release(&previous.book, previous.chapter)?;
                    self.mark(&entry.book, entry.chapter)?;
                }
            }
            (false, false) => {}
        }
        Ok(())
    }

    /// Sets the completion flag of the entry with `id`.
    ///
    /// Returns false if there is no such entry.
    pub fn set_completed(&mut self, id: &str, completed: bool) -> Result<bool, JournalError> {
        let Some(mut entry) = self.get(id)? else {
            return Ok(false);
        };
        if entry.completed == completed {
            return Ok(true);
        }
        entry.completed = completed;
        self.save(&entry)?;
        Ok(true)
    }

    /// Deletes entries by id, un-completing the completed ones first.
    ///
    /// Returns the number of entries removed.
    pub fn delete_many(&mut self, ids: &[String]) -> Result<usize, JournalError> {
        let doomed: Vec<JournalEntry> = self
            .entries()?
            .into_iter()
            .filter(|entry| ids.contains(&entry.id))
            .collect();

        let removed = self.entries_collection().delete_many(ids)?;

        for entry in doomed.iter().filter(|entry| entry.completed) {
            self.release(&entry.book, entry.chapter)?;
            self.adjust_grace(-1)?;
        }
        Ok(removed)
    }

    pub fn delete(&mut self, id: &str) -> Result<bool, JournalError> {
        Ok(self.delete_many(&[id.to_string()])? > 0)
    }

    /// Stores generated text on the entry with `id`.
    ///
    /// Returns false if the entry was deleted in the meantime; the text is
    /// then dropped.
    pub fn attach_text(
        &mut self,
        id: &str,
        field: EntryText,
        text: impl Into<String>,
    ) -> Result<bool, JournalError> {
        let text = text.into();
        Ok(self
            .entries_collection()
            .update(id, |entry| *field.field_mut(entry) = text)?)
    }

    /// Rebuilds the progress map from completed entries and stores it.
    ///
    /// Refuses to write when any stored entry fails to decode, since its
    /// chapter would be dropped from the map.
    pub fn rebuild_progress(&mut self) -> Result<ProgressMap, JournalError> {
        let (entries, skipped) = self.entries_collection().list_with_skipped()?;
        if !skipped.is_empty() {
            return Err(JournalError::Undecodable(skipped));
        }
        let progress = ProgressMap::derive(&entries);
        progress.save(&mut *self.store)?;
        Ok(progress)
    }

    fn mark(&mut self, book: &str, chapter: u32) -> Result<(), JournalError> {
        let mut progress = ProgressMap::load(&*self.store)?;
        if progress.mark(book, chapter) {
            progress.save(&mut *self.store)?;
        }
        Ok(())
    }

    /// Clears a chapter unless a remaining completed entry covers it.
    fn release(&mut self, book: &str, chapter: u32) -> Result<(), JournalError> {
        let covered = self
            .entries()?
            .iter()
            .any(|e| e.completed && e.book == book && e.chapter == chapter);
        if covered {
            return Ok(());
        }

        let mut progress = ProgressMap::load(&*self.store)?;
        if progress.unmark(book, chapter) {
            progress.save(&mut *self.store)?;
        }
        Ok(())
    }

    fn adjust_grace(&mut self, delta: i64) -> Result<(), JournalError> {
        let current = store::grace_points(&*self.store)?;
        let updated = if delta >= 0 {
            current.saturating_add(delta.unsigned_abs())
        } else {
            current.saturating_sub(delta.unsigned_abs())
        };
        if updated != current {
            store::set_grace_points(&mut *self.store, updated)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::{import_backup, ImportPolicy};
    use crate::store::{MemoryStore, StoreKey};
    use serde_json::json;

    fn entry(id: &str, book: &str, chapter: u32) -> JournalEntry {
        JournalEntry::new(id, "2025-01-01", book, chapter)
    }

    #[test]
    fn test_completing_marks_progress_and_adds_grace() {
        let mut store = MemoryStore::new();
        let mut journal = Journal::new(&mut store);

        journal.save(&entry("a", "創世記", 1)).unwrap();
        assert_eq!(store::grace_points(&store).unwrap(), 0);

        let mut journal = Journal::new(&mut store);
        assert!(journal.set_completed("a", true).unwrap());

        assert_eq!(store::grace_points(&store).unwrap(), 1);
        let progress = ProgressMap::load(&store).unwrap();
        assert!(progress.is_completed("創世記", 1));
    }

    #[test]
    fn test_completing_twice_counts_once() {
        let mut store = MemoryStore::new();
        let mut journal = Journal::new(&mut store);

        journal.save(&entry("a", "創世記", 1).completed(true)).unwrap();
        journal.save(&entry("a", "創世記", 1).completed(true)).unwrap();
        journal.set_completed("a", true).unwrap();

        assert_eq!(store::grace_points(&store).unwrap(), 1);
    }

    #[test]
    fn test_reopen_clears_chapter_and_returns_point() {
        let mut store = MemoryStore::new();
        let mut journal = Journal::new(&mut store);
        journal.save(&entry("a", "詩篇", 23).completed(true)).unwrap();

        journal.set_completed("a", false).unwrap();

        assert_eq!(store::grace_points(&store).unwrap(), 0);
        assert_eq!(
            store.get_json(StoreKey::BibleTrackerProgress).unwrap().unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_deleting_only_completed_entry_removes_book() {
        let mut store = MemoryStore::new();
        let mut journal = Journal::new(&mut store);
        journal.save(&entry("r1", "羅馬書", 1).completed(true)).unwrap();
        journal.save(&entry("p1", "詩篇", 1).completed(true)).unwrap();

        assert!(journal.delete("r1").unwrap());

        let progress = store.get_json(StoreKey::BibleTrackerProgress).unwrap().unwrap();
        assert!(progress.get("羅馬書").is_none());
        assert_eq!(progress, json!({"詩篇": {"1": true}}));
    }

    #[test]
    fn test_chapter_kept_while_another_entry_covers_it() {
        let mut store = MemoryStore::new();
        let mut journal = Journal::new(&mut store);
        journal.save(&entry("a", "約翰福音", 3).completed(true)).unwrap();
        journal.save(&entry("b", "約翰福音", 3).completed(true)).unwrap();

        journal.delete("a").unwrap();

        assert!(ProgressMap::load(&store).unwrap().is_completed("約翰福音", 3));
        assert_eq!(store::grace_points(&store).unwrap(), 1);
    }

    #[test]
    fn test_editing_completed_entry_moves_mark() {
        let mut store = MemoryStore::new();
        let mut journal = Journal::new(&mut store);
        journal.save(&entry("a", "馬可福音", 1).completed(true)).unwrap();

        journal.save(&entry("a", "馬可福音", 2).completed(true)).unwrap();

        let progress = ProgressMap::load(&store).unwrap();
        assert_eq!(progress.chapters("馬可福音").collect::<Vec<_>>(), vec![2]);
        assert_eq!(store::grace_points(&store).unwrap(), 1);
    }

    #[test]
    fn test_grace_never_goes_negative() {
        let mut store = MemoryStore::new();
        let mut journal = Journal::new(&mut store);
        journal.save(&entry("a", "路得記", 1).completed(true)).unwrap();
        journal.save(&entry("b", "路得記", 2).completed(true)).unwrap();
        store::set_grace_points(&mut store, 0).unwrap();

        let mut journal = Journal::new(&mut store);
        journal.set_completed("a", false).unwrap();
        journal
            .delete_many(&["b".to_string(), "missing".to_string()])
            .unwrap();

        assert_eq!(store::grace_points(&store).unwrap(), 0);
        assert!(ProgressMap::load(&store).unwrap().is_empty());
    }

    #[test]
    fn test_toggle_sequence_never_leaves_empty_book() {
        let mut store = MemoryStore::new();
        let mut journal = Journal::new(&mut store);
        for (id, chapter) in [("a", 1), ("b", 2), ("c", 1)] {
            journal.save(&entry(id, "以弗所書", chapter)).unwrap();
        }

        for (id, done) in [("a", true), ("b", true), ("c", true), ("a", false), ("b", false)] {
            journal.set_completed(id, done).unwrap();
        }
        journal.delete("c").unwrap();

        let stored = store.get_json(StoreKey::BibleTrackerProgress).unwrap().unwrap();
        for chapters in stored.as_object().unwrap().values() {
            assert!(!chapters.as_object().unwrap().is_empty());
        }
        assert_eq!(stored, json!({}));
    }

    #[test]
    fn test_attach_text_to_deleted_entry_is_dropped() {
        let mut store = MemoryStore::new();
        let mut journal = Journal::new(&mut store);
        journal.save(&entry("a", "雅各書", 1)).unwrap();

        assert!(journal
            .attach_text("a", EntryText::ScriptureAnalysis, "Faith and works")
            .unwrap());
        assert_eq!(
            journal.get("a").unwrap().unwrap().scripture_analysis,
            "Faith and works"
        );

        journal.delete("a").unwrap();
        assert!(!journal
            .attach_text("a", EntryText::Prayer, "late")
            .unwrap());
        assert!(journal.entries().unwrap().is_empty());
    }

    #[test]
    fn test_rebuild_progress() {
        let mut store = MemoryStore::new();
        store
            .set_json(
                StoreKey::JournalEntries,
                &json!([
                    {"id": "x", "book": "詩篇", "chapter": 23, "completed": true},
                    {"id": "y", "book": "詩篇", "chapter": 24, "completed": true},
                    {"id": "z", "book": "詩篇", "chapter": 25}
                ]),
            )
            .unwrap();

        let progress = Journal::new(&mut store).rebuild_progress().unwrap();
        assert_eq!(progress.to_json(), json!({"詩篇": {"23": true, "24": true}}));
    }

    #[test]
    fn test_imported_string_chapters_survive_rebuild() {
        let mut store = MemoryStore::new();
        let backup = json!({
            "journalEntries": [{"id": "o1", "book": "詩篇", "chapter": "23", "completed": true}]
        })
        .to_string();
        import_backup(&mut store, &backup, &ImportPolicy::default()).unwrap();

        let mut journal = Journal::new(&mut store);
        assert_eq!(journal.entries().unwrap().len(), 1);

        let progress = journal.rebuild_progress().unwrap();
        assert!(progress.is_completed("詩篇", 23));

        assert!(journal.set_completed("o1", false).unwrap());
        assert!(!ProgressMap::load(&store).unwrap().contains_book("詩篇"));
    }

    #[test]
    fn test_rebuild_refuses_when_an_entry_is_unreadable() {
        let mut store = MemoryStore::new();
        store
            .set_json(
                StoreKey::JournalEntries,
                &json!([
                    {"id": "x", "book": "詩篇", "chapter": 23, "completed": true},
                    {"id": "bad", "book": "詩篇", "chapter": 24, "completed": "yes"}
                ]),
            )
            .unwrap();
        store
            .set_json(
                StoreKey::BibleTrackerProgress,
                &json!({"詩篇": {"23": true, "24": true}}),
            )
            .unwrap();

        let result = Journal::new(&mut store).rebuild_progress();

        match result {
            Err(JournalError::Undecodable(ids)) => assert_eq!(ids, vec!["bad"]),
            other => panic!("expected Undecodable, got {:?}", other.map(|p| p.to_json())),
        }
        let stored = store.get_json(StoreKey::BibleTrackerProgress).unwrap().unwrap();
        assert_eq!(stored, json!({"詩篇": {"23": true, "24": true}}));
    }
}
