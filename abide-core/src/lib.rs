//! Abide Core Library
//!
//! Data model, storage and backup reconciliation for the Abide devotional
//! journal, plus the AI and scripture clients the journal draws on.

pub mod ai;
pub mod backup;
pub mod collection;
pub mod ids;
pub mod journal;
pub mod models;
pub mod progress;
pub mod scripture;
pub mod store;
pub mod view;

pub use ai::{AiAction, AiError, AiOutput, AiService, GeminiClient, TextGenerator};
pub use backup::{
    backup_filename, export_backup, export_json, import_backup, ExportError, GracePolicy,
    ImportError, ImportPolicy, ImportReport, KeyStatus, MergePolicy,
};
pub use collection::{Collection, CollectionError};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use journal::{EntryText, Journal, JournalError};
pub use models::{
    Comment, JesusSaidCard, JournalEntry, MessageNote, PrayerItem, QuickReadEntry, Record,
    SituationalPrayer, SmallGroupShare,
};
pub use progress::ProgressMap;
pub use scripture::{find_book, Book, FhlClient, ScriptureError, ScriptureProvider, Verse};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, StoreKey};
pub use view::{ListQuery, Listable, Selection, SortOrder};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
