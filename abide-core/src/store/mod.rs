//! Local key-value storage.
//!
//! Everything the application persists lives under one of a fixed set of
//! [`StoreKey`]s, each holding a single JSON text. Collections are stored as
//! whole arrays and rewritten as a whole.
//!
//! Two implementations are provided:
//! - [`MemoryStore`]: in-process map with an optional byte quota
//! - [`FileStore`]: one `<key>.json` file per key in a data directory

mod file;
mod key;
mod memory;
mod scalars;

pub use file::{FileStore, ImportLock};
pub use key::StoreKey;
pub use memory::MemoryStore;
pub use scalars::{dark_mode, grace_points, set_dark_mode, set_grace_points};
pub(crate) use scalars::counter_value;

use std::io;
use std::path::PathBuf;

use serde_json::Value;

/// A key-value store holding raw JSON text.
pub trait KeyValueStore {
    /// Returns the stored text for `key`, or `None` if nothing was written.
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError>;

    /// Replaces the stored text for `key`.
    fn set(&mut self, key: StoreKey, value: &str) -> Result<(), StoreError>;

    /// Reads and parses the JSON stored for `key`.
    fn get_json(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        match self.get(key)? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StoreError::Corrupt(key, e)),
            None => Ok(None),
        }
    }

    /// Serializes `value` and stores it under `key`.
    fn set_json(&mut self, key: StoreKey, value: &Value) -> Result<(), StoreError> {
        let text = serde_json::to_string(value).map_err(|e| StoreError::Corrupt(key, e))?;
        self.set(key, &text)
    }
}

/// Errors that can occur reading or writing the store.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error reading or writing a file.
    Io(PathBuf, io::Error),
    /// The stored text for a key is not valid JSON.
    Corrupt(StoreKey, serde_json::Error),
    /// Writing the value would exceed the store's capacity.
    QuotaExceeded {
        key: StoreKey,
        needed: usize,
        available: usize,
    },
    /// Another import holds the lock.
    Locked(PathBuf),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(path, e) => write!(f, "I/O error for {}: {}", path.display(), e),
            StoreError::Corrupt(key, e) => write!(f, "Stored value for {} is invalid: {}", key, e),
            StoreError::QuotaExceeded {
                key,
                needed,
                available,
            } => write!(
                f,
                "Storage quota exceeded writing {}: {} bytes needed, {} available",
                key, needed, available
            ),
            StoreError::Locked(path) => write!(
                f,
                "Another import is in progress (lock file {}); remove the file if no import is running",
                path.display()
            ),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(_, e) => Some(e),
            StoreError::Corrupt(_, e) => Some(e),
            StoreError::QuotaExceeded { .. } | StoreError::Locked(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_json_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get_json(StoreKey::PrayerItems).unwrap().is_none());
    }

    #[test]
    fn test_set_json_then_get_json() {
        let mut store = MemoryStore::new();
        let value = json!([{"id": "p1", "title": "Mom"}]);
        store.set_json(StoreKey::PrayerItems, &value).unwrap();

        assert_eq!(store.get_json(StoreKey::PrayerItems).unwrap(), Some(value));
    }

    #[test]
    fn test_get_json_reports_corrupt_key() {
        let mut store = MemoryStore::new();
        store.set(StoreKey::JournalEntries, "[{oops").unwrap();

        let err = store.get_json(StoreKey::JournalEntries).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(StoreKey::JournalEntries, _)));
        assert!(err.to_string().contains("journalEntries"));
    }
}
