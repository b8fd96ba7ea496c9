//! Serializing the persisted dataset into a backup file.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::store::{KeyValueStore, StoreError, StoreKey};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Failed to serialize backup: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reads every key and returns the backup object.
///
/// Keys that were never written take their defaults (`[]`, `{}`, `0`,
/// `false`). A stored value that is not valid JSON fails the export.
pub fn export_backup<S: KeyValueStore + ?Sized>(store: &S) -> Result<Value, ExportError> {
    let mut backup = Map::new();
    for key in StoreKey::ALL {
        let value = match store.get_json(key)? {
            Some(value) => value,
            None => serde_json::from_str(key.default_json())?,
        };
        backup.insert(key.as_str().to_string(), value);
    }
    Ok(Value::Object(backup))
}

/// The backup as pretty-printed JSON text.
pub fn export_json<S: KeyValueStore + ?Sized>(store: &S) -> Result<String, ExportError> {
    let backup = export_backup(store)?;
    Ok(serde_json::to_string_pretty(&backup)?)
}

/// File name for a backup taken on `date`.
pub fn backup_filename(date: NaiveDate) -> String {
    format!("abide-backup-{}.json", date.format("%Y-%m-%d"))
}
