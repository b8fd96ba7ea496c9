//! Applying an imported backup to the store.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use super::merge::merge_records;
use super::policy::{GracePolicy, ImportPolicy, MergePolicy};
use crate::progress::ProgressMap;
use crate::store::{self, KeyValueStore, StoreError, StoreKey};

/// Errors that abort an import before anything is written.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Backup is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Backup must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// What happened to one key during an import.
#[derive(Debug)]
pub enum KeyStatus {
    /// The backup does not contain this key.
    Absent,
    /// The backup added nothing new; the stored value was not rewritten.
    Unchanged,
    /// Records were merged into the collection and written.
    Merged { added: usize, replaced: usize },
    /// The progress map or a scalar was written.
    Updated,
    /// The imported or stored value has the wrong shape; the key was left alone.
    Skipped(String),
    /// The merged value could not be written; the key was not committed.
    Failed(StoreError),
}

impl KeyStatus {
    /// True if a new value for the key was written.
    pub fn is_committed(&self) -> bool {
        matches!(self, KeyStatus::Merged { .. } | KeyStatus::Updated)
    }
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyStatus::Absent => write!(f, "not in backup"),
            KeyStatus::Unchanged => write!(f, "nothing new"),
            KeyStatus::Merged { added, replaced: 0 } => write!(f, "{} added", added),
            KeyStatus::Merged { added, replaced } => {
                write!(f, "{} added, {} replaced", added, replaced)
            }
            KeyStatus::Updated => write!(f, "updated"),
            KeyStatus::Skipped(reason) => write!(f, "skipped: {}", reason),
            KeyStatus::Failed(e) => write!(f, "FAILED: {}", e),
        }
    }
}

/// Outcome for a single key.
#[derive(Debug)]
pub struct KeyOutcome {
    pub key: StoreKey,
    pub status: KeyStatus,
}

/// Per-key outcome of an import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub outcomes: Vec<KeyOutcome>,
}

impl ImportReport {
    /// The status recorded for `key`.
    pub fn status(&self, key: StoreKey) -> Option<&KeyStatus> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.key == key)
            .map(|outcome| &outcome.status)
    }

    /// Keys whose merged value was written.
    pub fn committed(&self) -> Vec<StoreKey> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status.is_committed())
            .map(|outcome| outcome.key)
            .collect()
    }

    /// Keys whose merged value could not be written, with the cause.
    pub fn failed(&self) -> Vec<(StoreKey, &StoreError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match &outcome.status {
                KeyStatus::Failed(e) => Some((outcome.key, e)),
                _ => None,
            })
            .collect()
    }

    /// True if no key failed to commit.
    pub fn is_complete(&self) -> bool {
        self.failed().is_empty()
    }
}

/// Parses `text` as a backup and merges it into `store`.
///
/// Text that is not a JSON object aborts the import before any key is read
/// or written. Otherwise every key is merged independently: each is read
/// right before its merge and written right after, so a failure on one key
/// leaves earlier keys committed and later keys still attempted.
pub fn import_backup<S: KeyValueStore + ?Sized>(
    store: &mut S,
    text: &str,
    policy: &ImportPolicy,
) -> Result<ImportReport, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    let backup = match value {
        Value::Object(backup) => backup,
        other => return Err(ImportError::NotAnObject(json_type(&other))),
    };

    let report = import_object(store, &backup, policy);
    tracing::info!(
        committed = report.committed().len(),
        failed = report.failed().len(),
        "Import finished"
    );
    Ok(report)
}

fn import_object<S: KeyValueStore + ?Sized>(
    store: &mut S,
    backup: &Map<String, Value>,
    policy: &ImportPolicy,
) -> ImportReport {
    let mut report = ImportReport::default();

    for key in StoreKey::ALL {
        let imported = backup.get(key.as_str());
        let status = match key {
            StoreKey::BibleTrackerProgress => merge_progress(store, imported),
            StoreKey::GracePoints => merge_grace_points(store, imported, policy.grace_points),
            StoreKey::DarkMode => merge_dark_mode(store, imported),
            _ => merge_collection(store, key, imported, policy.for_key(key)),
        };

        match &status {
            KeyStatus::Skipped(reason) => tracing::warn!("Skipping {}: {}", key, reason),
            KeyStatus::Failed(e) => tracing::warn!("Failed to write {}: {}", key, e),
            other => tracing::debug!("{}: {}", key, other),
        }
        report.outcomes.push(KeyOutcome { key, status });
    }

    report
}

fn merge_collection<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: StoreKey,
    imported: Option<&Value>,
    policy: MergePolicy,
) -> KeyStatus {
    let Some(imported) = imported else {
        return KeyStatus::Absent;
    };
    let Some(incoming) = imported.as_array() else {
        return KeyStatus::Skipped(format!("expected an array, found {}", json_type(imported)));
    };

    let existing = match store.get_json(key) {
        Ok(None) => Vec::new(),
        Ok(Some(Value::Array(records))) => records,
        Ok(Some(other)) => {
            return KeyStatus::Skipped(format!(
                "stored value is {}, not an array",
                json_type(&other)
            ))
        }
        Err(StoreError::Corrupt(_, e)) => {
            return KeyStatus::Skipped(format!("stored value is not valid JSON: {}", e))
        }
        Err(e) => return KeyStatus::Failed(e),
    };

    let merged = merge_records(existing, incoming, policy);
    if merged.rejected > 0 {
        tracing::warn!("{}: dropped {} record(s) without an id", key, merged.rejected);
    }
    if !merged.changed() {
        return KeyStatus::Unchanged;
    }

    match store.set_json(key, &Value::Array(merged.records)) {
        Ok(()) => KeyStatus::Merged {
            added: merged.added,
            replaced: merged.replaced,
        },
        Err(e) => KeyStatus::Failed(e),
    }
}

fn merge_progress<S: KeyValueStore + ?Sized>(store: &mut S, imported: Option<&Value>) -> KeyStatus {
    let Some(imported) = imported else {
        return KeyStatus::Absent;
    };
    if !imported.is_object() {
        return KeyStatus::Skipped(format!("expected an object, found {}", json_type(imported)));
    }

    let mut progress = match store.get_json(StoreKey::BibleTrackerProgress) {
        Ok(None) => ProgressMap::new(),
        Ok(Some(stored)) if stored.is_object() => ProgressMap::from_json(&stored),
        Ok(Some(other)) => {
            return KeyStatus::Skipped(format!(
                "stored value is {}, not an object",
                json_type(&other)
            ))
        }
        Err(StoreError::Corrupt(_, e)) => {
            return KeyStatus::Skipped(format!("stored value is not valid JSON: {}", e))
        }
        Err(e) => return KeyStatus::Failed(e),
    };

    if !progress.apply_json(imported) {
        return KeyStatus::Unchanged;
    }

    match progress.save(store) {
        Ok(()) => KeyStatus::Updated,
        Err(e) => KeyStatus::Failed(e),
    }
}

fn merge_grace_points<S: KeyValueStore + ?Sized>(
    store: &mut S,
    imported: Option<&Value>,
    policy: GracePolicy,
) -> KeyStatus {
    let Some(imported) = imported else {
        return KeyStatus::Absent;
    };
    let Some(points) = store::counter_value(imported) else {
        return KeyStatus::Skipped(format!(
            "expected a non-negative integer, found {}",
            imported
        ));
    };

    let current = match store::grace_points(store) {
        Ok(current) => current,
        Err(e) => return KeyStatus::Failed(e),
    };
    let merged = match policy {
        GracePolicy::Additive => current.saturating_add(points),
        GracePolicy::Overwrite => points,
    };
    if merged == current {
        return KeyStatus::Unchanged;
    }

    match store::set_grace_points(store, merged) {
        Ok(()) => KeyStatus::Updated,
        Err(e) => KeyStatus::Failed(e),
    }
}

fn merge_dark_mode<S: KeyValueStore + ?Sized>(store: &mut S, imported: Option<&Value>) -> KeyStatus {
    let Some(imported) = imported else {
        return KeyStatus::Absent;
    };
    let Some(enabled) = imported.as_bool() else {
        return KeyStatus::Skipped(format!("expected a boolean, found {}", json_type(imported)));
    };

    match store::dark_mode(&*store) {
        Ok(current) if current == enabled => return KeyStatus::Unchanged,
        Ok(_) => {}
        Err(e) => return KeyStatus::Failed(e),
    }

    match store::set_dark_mode(store, enabled) {
        Ok(()) => KeyStatus::Updated,
        Err(e) => KeyStatus::Failed(e),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
