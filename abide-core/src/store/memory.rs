//! In-memory store, used by tests and as a scratch dataset.

use std::collections::HashMap;

use super::{KeyValueStore, StoreError, StoreKey};

/// A store that keeps every value in memory.
///
/// An optional quota caps the total number of bytes held across all keys,
/// mirroring the limits a browser places on local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<StoreKey, String>,
    quota: Option<usize>,
    writes: usize,
}

impl MemoryStore {
    /// Creates an empty store without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that refuses writes beyond `bytes` in total.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Total bytes currently held.
    pub fn used_bytes(&self) -> usize {
        self.values.values().map(String::len).sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(&key).cloned())
    }

    fn set(&mut self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let others = self.used_bytes() - self.values.get(&key).map_or(0, String::len);
            let available = quota.saturating_sub(others);
            if value.len() > available {
                return Err(StoreError::QuotaExceeded {
                    key,
                    needed: value.len(),
                    available,
                });
            }
        }

        self.values.insert(key, value.to_string());
        self.writes += 1;
        Ok(())
    }
}
