//! How an import resolves records and counters that already exist.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::StoreKey;

/// Resolution for an imported record whose id already exists locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Keep the local record; only new ids are added.
    #[default]
    AppendOnly,
    /// Replace the local record with the imported one.
    LastWriterWins,
}

/// How an imported grace counter combines with the local one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GracePolicy {
    /// Local + imported. Importing the same backup twice counts it twice.
    #[default]
    Additive,
    /// The imported value replaces the local one.
    Overwrite,
}

/// Import settings, per collection and for the counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportPolicy {
    /// Policy for every collection without an override.
    pub records: MergePolicy,
    /// Per-collection overrides, keyed by collection name.
    pub overrides: BTreeMap<StoreKey, MergePolicy>,
    pub grace_points: GracePolicy,
}

impl ImportPolicy {
    /// The policy applied to `key`.
    pub fn for_key(&self, key: StoreKey) -> MergePolicy {
        self.overrides.get(&key).copied().unwrap_or(self.records)
    }

    pub fn with_override(mut self, key: StoreKey, policy: MergePolicy) -> Self {
        self.overrides.insert(key, policy);
        self
    }

    pub fn with_grace_points(mut self, policy: GracePolicy) -> Self {
        self.grace_points = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_append_only_and_additive() {
        let policy = ImportPolicy::default();
        for key in StoreKey::COLLECTIONS {
            assert_eq!(policy.for_key(key), MergePolicy::AppendOnly);
        }
        assert_eq!(policy.grace_points, GracePolicy::Additive);
    }

    #[test]
    fn test_override_applies_to_one_key() {
        let policy = ImportPolicy::default()
            .with_override(StoreKey::PrayerItems, MergePolicy::LastWriterWins);

        assert_eq!(
            policy.for_key(StoreKey::PrayerItems),
            MergePolicy::LastWriterWins
        );
        assert_eq!(
            policy.for_key(StoreKey::JournalEntries),
            MergePolicy::AppendOnly
        );
    }

    #[test]
    fn test_deserialize_from_json() {
        let policy: ImportPolicy = serde_json::from_str(
            r#"{"records": "last_writer_wins", "overrides": {"journalEntries": "append_only"}, "grace_points": "overwrite"}"#,
        )
        .unwrap();

        assert_eq!(policy.records, MergePolicy::LastWriterWins);
        assert_eq!(
            policy.for_key(StoreKey::JournalEntries),
            MergePolicy::AppendOnly
        );
        assert_eq!(policy.grace_points, GracePolicy::Overwrite);
    }
}
