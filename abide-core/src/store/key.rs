//! Keys under which the application persists its data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A key in the local key-value store.
///
/// Each key holds one JSON value: an array for record collections, an
/// object for the progress map, and scalars for the counter and the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StoreKey {
    JournalEntries,
    PrayerItems,
    SituationalPrayers,
    JesusSaidCards,
    QuickReadHistory,
    MessageNotes,
    SmallGroupShares,
    BibleTrackerProgress,
    GracePoints,
    DarkMode,
}

impl StoreKey {
    /// Every key, in backup order.
    pub const ALL: [StoreKey; 10] = [
        StoreKey::JournalEntries,
        StoreKey::PrayerItems,
        StoreKey::SituationalPrayers,
        StoreKey::JesusSaidCards,
        StoreKey::QuickReadHistory,
        StoreKey::MessageNotes,
        StoreKey::SmallGroupShares,
        StoreKey::BibleTrackerProgress,
        StoreKey::GracePoints,
        StoreKey::DarkMode,
    ];

    /// Keys holding arrays of id-bearing records.
    pub const COLLECTIONS: [StoreKey; 7] = [
        StoreKey::JournalEntries,
        StoreKey::PrayerItems,
        StoreKey::SituationalPrayers,
        StoreKey::JesusSaidCards,
        StoreKey::QuickReadHistory,
        StoreKey::MessageNotes,
        StoreKey::SmallGroupShares,
    ];

    /// The key's name, as used in the store and in backup files.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::JournalEntries => "journalEntries",
            StoreKey::PrayerItems => "prayerItems",
            StoreKey::SituationalPrayers => "situationalPrayers",
            StoreKey::JesusSaidCards => "jesusSaidCards",
            StoreKey::QuickReadHistory => "quickReadHistory",
            StoreKey::MessageNotes => "messageNotes",
            StoreKey::SmallGroupShares => "smallGroupShares",
            StoreKey::BibleTrackerProgress => "bibleTrackerProgress",
            StoreKey::GracePoints => "gracePoints",
            StoreKey::DarkMode => "darkMode",
        }
    }

    /// Returns the filename used by the file-backed store.
    pub fn filename(&self) -> String {
        format!("{}.json", self.as_str())
    }

    /// Returns true if this key holds a record collection.
    pub fn is_collection(&self) -> bool {
        Self::COLLECTIONS.contains(self)
    }

    /// JSON text stored for this key when nothing has been written yet.
    pub fn default_json(&self) -> &'static str {
        match self {
            StoreKey::BibleTrackerProgress => "{}",
            StoreKey::GracePoints => "0",
            StoreKey::DarkMode => "false",
            _ => "[]",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StoreKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoreKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown store key: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_key_filename() {
        assert_eq!(StoreKey::JournalEntries.filename(), "journalEntries.json");
        assert_eq!(
            StoreKey::BibleTrackerProgress.filename(),
            "bibleTrackerProgress.json"
        );
        assert_eq!(StoreKey::DarkMode.filename(), "darkMode.json");
    }

    #[test]
    fn test_collections_are_a_subset_of_all() {
        for key in StoreKey::COLLECTIONS {
            assert!(StoreKey::ALL.contains(&key));
            assert!(key.is_collection());
            assert_eq!(key.default_json(), "[]");
        }
        assert!(!StoreKey::GracePoints.is_collection());
        assert!(!StoreKey::BibleTrackerProgress.is_collection());
    }

    #[test]
    fn test_parse_key_name() {
        assert_eq!(
            "quickReadHistory".parse::<StoreKey>().unwrap(),
            StoreKey::QuickReadHistory
        );
        assert!("nope".parse::<StoreKey>().is_err());
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        for key in StoreKey::ALL {
            let json = serde_json::to_value(key).unwrap();
            assert_eq!(json, key.as_str());
        }
    }
}
