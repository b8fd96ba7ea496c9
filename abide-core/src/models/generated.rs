//! Records produced by the AI collaborator and stored verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Record;
use crate::store::StoreKey;

/// A prayer generated for a situation the user described.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SituationalPrayer {
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub situation: String,
    #[serde(default)]
    pub prayer: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A "Jesus said" gospel card: a verse, a personal message and a prayer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JesusSaidCard {
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub verse: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub prayer: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A quick reading: the passage the user entered and the generated notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReadEntry {
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub user_input: String,
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub application: String,
    #[serde(default)]
    pub prayer: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SituationalPrayer {
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        situation: impl Into<String>,
        prayer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            situation: situation.into(),
            prayer: prayer.into(),
            extra: Map::new(),
        }
    }
}

impl JesusSaidCard {
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        verse: impl Into<String>,
        message: impl Into<String>,
        prayer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            verse: verse.into(),
            message: message.into(),
            prayer: prayer.into(),
            extra: Map::new(),
        }
    }
}

impl QuickReadEntry {
    pub fn new(id: impl Into<String>, date: impl Into<String>, user_input: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            user_input: user_input.into(),
            analysis: String::new(),
            application: String::new(),
            prayer: String::new(),
            extra: Map::new(),
        }
    }
}

impl Record for SituationalPrayer {
    const KEY: StoreKey = StoreKey::SituationalPrayers;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for JesusSaidCard {
    const KEY: StoreKey = StoreKey::JesusSaidCards;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for QuickReadEntry {
    const KEY: StoreKey = StoreKey::QuickReadHistory;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_read_wire_names() {
        let entry = QuickReadEntry::new("q1", "2025-04-01", "約翰福音 3:16");
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["userInput"], "約翰福音 3:16");
        assert_eq!(value["analysis"], "");
    }

    #[test]
    fn test_card_keys() {
        assert_eq!(JesusSaidCard::KEY, StoreKey::JesusSaidCards);
        assert_eq!(SituationalPrayer::KEY, StoreKey::SituationalPrayers);
        assert_eq!(QuickReadEntry::KEY, StoreKey::QuickReadHistory);
    }
}
