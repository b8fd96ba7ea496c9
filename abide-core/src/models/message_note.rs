use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Record;
use crate::store::StoreKey;

/// Notes taken while listening to a sermon or message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageNote {
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageNote {
    pub fn new(id: impl Into<String>, date: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            title: title.into(),
            speaker: String::new(),
            content: String::new(),
            tags: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = speaker.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

impl Record for MessageNote {
    const KEY: StoreKey = StoreKey::MessageNotes;

    fn id(&self) -> &str {
        &self.id
    }
}
