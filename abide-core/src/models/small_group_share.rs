use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Record;
use crate::store::StoreKey;

/// What the user prepared to share at a small group meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmallGroupShare {
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub book: String,
    #[serde(default, deserialize_with = "super::chapter_number")]
    pub chapter: u32,
    #[serde(default)]
    pub verse: String,
    /// Discussion topics, one per paragraph.
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub my_share: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SmallGroupShare {
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        book: impl Into<String>,
        chapter: u32,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            group_name: String::new(),
            book: book.into(),
            chapter,
            verse: String::new(),
            topic: String::new(),
            my_share: String::new(),
            extra: Map::new(),
        }
    }

    /// The scripture the share is about, e.g. `腓立比書 4:6`.
    pub fn scripture(&self) -> String {
        if self.verse.is_empty() {
            format!("{} {}", self.book, self.chapter)
        } else {
            format!("{} {}:{}", self.book, self.chapter, self.verse)
        }
    }

    /// Stores generated discussion topics, separated by blank lines.
    pub fn set_topics(&mut self, topics: &[String]) {
        self.topic = topics.join("\n\n");
    }
}

impl Record for SmallGroupShare {
    const KEY: StoreKey = StoreKey::SmallGroupShares;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripture_reference() {
        let mut share = SmallGroupShare::new("s1", "2025-05-01", "腓立比書", 4);
        assert_eq!(share.scripture(), "腓立比書 4");

        share.verse = "6-7".to_string();
        assert_eq!(share.scripture(), "腓立比書 4:6-7");
    }

    #[test]
    fn test_set_topics_joins_paragraphs() {
        let mut share = SmallGroupShare::new("s1", "2025-05-01", "腓立比書", 4);
        share.set_topics(&["One?".to_string(), "Two?".to_string()]);

        assert_eq!(share.topic, "One?\n\nTwo?");
    }

    #[test]
    fn test_chapter_stored_as_string() {
        let share: SmallGroupShare =
            serde_json::from_value(serde_json::json!({"id": "s1", "book": "雅各書", "chapter": "1"}))
                .unwrap();
        assert_eq!(share.scripture(), "雅各書 1");
    }
}
