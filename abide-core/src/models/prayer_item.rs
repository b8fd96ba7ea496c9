use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::comment::Comment;
use super::Record;
use crate::store::StoreKey;

/// An item on the prayer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Who the prayer is for.
    #[serde(default)]
    pub person: String,
    #[serde(default)]
    pub content: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub prayer_date: String,
    #[serde(default)]
    pub answered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gods_response: Option<String>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PrayerItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        person: impl Into<String>,
        prayer_date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            person: person.into(),
            content: String::new(),
            prayer_date: prayer_date.into(),
            answered: false,
            answered_date: None,
            gods_response: None,
            likes: 0,
            liked: false,
            comments: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Marks the prayer answered on `date`, optionally recording the response.
    pub fn mark_answered(&mut self, date: impl Into<String>, response: Option<String>) {
        self.answered = true;
        self.answered_date = Some(date.into());
        self.gods_response = response;
    }
}

impl Record for PrayerItem {
    const KEY: StoreKey = StoreKey::PrayerItems;

    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for PrayerItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - {} ({})", self.title, self.person, self.prayer_date)?;
        if !self.content.is_empty() {
            writeln!(f, "{}", self.content)?;
        }
        if self.answered {
            match &self.answered_date {
                Some(date) => writeln!(f, "Answered on {}", date)?,
                None => writeln!(f, "Answered")?,
            }
            if let Some(response) = &self.gods_response {
                writeln!(f, "Response: {}", response)?;
            }
        }
        Ok(())
    }
}
