mod comment;
mod generated;
mod journal_entry;
mod message_note;
mod prayer_item;
mod small_group_share;

pub use comment::Comment;
pub use generated::{JesusSaidCard, QuickReadEntry, SituationalPrayer};
pub use journal_entry::JournalEntry;
pub use message_note::MessageNote;
pub use prayer_item::PrayerItem;
pub use small_group_share::SmallGroupShare;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

use crate::store::StoreKey;

/// A uniquely identified entry stored in one of the record collections.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// The collection this record type is stored under.
    const KEY: StoreKey;

    /// The record's stable identifier.
    fn id(&self) -> &str;
}

/// Reads a chapter stored either as a number or as a numeric string, as
/// older data written from a `<select>` value does. A blank string reads as 0.
pub(crate) fn chapter_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Chapter {
        Number(u32),
        Text(String),
    }

    match Chapter::deserialize(deserializer)? {
        Chapter::Number(n) => Ok(n),
        Chapter::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(0);
            }
            text.parse()
                .map_err(|_| D::Error::custom(format!("invalid chapter: {:?}", text)))
        }
    }
}

/// Today's date in the `YYYY-MM-DD` form records use.
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}
