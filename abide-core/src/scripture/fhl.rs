//! Client for the FHL Bible API (`qb.php`).

use serde::{Deserialize, Serialize};

use super::{resolve, Book, ScriptureError, ScriptureProvider, Verse};

pub const DEFAULT_FHL_URL: &str = "https://bible.fhl.net/qb.php";
/// Chinese Union Version with new punctuation.
pub const DEFAULT_VERSION: &str = "nstrunv";

/// One verse as the FHL API returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BibleRecord {
    #[serde(default)]
    pub chineses: String,
    #[serde(default)]
    pub engs: String,
    pub chap: u32,
    pub sec: u32,
    #[serde(default)]
    pub bible_text: String,
}

/// The FHL response body; also what the proxy server returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BibleResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub record_count: u32,
    #[serde(default)]
    pub record: Vec<BibleRecord>,
}

impl BibleResponse {
    /// Builds a successful response for `verses` of `book`.
    pub fn from_verses(book: &Book, verses: &[Verse]) -> Self {
        let record: Vec<BibleRecord> = verses
            .iter()
            .map(|verse| BibleRecord {
                chineses: book.abbreviation.to_string(),
                engs: book.english.to_string(),
                chap: verse.chapter,
                sec: verse.verse_number,
                bible_text: verse.text.clone(),
            })
            .collect();
        Self {
            status: "success".to_string(),
            record_count: record.len() as u32,
            record,
        }
    }

    /// The verses of `chapter`, ordered by verse number.
    fn into_verses(self, chapter: u32) -> Vec<Verse> {
        let mut verses: Vec<Verse> = self
            .record
            .into_iter()
            .filter(|record| record.chap == chapter)
            .map(|record| Verse {
                chapter: record.chap,
                verse_number: record.sec,
                text: record.bible_text,
            })
            .collect();
        verses.sort_by_key(|verse| verse.verse_number);
        verses
    }
}

#[derive(Debug, Clone)]
pub struct FhlClient {
    http: reqwest::Client,
    base_url: String,
    version: String,
}

impl Default for FhlClient {
    fn default() -> Self {
        Self::new(DEFAULT_FHL_URL, DEFAULT_VERSION)
    }
}

impl FhlClient {
    pub fn new(base_url: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            version: version.into(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl ScriptureProvider for FhlClient {
    async fn fetch_chapter(&self, book: &str, chapter: u32) -> Result<Vec<Verse>, ScriptureError> {
        let book = resolve(book, chapter)?;
        let chap = chapter.to_string();

        tracing::debug!("Fetching {} {} ({})", book.name, chapter, self.version);
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("chineses", book.abbreviation),
                ("chap", chap.as_str()),
                ("version", self.version.as_str()),
                ("gb", "0"),
            ])
            .send()
            .await
            .map_err(|e| ScriptureError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScriptureError::Upstream(response.status().as_u16()));
        }

        let body: BibleResponse = response
            .json()
            .await
            .map_err(|e| ScriptureError::Request(e.to_string()))?;

        let verses = body.into_verses(chapter);
        if verses.is_empty() {
            return Err(ScriptureError::NotFound {
                book: book.name,
                chapter,
            });
        }
        Ok(verses)
    }
}
