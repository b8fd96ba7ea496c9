//! Scripture lookup: the book table and chapter text providers.

mod books;
mod fhl;

pub use books::{find_book, Book, Testament, BIBLE_BOOKS};
pub use fhl::{BibleRecord, BibleResponse, FhlClient, DEFAULT_FHL_URL, DEFAULT_VERSION};

use std::future::Future;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptureError {
    #[error("Unknown book: {0}")]
    UnknownBook(String),
    #[error("{book} has {max} chapters; chapter {chapter} does not exist")]
    ChapterOutOfRange {
        book: &'static str,
        chapter: u32,
        max: u32,
    },
    #[error("No text found for {book} {chapter}")]
    NotFound { book: &'static str, chapter: u32 },
    #[error("Scripture request failed: {0}")]
    Request(String),
    #[error("Scripture service returned status {0}")]
    Upstream(u16),
}

/// One verse of a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    pub chapter: u32,
    pub verse_number: u32,
    pub text: String,
}

/// Looks up chapter text.
pub trait ScriptureProvider: Send + Sync {
    /// The verses of `chapter` of `book`, in order. `book` may be a full
    /// name or an abbreviation.
    fn fetch_chapter(
        &self,
        book: &str,
        chapter: u32,
    ) -> impl Future<Output = Result<Vec<Verse>, ScriptureError>> + Send;
}

/// Resolves `book` and checks that it has `chapter`.
pub fn resolve(book: &str, chapter: u32) -> Result<&'static Book, ScriptureError> {
    let found = find_book(book).ok_or_else(|| ScriptureError::UnknownBook(book.to_string()))?;
    if !found.has_chapter(chapter) {
        return Err(ScriptureError::ChapterOutOfRange {
            book: found.name,
            chapter,
            max: found.chapters,
        });
    }
    Ok(found)
}
