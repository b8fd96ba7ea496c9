//! List views: search, date ordering and multi-select.

use std::collections::BTreeSet;

use crate::models::{
    JesusSaidCard, JournalEntry, MessageNote, PrayerItem, QuickReadEntry, SituationalPrayer,
    SmallGroupShare,
};

/// A record that can be shown in a searchable, date-ordered list.
pub trait Listable {
    /// `YYYY-MM-DD`, used for ordering.
    fn date(&self) -> &str;

    /// Text the search term is matched against.
    fn search_text(&self) -> Vec<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// A search term and sort order applied to a list of records.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub order: SortOrder,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() {
            None
        } else {
            Some(term)
        };
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// True if `record` contains the search term, ignoring case.
    pub fn matches<R: Listable>(&self, record: &R) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        let term = term.trim().to_lowercase();
        record
            .search_text()
            .iter()
            .any(|text| text.to_lowercase().contains(&term))
    }

    /// Filters and sorts `records`. Records with the same date keep their order.
    pub fn apply<R: Listable>(&self, records: Vec<R>) -> Vec<R> {
        let mut records: Vec<R> = records.into_iter().filter(|r| self.matches(r)).collect();
        match self.order {
            SortOrder::NewestFirst => records.sort_by(|a, b| b.date().cmp(a.date())),
            SortOrder::OldestFirst => records.sort_by(|a, b| a.date().cmp(b.date())),
        }
        records
    }
}

/// Ids selected for a bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `id` if it was not selected, deselects it otherwise.
    /// Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    /// Selects every id in `ids`, typically the currently visible list.
    pub fn select_all<I>(&mut self, ids: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl Listable for JournalEntry {
    fn date(&self) -> &str {
        &self.date
    }

    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![
            self.book.as_str(),
            self.highlights.as_str(),
            self.god_message.as_str(),
            self.prayer.as_str(),
        ];
        text.extend(self.title.as_deref());
        text
    }
}

impl Listable for PrayerItem {
    fn date(&self) -> &str {
        &self.prayer_date
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.person.as_str(), self.content.as_str()]
    }
}

impl Listable for SituationalPrayer {
    fn date(&self) -> &str {
        &self.date
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.situation.as_str(), self.prayer.as_str()]
    }
}

impl Listable for JesusSaidCard {
    fn date(&self) -> &str {
        &self.date
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.verse.as_str(), self.message.as_str(), self.prayer.as_str()]
    }
}

impl Listable for QuickReadEntry {
    fn date(&self) -> &str {
        &self.date
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.user_input.as_str(), self.analysis.as_str(), self.application.as_str()]
    }
}

impl Listable for MessageNote {
    fn date(&self) -> &str {
        &self.date
    }

    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.title.as_str(), self.speaker.as_str(), self.content.as_str()];
        text.extend(self.tags.iter().map(String::as_str));
        text
    }
}

impl Listable for SmallGroupShare {
    fn date(&self) -> &str {
        &self.date
    }

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.group_name.as_str(),
            self.book.as_str(),
            self.topic.as_str(),
            self.my_share.as_str(),
        ]
    }
}
