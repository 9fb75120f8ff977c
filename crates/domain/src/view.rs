//! Filtered collection view shared by every list page.
//!
//! A record is visible when the free-text search matches at least one of its
//! searchable fields (case-insensitive) and every active categorical filter
//! matches its field exactly. Input order is preserved.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Categorical filter value that disables the filter.
pub const ALL_FILTER_VALUE: &str = "all";

/// Record types that can be shown through a filtered view.
pub trait Filterable {
    /// Field values matched by the free-text search.
    fn searchable_fields(&self) -> Vec<&str>;

    /// Value of a categorical field, or `None` when the record type does not
    /// expose that field.
    fn categorical_value(&self, field: &str) -> Option<&str>;
}

/// Search text plus categorical filters applied to a record collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordQuery {
    text: String,
    categorical: BTreeMap<String, String>,
}

impl RecordQuery {
    /// Creates an empty query that matches every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text search.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Sets one categorical filter. The value `all` disables it.
    #[must_use]
    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_filter(field, value);
        self
    }

    /// Replaces the free-text search in place.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Replaces one categorical filter in place.
    pub fn set_filter(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.categorical.insert(field.into(), value.into());
    }

    /// Returns the raw search text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Returns the categorical filters, including disabled ones.
    #[must_use]
    pub fn categorical(&self) -> &BTreeMap<String, String> {
        &self.categorical
    }

    /// Returns whether the query matches every record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
            && self
                .categorical
                .values()
                .all(|value| value == ALL_FILTER_VALUE)
    }

    /// Returns whether one record satisfies the query.
    #[must_use]
    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        let needle = self.text.to_lowercase();
        let matches_text = needle.is_empty()
            || record
                .searchable_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str()));
        if !matches_text {
            return false;
        }

        self.categorical
            .iter()
            .filter(|(_, value)| value.as_str() != ALL_FILTER_VALUE)
            .all(|(field, value)| record.categorical_value(field) == Some(value.as_str()))
    }
}

/// Returns the visible subsequence of `records`.
///
/// The iterator is lazy and can be cloned to restart the scan.
pub fn filter_records<'a, R: Filterable>(
    records: &'a [R],
    query: &'a RecordQuery,
) -> impl Iterator<Item = &'a R> + Clone + 'a {
    records.iter().filter(move |record| query.matches(*record))
}
