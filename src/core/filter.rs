//! Filter messages by author, date range, and choose the bucket width.
//!
//! This module provides [`Filter`], the value every analyzer takes alongside
//! the message stream. Analyzers never filter on their own: they call
//! [`Filter::select`], which validates the filter and yields the matching
//! content-bearing messages.
//!
//! # Filter Types
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | Authors | [`with_author`](Filter::with_author) | Allow-list of exact author labels |
//! | Date from | [`with_date_from`](Filter::with_date_from) | Messages on or after date |
//! | Date to | [`with_date_to`](Filter::with_date_to) | Messages on or before date |
//! | Granularity | [`with_granularity`](Filter::with_granularity) | Bucket width of every series |
//!
//! # Examples
//!
//! ```
//! use chatmetrics::core::filter::Filter;
//! use chatmetrics::core::bucket::Granularity;
//! use chatmetrics::Message;
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> chatmetrics::Result<()> {
//! let messages = vec![
//!     Message::new("Alice", "Old", Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()),
//!     Message::new("Alice", "New", Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()),
//!     Message::new("Bob", "Hi", Utc.with_ymd_and_hms(2024, 6, 16, 12, 0, 0).unwrap()),
//! ];
//!
//! let filter = Filter::new()
//!     .with_author("Alice")
//!     .with_date_from("2024-06-01")?
//!     .with_granularity(Granularity::Week);
//!
//! let selected = filter.select(&messages)?;
//! assert_eq!(selected.len(), 1);
//! assert_eq!(selected[0].content(), "New");
//! # Ok(())
//! # }
//! ```
//!
//! # Behavior Notes
//!
//! - Author matching is exact; labels are never normalized
//! - Date bounds are inclusive
//! - System events are never selected
//! - An author that does not occur simply yields an empty selection

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Message;
use crate::core::bucket::Granularity;
use crate::error::{AnalyzerError, Result};

/// Author, date range and bucket granularity applied before analysis.
///
/// Filters are combined with AND logic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    /// Include only messages from these authors (exact match).
    pub authors: Option<BTreeSet<String>>,

    /// Include only messages on or after this timestamp.
    pub start: Option<DateTime<Utc>>,

    /// Include only messages on or before this timestamp.
    pub end: Option<DateTime<Utc>>,

    /// Bucket width for every time series (default: day).
    pub granularity: Granularity,
}

impl Filter {
    /// Creates an empty filter: all authors, all dates, daily buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an author to the allow-list.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors
            .get_or_insert_with(BTreeSet::new)
            .insert(author.into());
        self
    }

    /// Adds several authors to the allow-list.
    ///
    /// An empty iterator leaves the filter unchanged.
    #[must_use]
    pub fn with_authors<I, S>(self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        authors
            .into_iter()
            .fold(self, |filter, author| filter.with_author(author))
    }

    /// Sets the start date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self> {
        let date = parse_date(date_str)?;
        self.start = Some(date.and_time(NaiveTime::MIN).and_utc());
        Ok(self)
    }

    /// Sets the end date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// The whole day is included.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self> {
        let date = parse_date(date_str)?;
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)
            .ok_or_else(|| AnalyzerError::invalid_date(date_str))?;
        self.end = Some(date.and_time(end_of_day).and_utc());
        Ok(self)
    }

    /// Sets the start timestamp directly.
    #[must_use]
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Sets the end timestamp directly.
    #[must_use]
    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Sets the bucket granularity.
    #[must_use]
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Returns `true` if an author or date filter is active.
    pub fn is_active(&self) -> bool {
        self.has_author_filter() || self.has_date_filter()
    }

    /// Returns `true` if date filters are active.
    pub fn has_date_filter(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Returns `true` if an author allow-list is active.
    pub fn has_author_filter(&self) -> bool {
        self.authors.as_ref().is_some_and(|a| !a.is_empty())
    }

    /// Checks that the date range is not inverted.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidRange`] if `start > end`.
    pub fn validate(&self) -> Result<()> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => {
                Err(AnalyzerError::invalid_range(start, end))
            }
            _ => Ok(()),
        }
    }

    /// Returns `true` if the message passes the author and date bounds.
    ///
    /// Does not look at `is_system`; see [`select`](Self::select).
    pub fn matches(&self, msg: &Message) -> bool {
        if let Some(authors) = self.authors.as_ref().filter(|a| !a.is_empty()) {
            if !authors.contains(msg.author()) {
                return false;
            }
        }
        if self.start.is_some_and(|start| msg.timestamp < start) {
            return false;
        }
        if self.end.is_some_and(|end| msg.timestamp > end) {
            return false;
        }
        true
    }

    /// Validates the filter and selects the non-system messages it admits,
    /// in input order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidRange`] if `start > end`.
    pub fn select<'a>(&self, messages: &'a [Message]) -> Result<Vec<&'a Message>> {
        self.validate()?;
        Ok(messages
            .iter()
            .filter(|msg| !msg.is_system() && self.matches(msg))
            .collect())
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| AnalyzerError::invalid_date(date_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn msg(author: &str, day: u32) -> Message {
        Message::new(author, "x", Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_empty_filter_selects_everything_but_system() {
        let mut messages = vec![msg("Alice", 1), msg("Bob", 2)];
        messages.push(Message::system("System", "Alice added Bob", messages[0].timestamp));

        let selected = Filter::new().select(&messages).unwrap();
        assert_eq!(selected.len(), 2);
        assert!(!Filter::new().is_active());
    }

    #[test]
    fn test_author_filter_is_exact() {
        let messages = vec![msg("Alice", 1), msg("alice", 2), msg("Bob", 3)];
        let selected = Filter::new().with_author("Alice").select(&messages).unwrap();

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].author(), "Alice");
    }

    #[test]
    fn test_multiple_authors() {
        let messages = vec![msg("Alice", 1), msg("Bob", 2), msg("Carol", 3)];
        let filter = Filter::new().with_authors(["Alice", "Carol"]);
        assert_eq!(filter.select(&messages).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_author_list_is_no_filter() {
        let messages = vec![msg("Alice", 1), msg("Bob", 2)];
        let filter = Filter::new().with_authors(Vec::<String>::new());
        assert!(!filter.has_author_filter());
        assert_eq!(filter.select(&messages).unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_author_yields_empty() {
        let messages = vec![msg("Alice", 1)];
        let selected = Filter::new().with_author("Zed").select(&messages).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_date_bounds_inclusive() {
        let messages = vec![msg("Alice", 1), msg("Alice", 10), msg("Alice", 20)];
        let filter = Filter::new()
            .with_date_from("2024-06-10")
            .unwrap()
            .with_date_to("2024-06-20")
            .unwrap();

        let selected = filter.select(&messages).unwrap();
        assert_eq!(selected.len(), 2);
        assert!(filter.has_date_filter());
    }

    #[test]
    fn test_invalid_date_string() {
        let err = Filter::new().with_date_from("15/06/2024").unwrap_err();
        assert!(err.is_invalid_date());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let filter = Filter::new()
            .with_date_from("2024-06-20")
            .unwrap()
            .with_date_to("2024-06-10")
            .unwrap();
        assert!(filter.validate().unwrap_err().is_invalid_range());
        assert!(filter.select(&[msg("Alice", 15)]).unwrap_err().is_invalid_range());
    }

    #[test]
    fn test_same_day_range_is_valid() {
        let filter = Filter::new()
            .with_date_from("2024-06-10")
            .unwrap()
            .with_date_to("2024-06-10")
            .unwrap();
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_filter_serde() {
        let filter: Filter =
            serde_json::from_str(r#"{"authors":["Alice"],"granularity":"week"}"#).unwrap();
        assert!(filter.has_author_filter());
        assert_eq!(filter.granularity, Granularity::Week);
    }
}
