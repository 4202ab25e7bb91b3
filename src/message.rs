//! Canonical message type produced by the transcript parser.
//!
//! This module provides [`Message`], one record of the event stream every
//! analyzer consumes. The parser creates messages once; afterwards they are
//! only read, never edited.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```
//! use chatmetrics::Message;
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
//! let msg = Message::new("Alice", "Hello, world!", ts);
//! assert_eq!(msg.author(), "Alice");
//! assert_eq!(msg.content(), "Hello, world!");
//! assert!(!msg.is_media());
//! ```
//!
//! ## Media Placeholders
//!
//! ```
//! use chatmetrics::Message;
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 31, 0).unwrap();
//! let msg = Message::media("Bob", ts);
//! assert!(msg.is_media());
//! assert!(msg.content().is_empty());
//! ```
//!
//! ## Serialization
//!
//! ```
//! use chatmetrics::Message;
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
//! let msg = Message::new("Alice", "Hello!", ts);
//! let json = serde_json::to_string(&msg)?;
//! let parsed: Message = serde_json::from_str(&json)?;
//!
//! assert_eq!(msg, parsed);
//! # Ok::<(), serde_json::Error>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a parsed chat transcript.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `timestamp` | `DateTime<Utc>` | When the message was sent (export-local time) |
/// | `author` | `String` | Author label exactly as it appears in the export |
/// | `content` | `String` | Text body, may span several lines |
/// | `is_system` | `bool` | Membership, encryption or administrative event |
/// | `is_media` | `bool` | Attachment placeholder; `content` is empty |
///
/// Exports carry no timezone, so timestamps are the naive local wall clock
/// stored as UTC. Ordering within a transcript follows the input, not the
/// timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// When the message was sent.
    pub timestamp: DateTime<Utc>,

    /// Author label. Never normalized or deduplicated.
    pub author: String,

    /// Text content of the message.
    ///
    /// Continuation lines of multi-line messages are joined with `\n`.
    pub content: String,

    /// Membership, encryption notice or other administrative event.
    #[serde(default)]
    pub is_system: bool,

    /// Attachment placeholder ("<Media omitted>", "immagine omessa", ...).
    #[serde(default)]
    pub is_media: bool,
}

impl Message {
    /// Creates a regular text message.
    pub fn new(
        author: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            author: author.into(),
            content: content.into(),
            is_system: false,
            is_media: false,
        }
    }

    /// Creates a media placeholder message with empty content.
    pub fn media(author: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            is_media: true,
            ..Self::new(author, "", timestamp)
        }
    }

    /// Creates a system event.
    pub fn system(
        author: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            is_system: true,
            ..Self::new(author, content, timestamp)
        }
    }

    /// Returns a copy of this message attributed to another author.
    ///
    /// Used when a caller merges author labels: aggregation is re-run over
    /// the relabeled stream instead of combining finished statistics.
    #[must_use]
    pub fn relabeled(&self, author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..self.clone()
        }
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    /// Returns the author label.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the message content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns `true` for system events.
    pub fn is_system(&self) -> bool {
        self.is_system
    }

    /// Returns `true` for attachment placeholders.
    pub fn is_media(&self) -> bool {
        self.is_media
    }

    /// Returns `true` if this message carries analyzable text: not a system
    /// event, not media, and not blank.
    pub fn has_text(&self) -> bool {
        !self.is_system && !self.is_media && !self.content.trim().is_empty()
    }

    /// Length of the content in Unicode scalar values.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_message_new() {
        let msg = Message::new("Alice", "Hello", ts());
        assert_eq!(msg.author(), "Alice");
        assert_eq!(msg.content(), "Hello");
        assert_eq!(msg.timestamp(), ts());
        assert!(!msg.is_system());
        assert!(!msg.is_media());
    }

    #[test]
    fn test_media_and_system_constructors() {
        let media = Message::media("Bob", ts());
        assert!(media.is_media());
        assert!(media.content().is_empty());
        assert!(!media.has_text());

        let system = Message::system("Alice", "Alice added Bob", ts());
        assert!(system.is_system());
        assert!(!system.has_text());
    }

    #[test]
    fn test_has_text() {
        assert!(Message::new("Alice", "hi", ts()).has_text());
        assert!(!Message::new("Alice", "   ", ts()).has_text());
    }

    #[test]
    fn test_char_len_counts_scalars() {
        let msg = Message::new("Alice", "perché 😀", ts());
        assert_eq!(msg.char_len(), 8);
        assert!(msg.content().len() > 8);
    }

    #[test]
    fn test_relabeled_keeps_everything_else() {
        let msg = Message::new("Alice", "ciao", ts());
        let relabeled = msg.relabeled("Ali");
        assert_eq!(relabeled.author(), "Ali");
        assert_eq!(relabeled.content(), "ciao");
        assert_eq!(relabeled.timestamp(), ts());
        assert_eq!(msg.author(), "Alice");
    }

    #[test]
    fn test_message_deserialization_defaults_flags() {
        let json = r#"{"timestamp":"2024-06-15T12:00:00Z","author":"Bob","content":"Hi"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.author(), "Bob");
        assert!(!msg.is_system());
        assert!(!msg.is_media());
        assert_eq!(msg.timestamp(), ts());
    }
}
