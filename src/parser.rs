//! Parser trait for chat transcripts.
//!
//! A parser turns the raw text of an export into the ordered [`Message`]
//! stream every analyzer works on. Parsing is deterministic and never fails
//! because of a single malformed line; only a whole input that matches no
//! known line format is rejected.
//!
//! # Example
//!
//! ```rust
//! use chatmetrics::parser::Parser;
//! use chatmetrics::parsers::WhatsAppParser;
//!
//! let parser = WhatsAppParser::new();
//! let messages = parser.parse_str("15/01/2024, 10:30 - Alice: Hello\n15/01/2024, 10:31 - Bob: Hi")?;
//! assert_eq!(messages.len(), 2);
//! # Ok::<(), chatmetrics::AnalyzerError>(())
//! ```

use std::path::Path;

use crate::Message;
use crate::error::Result;

/// Trait for transcript parsers.
///
/// Implementors provide [`name`](Parser::name) and
/// [`parse_str`](Parser::parse_str); [`parse`](Parser::parse) reads a file
/// and delegates.
pub trait Parser: Send + Sync {
    /// Returns the human-readable name of this parser.
    fn name(&self) -> &'static str;

    /// Parses a transcript file.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected, as exports
    /// copied between devices are sometimes re-encoded badly.
    fn parse(&self, path: &Path) -> Result<Vec<Message>> {
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes);
        self.parse_str(&content)
    }

    /// Parses transcript text held in memory.
    fn parse_str(&self, content: &str) -> Result<Vec<Message>>;
}

/// Parses a WhatsApp transcript with the default configuration.
///
/// # Example
///
/// ```rust
/// let messages = chatmetrics::parser::parse("[1/15/24, 10:30:45 AM] Alice: Hello")?;
/// assert_eq!(messages[0].author(), "Alice");
/// # Ok::<(), chatmetrics::AnalyzerError>(())
/// ```
pub fn parse(content: &str) -> Result<Vec<Message>> {
    crate::parsers::WhatsAppParser::new().parse_str(content)
}
