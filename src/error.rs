//! Unified error types for chatmetrics.
//!
//! This module provides a single [`AnalyzerError`] enum that covers all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging
//!
//! Only whole-input conditions are errors. A single malformed line inside an
//! otherwise valid transcript is never reported; it is folded into the
//! previous message or dropped by the parser.

use std::io;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A specialized [`Result`] type for chatmetrics operations.
///
/// # Example
///
/// ```rust
/// use chatmetrics::error::Result;
/// use chatmetrics::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// The error type for all chatmetrics operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalyzerError {
    /// An I/O error occurred while reading a transcript or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No line of the input matched a known transcript line format.
    ///
    /// The upload should be rejected; nothing is cached.
    #[error("Unrecognized transcript format: {message}")]
    UnrecognizedFormat {
        /// Description of what was expected
        message: String,
    },

    /// Invalid date string in filter configuration.
    ///
    /// Date filters expect YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// The filter's start bound lies after its end bound.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Inclusive start bound
        start: DateTime<Utc>,
        /// Inclusive end bound
        end: DateTime<Utc>,
    },

    /// Bundled or user supplied data (phrase dictionary, stopwords, config)
    /// failed to load or compile.
    #[error("Configuration error in {context}: {message}")]
    Configuration {
        /// What was being loaded
        context: String,
        /// Description of the failure
        message: String,
    },

    /// The requested session snapshot is missing or has expired.
    #[error("Session '{key}' has expired or does not exist; please re-upload the transcript")]
    SessionExpired {
        /// Session key that was looked up
        key: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl AnalyzerError {
    /// Creates an unrecognized format error.
    pub fn unrecognized_format(message: impl Into<String>) -> Self {
        AnalyzerError::UnrecognizedFormat {
            message: message.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        AnalyzerError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates an invalid range error.
    pub fn invalid_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        AnalyzerError::InvalidRange { start, end }
    }

    /// Creates a configuration error.
    pub fn configuration(context: impl Into<String>, message: impl Into<String>) -> Self {
        AnalyzerError::Configuration {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Creates a session expired error.
    pub fn session_expired(key: impl Into<String>) -> Self {
        AnalyzerError::SessionExpired { key: key.into() }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, AnalyzerError::Io(_))
    }

    /// Returns `true` if the transcript format was not recognized.
    pub fn is_unrecognized_format(&self) -> bool {
        matches!(self, AnalyzerError::UnrecognizedFormat { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, AnalyzerError::InvalidDate { .. })
    }

    /// Returns `true` if the filter range was inverted.
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, AnalyzerError::InvalidRange { .. })
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AnalyzerError::Configuration { .. })
    }

    /// Returns `true` if the session snapshot is gone.
    ///
    /// Callers should treat this as recoverable and ask for a re-upload.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, AnalyzerError::SessionExpired { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = AnalyzerError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_unrecognized_format_display() {
        let err = AnalyzerError::unrecognized_format("no line matched");
        assert!(err.to_string().contains("Unrecognized transcript format"));
        assert!(err.to_string().contains("no line matched"));
    }

    #[test]
    fn test_invalid_date_display() {
        let err = AnalyzerError::invalid_date("not-a-date");
        let display = err.to_string();
        assert!(display.contains("not-a-date"));
        assert!(display.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_invalid_range_display() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let err = AnalyzerError::invalid_range(start, end);
        let display = err.to_string();
        assert!(display.contains("2024-06-01"));
        assert!(display.contains("2024-01-01"));
    }

    #[test]
    fn test_configuration_display() {
        let err = AnalyzerError::configuration("phrase dictionary", "dictionary is empty");
        let display = err.to_string();
        assert!(display.contains("phrase dictionary"));
        assert!(display.contains("dictionary is empty"));
    }

    #[test]
    fn test_session_expired_display() {
        let err = AnalyzerError::session_expired("abc");
        assert!(err.to_string().contains("abc"));
        assert!(err.to_string().contains("re-upload"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = AnalyzerError::from(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_is_methods() {
        let io_err = AnalyzerError::Io(io::Error::new(io::ErrorKind::NotFound, ""));
        assert!(io_err.is_io());
        assert!(!io_err.is_unrecognized_format());
        assert!(!io_err.is_invalid_date());
        assert!(!io_err.is_session_expired());

        let date_err = AnalyzerError::invalid_date("bad");
        assert!(date_err.is_invalid_date());
        assert!(!date_err.is_invalid_range());

        let cfg_err = AnalyzerError::configuration("stopwords", "unreadable");
        assert!(cfg_err.is_configuration());

        let session_err = AnalyzerError::session_expired("k");
        assert!(session_err.is_session_expired());
    }

    #[cfg(feature = "json-output")]
    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: AnalyzerError = json_err.into();
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_error_debug() {
        let err = AnalyzerError::invalid_date("bad");
        let debug = format!("{:?}", err);
        assert!(debug.contains("InvalidDate"));
    }
}
