//! Configuration types for parsing and analysis.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`ParserConfig`] - transcript parsing settings
//! - [`AnalysisConfig`] - limits and data sources for the analyzers
//! - [`Language`] - selects the bundled dictionary and insight wording
//!
//! # Example
//!
//! ```rust
//! use chatmetrics::config::{AnalysisConfig, Language, ParserConfig};
//!
//! let parser = ParserConfig::new().with_skip_system_messages(false);
//! let analysis = AnalysisConfig::new()
//!     .with_language(Language::Italian)
//!     .with_word_limit(50)
//!     .with_min_word_length(3);
//!
//! assert!(!parser.skip_system_messages);
//! assert_eq!(analysis.word_limit, 50);
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Day/month order of numeric dates in an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `DD/MM/YY` (European, Italian exports)
    DayFirst,
    /// `MM/DD/YY` (US exports)
    MonthFirst,
}

/// Configuration for transcript parsing.
///
/// # Example
///
/// ```rust
/// use chatmetrics::config::{DateOrder, ParserConfig};
///
/// let config = ParserConfig::new()
///     .with_preamble_lines(0)
///     .with_date_order(DateOrder::MonthFirst);
/// assert_eq!(config.date_order, Some(DateOrder::MonthFirst));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Maximum number of leading non-message lines treated as preamble
    /// (group name, encryption notice, creation events) (default: 5)
    pub preamble_lines: usize,

    /// Drop system events instead of emitting them with `is_system` (default: true)
    pub skip_system_messages: bool,

    /// Force a day/month order instead of auto-detecting it (default: None)
    #[serde(default)]
    pub date_order: Option<DateOrder>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            preamble_lines: 5,
            skip_system_messages: true,
            date_order: None,
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum preamble length.
    #[must_use]
    pub fn with_preamble_lines(mut self, lines: usize) -> Self {
        self.preamble_lines = lines;
        self
    }

    /// Sets whether to drop system events.
    #[must_use]
    pub fn with_skip_system_messages(mut self, skip: bool) -> Self {
        self.skip_system_messages = skip;
        self
    }

    /// Pins the day/month order.
    #[must_use]
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = Some(order);
        self
    }
}

/// Language of the transcript.
///
/// Selects the bundled phrase dictionary and the wording of insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English: swear-word dictionary, English insight templates
    #[default]
    #[serde(alias = "en")]
    #[cfg_attr(feature = "cli", value(alias = "en"))]
    English,
    /// Italian: Bestemmiometro dictionary, Italian insight templates
    #[serde(alias = "it")]
    #[cfg_attr(feature = "cli", value(alias = "it"))]
    Italian,
}

impl Language {
    /// Returns the ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Italian => "it",
        }
    }

    /// Returns all supported language names (including aliases).
    pub fn all_names() -> &'static [&'static str] {
        &["english", "en", "italian", "it"]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "italian" | "italiano" | "it" => Ok(Language::Italian),
            _ => Err(format!(
                "Unknown language: '{}'. Expected one of: {}",
                s,
                Language::all_names().join(", ")
            )),
        }
    }
}

/// Configuration for the analyzers.
///
/// Limits only bound what is *reported*; totals are always computed over
/// every message that passes the filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Transcript language (default: English)
    pub language: Language,

    /// Maximum ranked words returned (default: 100)
    pub word_limit: usize,

    /// Minimum token length in characters (default: 1)
    pub min_word_length: usize,

    /// Emoji in the global top list (default: 30)
    pub top_emojis: usize,

    /// Emoji in each author's top list (default: 10)
    pub top_emojis_per_author: usize,

    /// Phrases in the Bestemmiometro top list (default: 20)
    pub top_phrases: usize,

    /// Consecutive streaks reported (default: 10)
    pub max_streaks: usize,

    /// Climax instances kept as samples (default: 50)
    pub max_climax_samples: usize,

    /// Phrase dictionary file replacing the bundled one (default: None)
    pub dictionary_path: Option<PathBuf>,

    /// Stopword file replacing the bundled one (default: None)
    pub stopwords_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            word_limit: 100,
            min_word_length: 1,
            top_emojis: 30,
            top_emojis_per_author: 10,
            top_phrases: 20,
            max_streaks: 10,
            max_climax_samples: 50,
            dictionary_path: None,
            stopwords_path: None,
        }
    }
}

impl AnalysisConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the transcript language.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Sets the maximum number of ranked words.
    #[must_use]
    pub fn with_word_limit(mut self, limit: usize) -> Self {
        self.word_limit = limit;
        self
    }

    /// Sets the minimum token length.
    #[must_use]
    pub fn with_min_word_length(mut self, length: usize) -> Self {
        self.min_word_length = length;
        self
    }

    /// Sets the size of the global emoji top list.
    #[must_use]
    pub fn with_top_emojis(mut self, count: usize) -> Self {
        self.top_emojis = count;
        self
    }

    /// Sets the number of reported streaks.
    #[must_use]
    pub fn with_max_streaks(mut self, count: usize) -> Self {
        self.max_streaks = count;
        self
    }

    /// Sets the number of climax samples.
    #[must_use]
    pub fn with_max_climax_samples(mut self, count: usize) -> Self {
        self.max_climax_samples = count;
        self
    }

    /// Uses a phrase dictionary file instead of the bundled one.
    #[must_use]
    pub fn with_dictionary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dictionary_path = Some(path.into());
        self
    }

    /// Uses a stopword file instead of the bundled one.
    #[must_use]
    pub fn with_stopwords_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.stopwords_path = Some(path.into());
        self
    }
}
