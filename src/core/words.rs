//! Word frequency ranking.
//!
//! Text bodies are tokenized after removing URLs and e-mail addresses;
//! tokens are lower-cased runs of Unicode word characters. Tokens shorter
//! than the minimum length or present in the stopword set are dropped before
//! counting, so `frequency` is a share of the *kept* tokens.
//!
//! # Example
//!
//! ```
//! use chatmetrics::core::filter::Filter;
//! use chatmetrics::core::words::WordAnalyzer;
//! use chatmetrics::Message;
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> chatmetrics::Result<()> {
//! let ts = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
//! let messages = vec![
//!     Message::new("Alice", "Pizza stasera? Pizza!", ts),
//!     Message::new("Bob", "pizza e birra", ts),
//! ];
//!
//! let report = WordAnalyzer::bundled().top_words(&messages, &Filter::new(), 10, 1)?;
//! assert_eq!(report.words[0].word, "pizza");
//! assert_eq!(report.words[0].count, 3);
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Message;
use crate::core::filter::Filter;
use crate::error::{AnalyzerError, Result};

/// Bundled Italian + English stopword list.
pub const BUNDLED_STOPWORDS: &str = include_str!("../../data/stopwords.txt");

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://\S+|www\.\S+").expect("url pattern"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+").expect("email pattern"));
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("word pattern"));

/// A set of words excluded from ranking.
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// The bundled Italian + English list.
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_STOPWORDS)
    }

    /// Parses a list with one word per line; `#` starts a comment line.
    pub fn parse(text: &str) -> Self {
        let words = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    /// Loads a list from a file.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Configuration`] if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AnalyzerError::configuration(format!("stopwords file {}", path.display()), e.to_string())
        })?;
        Ok(Self::parse(&text))
    }

    /// Returns `true` if `word` (already lower-cased) is a stopword.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of stopwords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Splits text into lower-cased word tokens, skipping URLs and e-mails.
pub fn tokenize(text: &str) -> Vec<String> {
    let without_urls = URL.replace_all(text, " ");
    let cleaned = EMAIL.replace_all(&without_urls, " ");
    let lower = cleaned.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// One ranked word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordFrequencyItem {
    /// Lower-cased token.
    pub word: String,
    /// Occurrences.
    pub count: usize,
    /// `count / total_words`, in `[0, 1]`.
    pub frequency: f64,
}

/// Ranked words and totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WordFrequencyReport {
    /// Top words, count descending then word ascending.
    pub words: Vec<WordFrequencyItem>,
    /// Kept tokens across the selection.
    pub total_words: usize,
    /// Distinct kept tokens.
    pub unique_words: usize,
}

/// Word frequency analyzer holding a stopword set.
#[derive(Debug, Clone)]
pub struct WordAnalyzer {
    stopwords: Stopwords,
}

impl WordAnalyzer {
    /// Creates an analyzer with the given stopwords.
    pub fn new(stopwords: Stopwords) -> Self {
        Self { stopwords }
    }

    /// Creates an analyzer with the bundled stopwords.
    pub fn bundled() -> Self {
        Self::new(Stopwords::bundled())
    }

    /// Returns the stopword set.
    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }

    /// Ranks words in the messages `filter` admits.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidRange`] if the filter range is inverted.
    pub fn top_words(
        &self,
        messages: &[Message],
        filter: &Filter,
        limit: usize,
        min_length: usize,
    ) -> Result<WordFrequencyReport> {
        let selected = filter.select(messages)?;
        Ok(self.top_words_selected(&selected, limit, min_length))
    }

    /// Ranks words over an already filtered selection.
    pub fn top_words_selected(
        &self,
        selected: &[&Message],
        limit: usize,
        min_length: usize,
    ) -> WordFrequencyReport {
        let mut counts: HashMap<String, usize> = HashMap::new();

        for msg in selected.iter().filter(|m| m.has_text()) {
            for token in tokenize(msg.content()) {
                if token.chars().count() < min_length || self.stopwords.contains(&token) {
                    continue;
                }
                *counts.entry(token).or_insert(0) += 1;
            }
        }

        let total_words: usize = counts.values().sum();
        let unique_words = counts.len();

        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);

        let words = ranked
            .into_iter()
            .map(|(word, count)| WordFrequencyItem {
                frequency: count as f64 / total_words as f64,
                word,
                count,
            })
            .collect();

        WordFrequencyReport {
            words,
            total_words,
            unique_words,
        }
    }
}

impl Default for WordAnalyzer {
    fn default() -> Self {
        Self::bundled()
    }
}

/// Ranks words with the bundled stopwords.
///
/// # Errors
///
/// Returns [`AnalyzerError::InvalidRange`] if the filter range is inverted.
pub fn top_words(
    messages: &[Message],
    filter: &Filter,
    limit: usize,
    min_length: usize,
) -> Result<WordFrequencyReport> {
    WordAnalyzer::bundled().top_words(messages, filter, limit, min_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn msgs(texts: &[(&str, &str)]) -> Vec<Message> {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        texts
            .iter()
            .map(|(author, text)| Message::new(*author, *text, ts))
            .collect()
    }

    #[test]
    fn test_tokenize_strips_urls_emails_punctuation() {
        let tokens = tokenize("Guarda https://example.com/x?y=1 e scrivi a mario@rossi.it, PERCHÉ no!");
        assert_eq!(tokens, vec!["guarda", "e", "scrivi", "a", "perché", "no"]);
    }

    #[test]
    fn test_tokenize_apostrophes_split() {
        assert_eq!(tokenize("l'amico dell'anno"), vec!["l", "amico", "dell", "anno"]);
    }

    #[test]
    fn test_stopwords_bundled() {
        let stopwords = Stopwords::bundled();
        assert!(stopwords.contains("il"));
        assert!(stopwords.contains("the"));
        assert!(stopwords.contains("perché"));
        assert!(!stopwords.contains("pizza"));
        assert!(!stopwords.contains("# combined italian + english stopwords."));
    }

    #[test]
    fn test_ranking_ties_alphabetical() {
        let messages = msgs(&[("A", "zebra mela zebra mela banana")]);
        let report = top_words(&messages, &Filter::new(), 10, 1).unwrap();

        let ranked: Vec<&str> = report.words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(ranked, vec!["mela", "zebra", "banana"]);
    }

    #[test]
    fn test_frequency_is_share_of_kept_tokens() {
        let messages = msgs(&[("A", "il gatto il gatto il cane")]);
        let report = top_words(&messages, &Filter::new(), 10, 1).unwrap();

        assert_eq!(report.total_words, 3);
        assert_eq!(report.unique_words, 2);
        let gatto = &report.words[0];
        assert_eq!(gatto.word, "gatto");
        assert!((gatto.frequency - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_length_counts_chars() {
        let messages = msgs(&[("A", "però già xyz")]);
        let analyzer = WordAnalyzer::new(Stopwords::default());
        let selected: Vec<&Message> = messages.iter().collect();
        let report = analyzer.top_words_selected(&selected, 10, 4);

        let ranked: Vec<&str> = report.words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(ranked, vec!["però"]);
    }

    #[test]
    fn test_limit_truncates_but_totals_do_not() {
        let messages = msgs(&[("A", "uno due tre quattro cinque")]);
        let analyzer = WordAnalyzer::new(Stopwords::default());
        let report = analyzer.top_words(&messages, &Filter::new(), 2, 1).unwrap();

        assert_eq!(report.words.len(), 2);
        assert_eq!(report.unique_words, 5);
    }

    #[test]
    fn test_media_and_system_ignored() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let mut media = Message::media("A", ts);
        media.content = "hidden".into();
        let messages = vec![
            media,
            Message::system("A", "Alice added Bob", ts),
            Message::new("B", "visible", ts),
        ];
        let report = top_words(&messages, &Filter::new(), 10, 1).unwrap();

        assert_eq!(report.total_words, 1);
        assert_eq!(report.words[0].word, "visible");
    }

    #[test]
    fn test_author_filter() {
        let messages = msgs(&[("Alice", "mare"), ("Bob", "montagna")]);
        let report = top_words(&messages, &Filter::new().with_author("Bob"), 10, 1).unwrap();
        assert_eq!(report.words[0].word, "montagna");
        assert_eq!(report.total_words, 1);
    }

    #[test]
    fn test_empty_report() {
        let report = top_words(&[], &Filter::new(), 10, 1).unwrap();
        assert!(report.words.is_empty());
        assert_eq!(report.total_words, 0);
    }

    #[test]
    fn test_stopwords_from_missing_file() {
        let err = Stopwords::from_file(Path::new("/no/such/stopwords.txt")).unwrap_err();
        assert!(err.is_configuration());
    }
}
