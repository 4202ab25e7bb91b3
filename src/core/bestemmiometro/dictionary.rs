//! Phrase dictionaries.
//!
//! A dictionary is plain data: one phrase per line, `#` comment lines,
//! blank lines ignored. Phrases are lower-cased and whitespace-normalized,
//! and duplicates are dropped keeping the first occurrence.

use std::collections::HashSet;
use std::path::Path;

use regex::escape;

use crate::config::Language;
use crate::error::{AnalyzerError, Result};

/// Bundled Italian dictionary (Bestemmiometro).
pub const BUNDLED_ITALIAN: &str = include_str!("../../../data/bestemmie.txt");

/// Bundled English dictionary (swear words).
pub const BUNDLED_ENGLISH: &str = include_str!("../../../data/swearwords.txt");

/// Inflections accepted after a single English word (`fuck` → `fucking`).
const ENGLISH_SUFFIXES: &str = "(?:s|es|ed|er|ers|ing|in|y|ty)?";

/// A dictionary entry: an ordered tuple of words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    text: String,
    words: Vec<String>,
}

impl Phrase {
    fn new(line: &str) -> Option<Self> {
        let words: Vec<String> = line.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return None;
        }
        Some(Self {
            text: words.join(" "),
            words,
        })
    }

    /// Canonical form: lower-cased words joined by single spaces.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The words of the phrase.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Returns `true` for entries of two or more words.
    pub fn is_multi_word(&self) -> bool {
        self.words.len() > 1
    }

    /// Regex source matching this phrase in lower-cased text.
    ///
    /// Multi-word phrases accept any run of non-word characters between the
    /// words, including none (`porco dio`, `porco-dio`, `porcodio`), and a
    /// repeated final letter on each word (`porcodioooo`). Every phrase is
    /// bounded by word boundaries, so `addio canestro` is not `dio cane`;
    /// `allow_suffixes` additionally accepts common English inflections on
    /// single words.
    ///
    /// ```
    /// use chatmetrics::config::Language;
    /// use chatmetrics::core::bestemmiometro::PhraseDictionary;
    ///
    /// # fn main() -> chatmetrics::Result<()> {
    /// let dict = PhraseDictionary::parse("dio cane", Language::Italian)?;
    /// assert_eq!(dict.phrases()[0].pattern(false), r"\bdio+[\W_]*cane+\b");
    /// # Ok(())
    /// # }
    /// ```
    pub fn pattern(&self, allow_suffixes: bool) -> String {
        if self.is_multi_word() {
            let body = self
                .words
                .iter()
                .map(|w| elongated(w))
                .collect::<Vec<_>>()
                .join(r"[\W_]*");
            format!(r"\b{body}\b")
        } else if allow_suffixes {
            format!(r"\b{}{}\b", escape(&self.text), ENGLISH_SUFFIXES)
        } else {
            format!(r"\b{}\b", escape(&self.text))
        }
    }
}

/// Escaped `word` whose last character may repeat.
fn elongated(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next_back() {
        Some(last) => format!("{}{}+", escape(chars.as_str()), escape(&last.to_string())),
        None => String::new(),
    }
}

/// An ordered, deduplicated set of target phrases.
#[derive(Debug, Clone)]
pub struct PhraseDictionary {
    language: Language,
    phrases: Vec<Phrase>,
}

impl PhraseDictionary {
    /// Parses dictionary text.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Configuration`] if no phrase remains.
    ///
    /// # Example
    ///
    /// ```
    /// use chatmetrics::config::Language;
    /// use chatmetrics::core::bestemmiometro::PhraseDictionary;
    ///
    /// # fn main() -> chatmetrics::Result<()> {
    /// let dict = PhraseDictionary::parse("# comment\nporco dio\nPORCO  DIO\ndio cane\n", Language::Italian)?;
    /// assert_eq!(dict.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn parse(text: &str, language: Language) -> Result<Self> {
        let mut seen = HashSet::new();
        let phrases: Vec<Phrase> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(Phrase::new)
            .filter(|phrase| seen.insert(phrase.text.clone()))
            .collect();

        if phrases.is_empty() {
            return Err(AnalyzerError::configuration(
                "phrase dictionary",
                "dictionary contains no phrases",
            ));
        }

        Ok(Self { language, phrases })
    }

    /// Loads the bundled dictionary for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Configuration`] if the bundled data is empty.
    pub fn bundled(language: Language) -> Result<Self> {
        let text = match language {
            Language::Italian => BUNDLED_ITALIAN,
            Language::English => BUNDLED_ENGLISH,
        };
        Self::parse(text, language)
    }

    /// Loads a dictionary from a file.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Configuration`] if the file cannot be read or
    /// contains no phrases.
    pub fn from_file(path: &Path, language: Language) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AnalyzerError::configuration(format!("phrase dictionary {}", path.display()), e.to_string())
        })?;
        Self::parse(&text, language)
    }

    /// Language the dictionary targets.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Phrases in file order.
    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    /// Whether single-word entries accept inflection suffixes.
    pub fn allows_suffixes(&self) -> bool {
        self.language == Language::English
    }

    /// Number of phrases.
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Always `false`: an empty dictionary cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}
