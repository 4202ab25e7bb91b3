//! One-call analysis of a snapshot.
//!
//! [`Analyzer`] is built once from an [`AnalysisConfig`]: that is where the
//! phrase dictionary is compiled and stopwords are loaded, so a broken data
//! file fails here and never mid-analysis. [`Analyzer::analyze`] then applies
//! a [`Filter`] once and runs every analyzer over the same selection.
//!
//! # Example
//!
//! ```
//! use chatmetrics::config::{AnalysisConfig, Language};
//! use chatmetrics::core::Filter;
//! use chatmetrics::report::Analyzer;
//! use chatmetrics::session::Snapshot;
//!
//! # fn main() -> chatmetrics::Result<()> {
//! let transcript = "\
//! 01/02/24, 21:00 - Marco: porco dio
//! 01/02/24, 21:01 - Luca: ahahah 😂";
//!
//! let analyzer = Analyzer::new(AnalysisConfig::new().with_language(Language::Italian))?;
//! let report = analyzer.analyze(&Snapshot::from(chatmetrics::parse(transcript)?), &Filter::new())?;
//!
//! assert_eq!(report.stats.total_messages, 2);
//! assert_eq!(report.bestemmiometro.total, 1);
//! assert_eq!(report.emoji.total_emojis, 1);
//! # Ok(())
//! # }
//! ```

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::{AnalysisConfig, Language};
use crate::core::bestemmiometro::{Bestemmiometro, BestemmiometroSummary, PhraseDictionary};
use crate::core::emoji::{EmojiAnalyzer, EmojiReport};
use crate::core::filter::Filter;
use crate::core::insights::{Insight, generate};
use crate::core::stats::{StatsReport, aggregate_selected};
use crate::core::words::{Stopwords, WordAnalyzer, WordFrequencyReport};
use crate::error::Result;
use crate::session::Snapshot;

/// Everything computed for one filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Activity statistics.
    pub stats: StatsReport,
    /// Ranked words.
    pub words: WordFrequencyReport,
    /// Emoji usage.
    pub emoji: EmojiReport,
    /// Profanity summary.
    pub bestemmiometro: BestemmiometroSummary,
    /// Natural-language observations.
    pub insights: Vec<Insight>,
}

/// Compiled analysis pipeline.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    words: WordAnalyzer,
    emoji: EmojiAnalyzer,
    bestemmiometro: Bestemmiometro,
}

impl Analyzer {
    /// Loads data files and compiles the phrase matcher.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Configuration`](crate::AnalyzerError::Configuration)
    /// if the dictionary or stopword file cannot be read, is empty, or
    /// fails to compile.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let start = Instant::now();

        let dictionary = match &config.dictionary_path {
            Some(path) => PhraseDictionary::from_file(path, config.language)?,
            None => PhraseDictionary::bundled(config.language)?,
        };
        let stopwords = match &config.stopwords_path {
            Some(path) => Stopwords::from_file(path)?,
            None => Stopwords::bundled(),
        };

        let bestemmiometro = Bestemmiometro::new(&dictionary)?
            .with_top_phrases(config.top_phrases)
            .with_max_streaks(config.max_streaks)
            .with_max_climax_samples(config.max_climax_samples);

        tracing::info!(
            language = %config.language,
            phrases = dictionary.len(),
            stopwords = stopwords.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "analyzer ready"
        );

        Ok(Self {
            words: WordAnalyzer::new(stopwords),
            emoji: EmojiAnalyzer::new(config.top_emojis, config.top_emojis_per_author),
            bestemmiometro,
            config,
        })
    }

    /// Analyzer with default limits and the bundled data for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Configuration`](crate::AnalyzerError::Configuration)
    /// if the bundled data fails to compile.
    pub fn bundled(language: Language) -> Result<Self> {
        Self::new(AnalysisConfig::new().with_language(language))
    }

    /// The configuration this analyzer was built from.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Runs every analyzer over the messages of `snapshot` that `filter` admits.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidRange`](crate::AnalyzerError::InvalidRange)
    /// if the filter's start lies after its end.
    pub fn analyze(&self, snapshot: &Snapshot, filter: &Filter) -> Result<AnalysisReport> {
        let start = Instant::now();
        let selected = filter.select(snapshot.messages())?;

        let stats = aggregate_selected(&selected, filter.granularity);
        let words = self.words.top_words_selected(
            &selected,
            self.config.word_limit,
            self.config.min_word_length,
        );
        let emoji = self.emoji.analyze_selected(&selected);
        let bestemmiometro = self
            .bestemmiometro
            .detect_selected(&selected, filter.granularity);
        let insights = generate(
            &stats,
            Some(&words),
            Some(&bestemmiometro),
            self.config.language,
        );

        tracing::info!(
            messages = snapshot.len(),
            selected = selected.len(),
            authors = stats.total_authors,
            matches = bestemmiometro.total,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "analysis complete"
        );

        Ok(AnalysisReport {
            stats,
            words,
            emoji,
            bestemmiometro,
            insights,
        })
    }
}
