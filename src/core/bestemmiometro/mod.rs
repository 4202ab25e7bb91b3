//! The Bestemmiometro: phrase matching, climax scoring and streaks.
//!
//! | Part | Module |
//! |------|--------|
//! | Dictionary loading | [`dictionary`] |
//! | Compiled matcher | [`matcher`] |
//! | Vowel elongation | [`climax`] |
//! | Consecutive runs | [`streak`] |
//!
//! [`Bestemmiometro`] is built once from a [`PhraseDictionary`] and then run
//! against any number of filtered selections. A transcript without matches
//! yields an all-zero [`BestemmiometroSummary`], never an error.
//!
//! # Example
//!
//! ```
//! use chatmetrics::config::Language;
//! use chatmetrics::core::bestemmiometro::Bestemmiometro;
//! use chatmetrics::core::filter::Filter;
//! use chatmetrics::Message;
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> chatmetrics::Result<()> {
//! let ts = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
//! let messages = vec![
//!     Message::new("Marco", "porco dio", ts),
//!     Message::new("Marco", "PORCODIOOOO", ts),
//!     Message::new("Luca", "calma", ts),
//! ];
//!
//! let detector = Bestemmiometro::bundled(Language::Italian)?;
//! let summary = detector.detect(&messages, &Filter::new())?;
//!
//! assert_eq!(summary.total, 2);
//! assert_eq!(summary.by_author_total["Marco"], 2);
//! assert_eq!(summary.consecutive_streaks[0].count, 2);
//! assert_eq!(summary.climax_instances[0].repetitions, 4);
//! # Ok(())
//! # }
//! ```

pub mod climax;
pub mod dictionary;
pub mod matcher;
pub mod streak;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use dictionary::{Phrase, PhraseDictionary};
pub use matcher::PhraseMatcher;
pub use streak::{ConsecutiveStreak, StreakTracker};

use crate::Message;
use crate::config::Language;
use crate::core::bucket::{BucketCounts, BucketRange, Granularity, TimeSeriesPoint};
use crate::core::filter::Filter;
use crate::core::round2;
use crate::error::Result;

/// One occurrence of a phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseMatch {
    /// Canonical phrase.
    pub phrase: String,
    /// Author of the message.
    pub author: String,
    /// Timestamp of the message.
    pub timestamp: DateTime<Utc>,
}

/// A detected vowel elongation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimaxInstance {
    /// Author of the message.
    pub author: String,
    /// Timestamp of the message.
    pub timestamp: DateTime<Utc>,
    /// The word containing the run.
    pub text_snippet: String,
    /// Run length.
    pub repetitions: usize,
    /// `clamp(repetitions - 2, 1, 5)`.
    pub intensity: u8,
}

/// A phrase and its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseCount {
    /// Canonical phrase.
    pub phrase: String,
    /// Occurrences.
    pub count: usize,
}

/// Aggregated Bestemmiometro results.
///
/// Maps only contain non-zero entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BestemmiometroSummary {
    /// Dictionary language.
    pub language: Language,
    /// Total phrase occurrences.
    pub total: usize,
    /// Occurrences per phrase.
    pub by_phrase: BTreeMap<String, usize>,
    /// Most frequent phrases, count descending then phrase.
    pub top_phrases: Vec<PhraseCount>,
    /// Occurrences per author and phrase.
    pub by_author: BTreeMap<String, BTreeMap<String, usize>>,
    /// Occurrences per author.
    pub by_author_total: BTreeMap<String, usize>,
    /// Occurrences per 100 messages of each matching author.
    pub per_capita: BTreeMap<String, f64>,
    /// Occurrences per 100 messages over the whole selection.
    pub total_per_capita: f64,
    /// Occurrences per bucket, gap-filled; empty when nothing matched.
    pub timeline: Vec<TimeSeriesPoint>,
    /// Climax instances per author.
    pub climax_by_author: BTreeMap<String, usize>,
    /// Mean intensity of all climax instances, rounded to 2 decimals.
    pub avg_climax_intensity: f64,
    /// Longest consecutive streaks.
    pub consecutive_streaks: Vec<ConsecutiveStreak>,
    /// First climax instances, in stream order.
    pub climax_instances: Vec<ClimaxInstance>,
}

impl BestemmiometroSummary {
    /// Returns the author with the highest per-capita rate, ties by name.
    pub fn top_per_capita(&self) -> Option<(&str, f64)> {
        self.per_capita
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(author, rate)| (author.as_str(), *rate))
    }
}

/// Compiled phrase detector.
#[derive(Debug, Clone)]
pub struct Bestemmiometro {
    matcher: PhraseMatcher,
    language: Language,
    top_phrases: usize,
    max_streaks: usize,
    max_climax_samples: usize,
}

impl Bestemmiometro {
    /// Compiles a detector from `dictionary`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Configuration`](crate::AnalyzerError::Configuration)
    /// if a phrase fails to compile.
    pub fn new(dictionary: &PhraseDictionary) -> Result<Self> {
        let matcher = PhraseMatcher::compile(dictionary)?;
        tracing::debug!(
            phrases = matcher.len(),
            language = %dictionary.language(),
            "compiled phrase dictionary"
        );
        Ok(Self {
            matcher,
            language: dictionary.language(),
            top_phrases: 20,
            max_streaks: 10,
            max_climax_samples: 50,
        })
    }

    /// Compiles the bundled dictionary for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Configuration`](crate::AnalyzerError::Configuration)
    /// if the bundled dictionary fails to load or compile.
    pub fn bundled(language: Language) -> Result<Self> {
        Self::new(&PhraseDictionary::bundled(language)?)
    }

    /// Sets the size of the top-phrase list.
    #[must_use]
    pub fn with_top_phrases(mut self, count: usize) -> Self {
        self.top_phrases = count;
        self
    }

    /// Sets the number of reported streaks.
    #[must_use]
    pub fn with_max_streaks(mut self, count: usize) -> Self {
        self.max_streaks = count;
        self
    }

    /// Sets the number of climax samples kept.
    #[must_use]
    pub fn with_max_climax_samples(mut self, count: usize) -> Self {
        self.max_climax_samples = count;
        self
    }

    /// The compiled matcher.
    pub fn matcher(&self) -> &PhraseMatcher {
        &self.matcher
    }

    /// Every phrase occurrence in one message. Media and system messages
    /// never match.
    pub fn phrase_matches(&self, msg: &Message) -> Vec<PhraseMatch> {
        if !msg.has_text() {
            return Vec::new();
        }
        self.matcher
            .find(msg.content())
            .into_iter()
            .map(|phrase| PhraseMatch {
                phrase: phrase.to_string(),
                author: msg.author().to_string(),
                timestamp: msg.timestamp,
            })
            .collect()
    }

    /// Runs the detector over the messages `filter` admits.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidRange`](crate::AnalyzerError::InvalidRange)
    /// if the filter range is inverted.
    pub fn detect(&self, messages: &[Message], filter: &Filter) -> Result<BestemmiometroSummary> {
        let selected = filter.select(messages)?;
        Ok(self.detect_selected(&selected, filter.granularity))
    }

    /// Runs the detector over an already filtered selection.
    pub fn detect_selected(
        &self,
        selected: &[&Message],
        granularity: Granularity,
    ) -> BestemmiometroSummary {
        let mut by_phrase: HashMap<&str, usize> = HashMap::new();
        let mut by_author: HashMap<&str, HashMap<&str, usize>> = HashMap::new();
        let mut author_messages: HashMap<&str, usize> = HashMap::new();
        let mut timeline = BucketCounts::new(granularity);
        let mut streaks = StreakTracker::new();
        let mut climaxes: Vec<ClimaxInstance> = Vec::new();
        let mut total = 0usize;

        for msg in selected {
            *author_messages.entry(msg.author()).or_insert(0) += 1;

            if !msg.has_text() {
                streaks.close();
                continue;
            }

            let counts = self.matcher.count(msg.content());
            let matched: usize = counts.iter().map(|(_, n)| n).sum();

            for (index, occurrences) in counts {
                let phrase = self.matcher.phrase(index);
                *by_phrase.entry(phrase).or_insert(0) += occurrences;
                *by_author
                    .entry(msg.author())
                    .or_default()
                    .entry(phrase)
                    .or_insert(0) += occurrences;
            }

            if matched > 0 {
                total += matched;
                timeline.add_n(msg.timestamp, matched as u64);
            }
            streaks.observe(msg.author(), msg.timestamp, matched > 0);

            for run in climax::find_climaxes(msg.content()) {
                climaxes.push(ClimaxInstance {
                    author: msg.author().to_string(),
                    timestamp: msg.timestamp,
                    intensity: run.intensity(),
                    text_snippet: run.snippet,
                    repetitions: run.repetitions,
                });
            }
        }

        let by_author_total: BTreeMap<String, usize> = by_author
            .iter()
            .map(|(author, phrases)| ((*author).to_string(), phrases.values().sum()))
            .collect();

        let per_capita = by_author_total
            .iter()
            .map(|(author, count)| {
                let messages = author_messages.get(author.as_str()).copied().unwrap_or(0);
                (author.clone(), per_hundred(*count, messages))
            })
            .collect();

        let mut top_phrases: Vec<PhraseCount> = by_phrase
            .iter()
            .map(|(phrase, count)| PhraseCount {
                phrase: (*phrase).to_string(),
                count: *count,
            })
            .collect();
        top_phrases.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.phrase.cmp(&b.phrase)));
        top_phrases.truncate(self.top_phrases);

        let mut climax_by_author: BTreeMap<String, usize> = BTreeMap::new();
        for instance in &climaxes {
            *climax_by_author.entry(instance.author.clone()).or_insert(0) += 1;
        }
        let avg_climax_intensity = if climaxes.is_empty() {
            0.0
        } else {
            let sum: u64 = climaxes.iter().map(|c| u64::from(c.intensity)).sum();
            round2(sum as f64 / climaxes.len() as f64)
        };
        climaxes.truncate(self.max_climax_samples);

        let timeline = if total == 0 {
            Vec::new()
        } else {
            let range = BucketRange::spanning(granularity, selected.iter().map(|m| m.timestamp));
            timeline.series(range.as_ref())
        };

        BestemmiometroSummary {
            language: self.language,
            total,
            by_phrase: by_phrase
                .into_iter()
                .map(|(phrase, count)| (phrase.to_string(), count))
                .collect(),
            top_phrases,
            by_author: by_author
                .into_iter()
                .map(|(author, phrases)| {
                    let phrases = phrases
                        .into_iter()
                        .map(|(phrase, count)| (phrase.to_string(), count))
                        .collect();
                    (author.to_string(), phrases)
                })
                .collect(),
            by_author_total,
            per_capita,
            total_per_capita: per_hundred(total, selected.len()),
            timeline,
            climax_by_author,
            avg_climax_intensity,
            consecutive_streaks: streaks.finish(self.max_streaks),
            climax_instances: climaxes,
        }
    }
}

fn per_hundred(count: usize, messages: usize) -> f64 {
    if messages == 0 {
        0.0
    } else {
        round2(count as f64 / messages as f64 * 100.0)
    }
}

/// Runs the bundled dictionary for `language` with default limits.
///
/// # Errors
///
/// Returns a configuration error if the dictionary fails to compile, or
/// [`AnalyzerError::InvalidRange`](crate::AnalyzerError::InvalidRange) for an
/// inverted filter.
pub fn detect(
    messages: &[Message],
    filter: &Filter,
    language: Language,
) -> Result<BestemmiometroSummary> {
    Bestemmiometro::bundled(language)?.detect(messages, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 10, minute, 0).unwrap()
    }

    fn detector() -> Bestemmiometro {
        let dict = PhraseDictionary::parse("porco dio\ndio cane\nporca madonna", Language::Italian)
            .unwrap();
        Bestemmiometro::new(&dict).unwrap()
    }

    fn run(messages: &[Message]) -> BestemmiometroSummary {
        detector().detect(messages, &Filter::new()).unwrap()
    }

    #[test]
    fn test_zero_match_summary() {
        let messages = vec![
            Message::new("Alice", "buongiorno", at(1, 0)),
            Message::new("Bob", "ciao", at(1, 1)),
        ];
        let summary = run(&messages);

        assert_eq!(summary.total, 0);
        assert!(summary.by_phrase.is_empty());
        assert!(summary.top_phrases.is_empty());
        assert!(summary.by_author.is_empty());
        assert!(summary.per_capita.is_empty());
        assert!(summary.timeline.is_empty());
        assert!(summary.consecutive_streaks.is_empty());
        assert!(summary.climax_instances.is_empty());
        assert_eq!(summary.total_per_capita, 0.0);
        assert_eq!(summary.avg_climax_intensity, 0.0);
    }

    #[test]
    fn test_empty_selection() {
        let summary = run(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.language, Language::Italian);
    }

    #[test]
    fn test_counts_and_per_capita() {
        let messages = vec![
            Message::new("Marco", "porco dio e porcodio", at(1, 0)),
            Message::new("Marco", "tutto bene", at(1, 1)),
            Message::media("Marco", at(1, 2)),
            Message::new("Luca", "Dio Cane!", at(1, 3)),
        ];
        let summary = run(&messages);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_phrase["porco dio"], 2);
        assert_eq!(summary.by_phrase["dio cane"], 1);
        assert_eq!(summary.by_author["Marco"]["porco dio"], 2);
        assert_eq!(summary.by_author_total["Luca"], 1);
        // Marco: 2 matches over 3 messages (media included)
        assert!((summary.per_capita["Marco"] - 66.67).abs() < 1e-9);
        assert!((summary.per_capita["Luca"] - 100.0).abs() < 1e-9);
        assert!((summary.total_per_capita - 75.0).abs() < 1e-9);
        assert_eq!(summary.top_phrases[0].phrase, "porco dio");
        assert_eq!(summary.top_per_capita(), Some(("Luca", 100.0)));
    }

    #[test]
    fn test_streak_in_middle_of_stream() {
        let messages = vec![
            Message::new("Bob", "ciao", at(1, 0)),
            Message::new("Alice", "porco dio", at(1, 1)),
            Message::new("Alice", "dio cane", at(1, 2)),
            Message::new("Alice", "porca madonna", at(1, 3)),
            Message::new("Bob", "calma", at(1, 4)),
        ];
        let summary = run(&messages);

        assert_eq!(summary.consecutive_streaks.len(), 1);
        let streak = &summary.consecutive_streaks[0];
        assert_eq!(streak.author, "Alice");
        assert_eq!(streak.count, 3);
        assert_eq!(streak.start_timestamp, at(1, 1));
    }

    #[test]
    fn test_media_breaks_streak() {
        let messages = vec![
            Message::new("Alice", "porco dio", at(1, 1)),
            Message::media("Alice", at(1, 2)),
            Message::new("Alice", "dio cane", at(1, 3)),
        ];
        assert!(run(&messages).consecutive_streaks.is_empty());
    }

    #[test]
    fn test_climax_not_gated_on_match() {
        let messages = vec![
            Message::new("Alice", "dioooo", at(1, 0)),
            Message::new("Bob", "nooooooo", at(1, 1)),
        ];
        let summary = run(&messages);

        assert_eq!(summary.total, 0);
        assert_eq!(summary.climax_instances.len(), 2);
        assert_eq!(summary.climax_instances[0].text_snippet, "dioooo");
        assert_eq!(summary.climax_instances[0].repetitions, 4);
        assert_eq!(summary.climax_instances[0].intensity, 2);
        assert_eq!(summary.climax_by_author["Bob"], 1);
        // intensities 2 and 5
        assert!((summary.avg_climax_intensity - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_climax_samples_bounded_but_counted() {
        let messages: Vec<Message> = (0..5)
            .map(|i| Message::new("Alice", "siii", at(1, i)))
            .collect();
        let summary = detector()
            .with_max_climax_samples(2)
            .detect(&messages, &Filter::new())
            .unwrap();

        assert_eq!(summary.climax_instances.len(), 2);
        assert_eq!(summary.climax_by_author["Alice"], 5);
    }

    #[test]
    fn test_timeline_gap_filled() {
        let messages = vec![
            Message::new("Alice", "porco dio porco dio", at(1, 0)),
            Message::new("Alice", "niente", at(2, 0)),
            Message::new("Alice", "dio cane", at(3, 0)),
        ];
        let summary = run(&messages);
        let values: Vec<u64> = summary.timeline.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![2, 0, 1]);
    }

    #[test]
    fn test_author_filter() {
        let messages = vec![
            Message::new("Alice", "porco dio", at(1, 0)),
            Message::new("Bob", "dio cane", at(1, 1)),
        ];
        let summary = detector()
            .detect(&messages, &Filter::new().with_author("Bob"))
            .unwrap();
        assert_eq!(summary.total, 1);
        assert!(!summary.by_author_total.contains_key("Alice"));
    }

    #[test]
    fn test_bundled_dictionaries_compile() {
        assert!(Bestemmiometro::bundled(Language::Italian).is_ok());
        assert!(Bestemmiometro::bundled(Language::English).is_ok());
    }

    #[test]
    fn test_bundled_phrase_matches_whole_words() {
        let detector = Bestemmiometro::bundled(Language::Italian).unwrap();
        let matches =
            |text: &str| detector.phrase_matches(&Message::new("Alice", text, at(1, 0)));

        assert!(matches("addio canestro").is_empty());
        let found: Vec<String> = matches("porco dio santo")
            .into_iter()
            .map(|m| m.phrase)
            .collect();
        assert_eq!(found, vec!["porco dio santo"]);
    }
}
