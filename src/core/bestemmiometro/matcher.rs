//! Compiled phrase matcher.
//!
//! All phrase patterns are compiled once into a [`RegexSet`] used as a
//! prefilter (one pass tells which phrases occur at all) plus one [`Regex`]
//! per phrase to count occurrences of the candidates.

use std::collections::BTreeMap;

use regex::{Regex, RegexSet, RegexSetBuilder};

use super::dictionary::PhraseDictionary;
use crate::error::{AnalyzerError, Result};

/// Compiled form of a [`PhraseDictionary`].
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    set: RegexSet,
    regexes: Vec<Regex>,
    phrases: Vec<String>,
}

impl PhraseMatcher {
    /// Compiles every phrase of `dictionary`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Configuration`] if a pattern fails to compile.
    pub fn compile(dictionary: &PhraseDictionary) -> Result<Self> {
        let allow_suffixes = dictionary.allows_suffixes();
        let patterns: Vec<String> = dictionary
            .phrases()
            .iter()
            .map(|phrase| phrase.pattern(allow_suffixes))
            .collect();

        let set = RegexSetBuilder::new(&patterns)
            .size_limit(64 * (1 << 20))
            .build()
            .map_err(|e| AnalyzerError::configuration("phrase dictionary", e.to_string()))?;

        let regexes = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    AnalyzerError::configuration("phrase dictionary", format!("{pattern}: {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let phrases = dictionary
            .phrases()
            .iter()
            .map(|phrase| phrase.text().to_string())
            .collect();

        Ok(Self {
            set,
            regexes,
            phrases,
        })
    }

    /// Number of compiled phrases.
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Returns `true` if no phrase is compiled.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Canonical text of phrase `index`.
    pub fn phrase(&self, index: usize) -> &str {
        &self.phrases[index]
    }

    /// Counts occurrences per phrase in `text`.
    ///
    /// The text is lower-cased first. An occurrence lying inside a longer
    /// occurrence of another phrase is not counted, so `porco dio santo`
    /// counts once even when `porco dio` is also in the dictionary.
    /// Returns `(phrase index, occurrences)` for every phrase that occurs,
    /// in dictionary order.
    pub fn count(&self, text: &str) -> Vec<(usize, usize)> {
        let lower = text.to_lowercase();

        let mut spans: Vec<(usize, usize, usize)> = Vec::new();
        for index in self.set.matches(&lower).into_iter() {
            for m in self.regexes[index].find_iter(&lower) {
                spans.push((index, m.start(), m.end()));
            }
        }

        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for &(index, start, end) in &spans {
            let nested = spans.iter().any(|&(other, s, e)| {
                other != index && s <= start && end <= e && e - s > end - start
            });
            if !nested {
                *counts.entry(index).or_insert(0) += 1;
            }
        }
        counts.into_iter().collect()
    }

    /// Returns the canonical phrase of every occurrence in `text`.
    pub fn find<'a>(&'a self, text: &str) -> Vec<&'a str> {
        self.count(text)
            .into_iter()
            .flat_map(|(index, occurrences)| {
                std::iter::repeat_n(self.phrases[index].as_str(), occurrences)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Language;

    fn italian() -> PhraseMatcher {
        let dict = PhraseDictionary::parse("porco dio\ndio cane\nporca madonna", Language::Italian)
            .unwrap();
        PhraseMatcher::compile(&dict).unwrap()
    }

    #[test]
    fn test_case_and_spacing_variants_match_once() {
        let matcher = italian();
        for text in ["porco dio", "PORCO DIO", "porcodio", "Porco... Dio!", "porco_dio"] {
            assert_eq!(matcher.find(text), vec!["porco dio"], "text: {text}");
        }
    }

    #[test]
    fn test_multiple_occurrences_and_phrases() {
        let matcher = italian();
        let found = matcher.find("porco dio, porcodio e dio cane");
        assert_eq!(found, vec!["porco dio", "porco dio", "dio cane"]);
    }

    #[test]
    fn test_substring_and_elongation() {
        let matcher = italian();
        assert_eq!(matcher.find("porcodiooooo"), vec!["porco dio"]);
    }

    #[test]
    fn test_no_match() {
        let matcher = italian();
        assert!(matcher.find("buongiorno a tutti").is_empty());
        assert!(matcher.count("").is_empty());
    }

    #[test]
    fn test_english_single_words() {
        let dict = PhraseDictionary::parse("fuck\nass\nholy shit", Language::English).unwrap();
        let matcher = PhraseMatcher::compile(&dict).unwrap();

        assert_eq!(matcher.find("Fucking hell"), vec!["fuck"]);
        assert!(matcher.find("an assessment of the class").is_empty());
        assert_eq!(matcher.find("HOLY SHIT"), vec!["holy shit"]);
    }

    #[test]
    fn test_phrases_need_word_edges() {
        let matcher = italian();
        assert!(matcher.find("addio canestro").is_empty());
        assert!(matcher.find("il porcodiologo").is_empty());
        assert_eq!(matcher.find("addio, dio cane!"), vec!["dio cane"]);
    }

    #[test]
    fn test_nested_occurrence_counts_once() {
        let dict = PhraseDictionary::parse(
            "porco dio\nporco dio santo\nshit\nholy shit",
            Language::Italian,
        )
        .unwrap();
        let matcher = PhraseMatcher::compile(&dict).unwrap();

        assert_eq!(matcher.find("porco dio santo"), vec!["porco dio santo"]);
        assert_eq!(matcher.find("holy shit"), vec!["holy shit"]);
        // Separate occurrences still count on their own
        assert_eq!(
            matcher.find("porco dio santo e porco dio"),
            vec!["porco dio", "porco dio santo"]
        );
    }

    #[test]
    fn test_bundled_italian_compiles() {
        let dict = PhraseDictionary::bundled(Language::Italian).unwrap();
        let matcher = PhraseMatcher::compile(&dict).unwrap();
        assert_eq!(matcher.len(), dict.len());
        assert_eq!(matcher.find("madonna ladra"), vec!["madonna ladra"]);
    }
}
