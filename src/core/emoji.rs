//! Emoji extraction and usage statistics.
//!
//! Extraction works on code points:
//!
//! - a skin-tone modifier attaches to the emoji right before it (`👍🏽` is one emoji)
//! - a ZWJ sequence contributes one emoji per base (`👨‍💻` counts 👨 and 💻)
//! - variation selectors and keycap marks are ignored
//! - two regional indicators form one flag (`🇮🇹`)

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::Message;
use crate::core::filter::Filter;
use crate::core::round2;
use crate::error::Result;

const ZWJ: char = '\u{200D}';

fn is_skin_tone(c: char) -> bool {
    matches!(c as u32, 0x1F3FB..=0x1F3FF)
}

fn is_regional_indicator(c: char) -> bool {
    matches!(c as u32, 0x1F1E6..=0x1F1FF)
}

/// Marks that never count on their own: variation selectors, keycap, tags.
fn is_ignored_mark(c: char) -> bool {
    matches!(
        c as u32,
        0xFE00..=0xFE0F | 0x20E3 | 0xE0020..=0xE007F
    )
}

/// Check if a character is a base emoji.
fn is_base_emoji(c: char) -> bool {
    let code = c as u32;
    matches!(
        code,
        0x1F300..=0x1F5FF // Miscellaneous Symbols and Pictographs
            | 0x1F600..=0x1F64F // Emoticons
            | 0x1F680..=0x1F6FF // Transport and Map Symbols
            | 0x1F7E0..=0x1F7EB // Geometric Shapes Extended (colored circles, squares)
            | 0x1F900..=0x1F9FF // Supplemental Symbols and Pictographs
            | 0x1FA70..=0x1FAFF // Symbols and Pictographs Extended-A
            | 0x1F004 | 0x1F0CF // Mahjong tile, joker
            | 0x1F170..=0x1F19A // Enclosed alphanumerics (🅰 🆗 ...)
            | 0x1F201..=0x1F251 // Enclosed ideographs
            | 0x2600..=0x26FF // Miscellaneous Symbols
            | 0x2700..=0x27BF // Dingbats
            | 0x231A..=0x231B | 0x2328 | 0x23CF | 0x23E9..=0x23F3 | 0x23F8..=0x23FA
            | 0x2B1B..=0x2B1C | 0x2B50 | 0x2B55
            | 0x2934..=0x2935 | 0x3030 | 0x303D | 0x3297 | 0x3299
    ) && !is_skin_tone(c)
}

/// Extracts emoji from text, in order of appearance.
///
/// # Examples
///
/// ```
/// use chatmetrics::core::emoji::extract_emojis;
///
/// assert_eq!(extract_emojis("ciao 😀 👍🏽"), vec!["😀", "👍🏽"]);
/// assert_eq!(extract_emojis("👨‍💻"), vec!["👨", "💻"]);
/// assert_eq!(extract_emojis("forza 🇮🇹!"), vec!["🇮🇹"]);
/// ```
pub fn extract_emojis(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    // Whether a skin-tone modifier may attach to the last emoji found.
    let mut attachable = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if is_skin_tone(c) {
            if attachable {
                if let Some(last) = found.last_mut() {
                    last.push(c);
                }
            }
            attachable = false;
        } else if c == ZWJ {
            attachable = false;
        } else if is_ignored_mark(c) {
            // keeps `attachable`: a selector may sit between base and modifier
        } else if is_regional_indicator(c) {
            if let Some(&next) = chars.peek() {
                if is_regional_indicator(next) {
                    chars.next();
                    found.push([c, next].iter().collect());
                }
            }
            attachable = false;
        } else if is_base_emoji(c) {
            found.push(c.to_string());
            attachable = true;
        } else {
            attachable = false;
        }
    }

    found
}

/// One emoji with its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiStat {
    /// The emoji, including an attached skin tone.
    pub symbol: String,
    /// Occurrences.
    pub count: usize,
}

/// Emoji usage of one author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorEmojiStats {
    /// Emoji used.
    pub total: usize,
    /// Distinct emoji used.
    pub unique: usize,
    /// Most used emoji, count descending then symbol.
    pub top_emojis: Vec<EmojiStat>,
    /// `total / author's messages`, rounded to 2 decimals.
    pub per_message: f64,
}

/// Result of [`EmojiAnalyzer::analyze`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmojiReport {
    /// Emoji across all considered messages.
    pub total_emojis: usize,
    /// Distinct emoji.
    pub unique_emojis: usize,
    /// Most used emoji, count descending then symbol.
    pub top_emojis: Vec<EmojiStat>,
    /// Per-author breakdown; authors without emoji are omitted.
    pub by_author: BTreeMap<String, AuthorEmojiStats>,
    /// `total_emojis / messages considered`, rounded to 2 decimals.
    pub per_message: f64,
}

fn ranked(counts: &HashMap<String, usize>, limit: usize) -> Vec<EmojiStat> {
    let mut stats: Vec<EmojiStat> = counts
        .iter()
        .map(|(symbol, count)| EmojiStat {
            symbol: symbol.clone(),
            count: *count,
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.symbol.cmp(&b.symbol)));
    stats.truncate(limit);
    stats
}

fn ratio(total: usize, messages: usize) -> f64 {
    if messages == 0 {
        0.0
    } else {
        round2(total as f64 / messages as f64)
    }
}

/// Emoji analyzer with configurable top-list sizes.
#[derive(Debug, Clone, Copy)]
pub struct EmojiAnalyzer {
    top: usize,
    top_per_author: usize,
}

impl Default for EmojiAnalyzer {
    fn default() -> Self {
        Self::new(30, 10)
    }
}

impl EmojiAnalyzer {
    /// Creates an analyzer reporting `top` emoji globally and
    /// `top_per_author` per author.
    pub fn new(top: usize, top_per_author: usize) -> Self {
        Self {
            top,
            top_per_author,
        }
    }

    /// Analyzes the messages `filter` admits.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidRange`](crate::AnalyzerError::InvalidRange)
    /// if the filter range is inverted.
    pub fn analyze(&self, messages: &[Message], filter: &Filter) -> Result<EmojiReport> {
        let selected = filter.select(messages)?;
        Ok(self.analyze_selected(&selected))
    }

    /// Analyzes an already filtered selection. Media placeholders are skipped.
    pub fn analyze_selected(&self, selected: &[&Message]) -> EmojiReport {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut author_counts: HashMap<&str, HashMap<String, usize>> = HashMap::new();
        let mut author_messages: HashMap<&str, usize> = HashMap::new();
        let mut considered = 0usize;
        let mut total = 0usize;

        for msg in selected.iter().filter(|m| !m.is_media()) {
            considered += 1;
            *author_messages.entry(msg.author()).or_insert(0) += 1;

            for emoji in extract_emojis(msg.content()) {
                total += 1;
                *author_counts
                    .entry(msg.author())
                    .or_default()
                    .entry(emoji.clone())
                    .or_insert(0) += 1;
                *counts.entry(emoji).or_insert(0) += 1;
            }
        }

        let by_author = author_counts
            .iter()
            .map(|(author, emojis)| {
                let author_total: usize = emojis.values().sum();
                let stats = AuthorEmojiStats {
                    total: author_total,
                    unique: emojis.len(),
                    top_emojis: ranked(emojis, self.top_per_author),
                    per_message: ratio(
                        author_total,
                        author_messages.get(author).copied().unwrap_or(0),
                    ),
                };
                ((*author).to_string(), stats)
            })
            .collect();

        EmojiReport {
            total_emojis: total,
            unique_emojis: counts.len(),
            top_emojis: ranked(&counts, self.top),
            by_author,
            per_message: ratio(total, considered),
        }
    }
}

/// Computes emoji statistics with the default top-list sizes (30 / 10).
///
/// # Errors
///
/// Returns [`AnalyzerError::InvalidRange`](crate::AnalyzerError::InvalidRange)
/// if the filter range is inverted.
pub fn emoji_stats(messages: &[Message], filter: &Filter) -> Result<EmojiReport> {
    EmojiAnalyzer::default().analyze(messages, filter)
}
