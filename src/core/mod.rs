//! Analysis engine for chatmetrics.
//!
//! Everything here works on already-parsed [`Message`]s:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`bucket`] | Time bucketing and gap-filled series |
//! | [`filter`] | Author and date-range selection |
//! | [`stats`] | Counts, per-author stats, temporal patterns, media |
//! | [`words`] | Word frequency with stopwords |
//! | [`emoji`] | Emoji extraction and frequency |
//! | [`bestemmiometro`] | Profanity phrases, climaxes, streaks |
//! | [`insights`] | Natural-language observations |
//! | [`output`] | JSON and CSV writers |
//!
//! # Quick Start
//!
//! ```rust
//! use chatmetrics::core::{Filter, Granularity, aggregate, top_words};
//! use chatmetrics::Message;
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> chatmetrics::Result<()> {
//! let ts = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
//! let messages = vec![Message::new("Alice", "pizza stasera?", ts)];
//!
//! let filter = Filter::new().with_granularity(Granularity::Hour);
//! let stats = aggregate(&messages, &filter)?;
//! let words = top_words(&messages, &filter, 10, 3)?;
//!
//! assert_eq!(stats.total_messages, 1);
//! assert_eq!(words.words[0].word, "pizza");
//! # Ok(())
//! # }
//! ```

pub mod bestemmiometro;
pub mod bucket;
pub mod emoji;
pub mod filter;
pub mod insights;
pub mod output;
pub mod stats;
pub mod words;

pub use bestemmiometro::{Bestemmiometro, BestemmiometroSummary, detect};
pub use bucket::{Granularity, TimeSeriesPoint};
pub use emoji::{EmojiAnalyzer, EmojiReport, emoji_stats, extract_emojis};
pub use filter::Filter;
pub use insights::{Insight, InsightCategory, InsightValue, generate};
pub use stats::{StatsReport, aggregate};
pub use words::{Stopwords, WordAnalyzer, WordFrequencyReport, top_words};

pub use crate::Message;

#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, write_json};

/// Rounds to two decimals.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
