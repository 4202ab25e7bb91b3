//! Activity statistics over a filtered message stream.
//!
//! [`aggregate`] computes everything in one pass over the messages the
//! [`Filter`] admits: per-author metrics, gap-filled activity series (overall,
//! per author and media-only), hour-of-day and weekday profiles, and message
//! lengths for histograms.
//!
//! Every series shares one [`BucketRange`], spanning the first to the last
//! selected timestamp, so all of them have the same length and the same
//! bucket starts.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::Message;
use crate::core::bucket::{BucketCounts, BucketRange, Granularity, TimeSeriesPoint};
use crate::core::filter::Filter;
use crate::core::round2;
use crate::error::Result;

/// First and last timestamp of the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest message, `None` when nothing was selected.
    pub start: Option<DateTime<Utc>>,
    /// Latest message, `None` when nothing was selected.
    pub end: Option<DateTime<Utc>>,
}

/// Per-author activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorStats {
    /// Author label.
    pub author: String,
    /// Messages sent, media included.
    pub message_count: usize,
    /// Characters (Unicode scalar values) across all messages.
    pub total_chars: usize,
    /// `total_chars / message_count`, rounded to 2 decimals.
    pub avg_message_length: f64,
    /// Media placeholders sent.
    pub media_count: usize,
}

/// Attachment statistics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaStats {
    /// Media placeholders in the selection.
    pub total_media: usize,
    /// `total_media / total_messages * 100`, rounded to 2 decimals.
    pub media_percentage: f64,
    /// Media count per author (authors without media are omitted).
    pub media_by_author: BTreeMap<String, usize>,
    /// Media-only series over the shared range.
    pub media_over_time: Vec<TimeSeriesPoint>,
}

/// Result of [`aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    /// Non-system messages selected.
    pub total_messages: usize,
    /// Distinct authors among them.
    pub total_authors: usize,
    /// Observed span.
    pub date_range: DateRange,
    /// Bucket width used by every series.
    pub granularity: Granularity,
    /// Sorted by message count descending, then author.
    pub author_stats: Vec<AuthorStats>,
    /// Gap-filled message counts.
    pub time_series: Vec<TimeSeriesPoint>,
    /// Gap-filled message counts per author, all over the same range.
    pub author_time_series: BTreeMap<String, Vec<TimeSeriesPoint>>,
    /// Messages per hour of day, index 0 = midnight. Always 24 entries.
    pub hourly: Vec<u64>,
    /// Messages per weekday, index 0 = Monday. Always 7 entries.
    pub weekday: Vec<u64>,
    /// Attachment statistics.
    pub media_stats: MediaStats,
    /// Lengths of non-empty text bodies, in input order.
    pub message_lengths: Vec<usize>,
}

impl StatsReport {
    /// Returns the stats for one author, if present.
    pub fn author(&self, author: &str) -> Option<&AuthorStats> {
        self.author_stats.iter().find(|s| s.author == author)
    }

    /// Returns the most active author.
    pub fn top_author(&self) -> Option<&AuthorStats> {
        self.author_stats.first()
    }
}

#[derive(Default)]
struct AuthorAcc {
    messages: usize,
    chars: usize,
    media: usize,
}

/// Computes activity statistics for the messages `filter` admits.
///
/// # Errors
///
/// Returns [`AnalyzerError::InvalidRange`](crate::AnalyzerError::InvalidRange)
/// if the filter's start lies after its end.
///
/// # Example
///
/// ```
/// use chatmetrics::core::filter::Filter;
/// use chatmetrics::core::stats::aggregate;
/// use chatmetrics::Message;
/// use chrono::{TimeZone, Utc};
///
/// # fn main() -> chatmetrics::Result<()> {
/// let messages = vec![
///     Message::new("Alice", "ciao", Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
///     Message::new("Bob", "hey", Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap()),
/// ];
/// let report = aggregate(&messages, &Filter::new())?;
///
/// assert_eq!(report.total_messages, 2);
/// assert_eq!(report.time_series.len(), 3);
/// # Ok(())
/// # }
/// ```
pub fn aggregate(messages: &[Message], filter: &Filter) -> Result<StatsReport> {
    let selected = filter.select(messages)?;
    Ok(aggregate_selected(&selected, filter.granularity))
}

/// Computes activity statistics over an already filtered selection.
pub fn aggregate_selected(selected: &[&Message], granularity: Granularity) -> StatsReport {
    let range = BucketRange::spanning(granularity, selected.iter().map(|m| m.timestamp));

    let mut authors: HashMap<&str, AuthorAcc> = HashMap::new();
    let mut per_author_buckets: HashMap<&str, BucketCounts> = HashMap::new();
    let mut buckets = BucketCounts::new(granularity);
    let mut media_buckets = BucketCounts::new(granularity);
    let mut hourly = vec![0u64; 24];
    let mut weekday = vec![0u64; 7];
    let mut message_lengths = Vec::new();
    let mut total_media = 0usize;

    for msg in selected {
        let acc = authors.entry(msg.author()).or_default();
        acc.messages += 1;
        acc.chars += msg.char_len();

        buckets.add(msg.timestamp);
        per_author_buckets
            .entry(msg.author())
            .or_insert_with(|| BucketCounts::new(granularity))
            .add(msg.timestamp);

        hourly[msg.timestamp.hour() as usize] += 1;
        weekday[msg.timestamp.weekday().num_days_from_monday() as usize] += 1;

        if msg.is_media() {
            acc.media += 1;
            total_media += 1;
            media_buckets.add(msg.timestamp);
        } else if !msg.content().is_empty() {
            message_lengths.push(msg.char_len());
        }
    }

    let mut author_stats: Vec<AuthorStats> = authors
        .iter()
        .map(|(author, acc)| AuthorStats {
            author: (*author).to_string(),
            message_count: acc.messages,
            total_chars: acc.chars,
            avg_message_length: round2(acc.chars as f64 / acc.messages as f64),
            media_count: acc.media,
        })
        .collect();
    author_stats.sort_by(|a, b| {
        b.message_count
            .cmp(&a.message_count)
            .then_with(|| a.author.cmp(&b.author))
    });

    let media_by_author = authors
        .iter()
        .filter(|(_, acc)| acc.media > 0)
        .map(|(author, acc)| ((*author).to_string(), acc.media))
        .collect();

    let author_time_series = per_author_buckets
        .iter()
        .map(|(author, counts)| ((*author).to_string(), counts.series(range.as_ref())))
        .collect();

    let total_messages = selected.len();
    let media_percentage = if total_messages == 0 {
        0.0
    } else {
        round2(total_media as f64 / total_messages as f64 * 100.0)
    };

    StatsReport {
        total_messages,
        total_authors: authors.len(),
        date_range: DateRange {
            start: selected.iter().map(|m| m.timestamp).min(),
            end: selected.iter().map(|m| m.timestamp).max(),
        },
        granularity,
        author_stats,
        time_series: buckets.series(range.as_ref()),
        author_time_series,
        hourly,
        weekday,
        media_stats: MediaStats {
            total_media,
            media_percentage,
            media_by_author,
            media_over_time: media_buckets.series(range.as_ref()),
        },
        message_lengths,
    }
}
