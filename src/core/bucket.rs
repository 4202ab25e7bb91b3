//! Time bucketing and gap-filled series.
//!
//! Every series in a report (activity, per-author activity, media, the
//! Bestemmiometro timeline) is built the same way: timestamps are truncated
//! to a bucket boundary, counted, and then expanded over a [`BucketRange`]
//! so that empty buckets appear as explicit zero points.
//!
//! | Granularity | Bucket start |
//! |-------------|--------------|
//! | `hour` | top of the hour |
//! | `day` | midnight |
//! | `week` | Monday midnight (ISO week) |
//! | `month` | first day of the month, midnight |
//!
//! # Example
//!
//! ```
//! use chatmetrics::core::bucket::{BucketCounts, BucketRange, Granularity};
//! use chrono::{TimeZone, Utc};
//!
//! let a = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
//! let b = Utc.with_ymd_and_hms(2024, 1, 3, 18, 0, 0).unwrap();
//!
//! let mut counts = BucketCounts::new(Granularity::Day);
//! counts.add(a);
//! counts.add(b);
//!
//! let range = BucketRange::spanning(Granularity::Day, [a, b]);
//! let series = counts.series(range.as_ref());
//! let values: Vec<u64> = series.iter().map(|p| p.value).collect();
//! assert_eq!(values, vec![1, 0, 1]);
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Months, NaiveTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Width of a time-series bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Granularity {
    /// One bucket per hour
    Hour,
    /// One bucket per calendar day
    #[default]
    Day,
    /// One bucket per ISO week, starting Monday
    Week,
    /// One bucket per calendar month
    Month,
}

impl Granularity {
    /// Returns the start of the bucket containing `ts`.
    pub fn truncate(self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let date = ts.date_naive();
        let midnight = |d: chrono::NaiveDate| d.and_time(NaiveTime::MIN).and_utc();
        match self {
            Granularity::Hour => midnight(date) + TimeDelta::hours(i64::from(ts.hour())),
            Granularity::Day => midnight(date),
            Granularity::Week => {
                let back = i64::from(date.weekday().num_days_from_monday());
                midnight(date - TimeDelta::days(back))
            }
            Granularity::Month => midnight(date - TimeDelta::days(i64::from(date.day0()))),
        }
    }

    /// Returns the start of the bucket following `bucket`.
    ///
    /// `bucket` must already be truncated. `None` only at the end of the
    /// representable calendar.
    pub fn next(self, bucket: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Granularity::Hour => bucket.checked_add_signed(TimeDelta::hours(1)),
            Granularity::Day => bucket.checked_add_signed(TimeDelta::days(1)),
            Granularity::Week => bucket.checked_add_signed(TimeDelta::weeks(1)),
            Granularity::Month => bucket.checked_add_months(Months::new(1)),
        }
    }

    /// Returns all granularity names.
    pub fn all_names() -> &'static [&'static str] {
        &["hour", "day", "week", "month"]
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hour" | "hourly" => Ok(Granularity::Hour),
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            _ => Err(format!(
                "Unknown granularity: '{}'. Expected one of: {}",
                s,
                Granularity::all_names().join(", ")
            )),
        }
    }
}

/// One point of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Start of the bucket.
    pub bucket_start: DateTime<Utc>,
    /// Count within the bucket.
    pub value: u64,
}

/// Inclusive span of buckets between the first and last observed timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketRange {
    granularity: Granularity,
    first: DateTime<Utc>,
    last: DateTime<Utc>,
}

impl BucketRange {
    /// Builds the range covering `timestamps`, or `None` if there are none.
    pub fn spanning(
        granularity: Granularity,
        timestamps: impl IntoIterator<Item = DateTime<Utc>>,
    ) -> Option<Self> {
        let mut bounds: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
        for ts in timestamps {
            bounds = Some(match bounds {
                None => (ts, ts),
                Some((lo, hi)) => (lo.min(ts), hi.max(ts)),
            });
        }
        let (lo, hi) = bounds?;
        Some(Self {
            granularity,
            first: granularity.truncate(lo),
            last: granularity.truncate(hi),
        })
    }

    /// Start of the first bucket.
    pub fn first(&self) -> DateTime<Utc> {
        self.first
    }

    /// Start of the last bucket.
    pub fn last(&self) -> DateTime<Utc> {
        self.last
    }

    /// Granularity of the range.
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Iterates over every bucket start in the range.
    pub fn buckets(&self) -> Buckets {
        Buckets {
            granularity: self.granularity,
            next: Some(self.first),
            last: self.last,
        }
    }
}

/// Iterator over bucket starts, see [`BucketRange::buckets`].
#[derive(Debug, Clone)]
pub struct Buckets {
    granularity: Granularity,
    next: Option<DateTime<Utc>>,
    last: DateTime<Utc>,
}

impl Iterator for Buckets {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|bucket| *bucket <= self.last)?;
        self.next = self.granularity.next(current);
        Some(current)
    }
}

/// Bucket → count accumulator.
#[derive(Debug, Clone)]
pub struct BucketCounts {
    granularity: Granularity,
    counts: HashMap<DateTime<Utc>, u64>,
}

impl BucketCounts {
    /// Creates an empty accumulator.
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            counts: HashMap::new(),
        }
    }

    /// Counts one event at `ts`.
    pub fn add(&mut self, ts: DateTime<Utc>) {
        self.add_n(ts, 1);
    }

    /// Counts `n` events at `ts`.
    pub fn add_n(&mut self, ts: DateTime<Utc>, n: u64) {
        *self.counts.entry(self.granularity.truncate(ts)).or_insert(0) += n;
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Expands the counts over `range`, zero-filling empty buckets.
    ///
    /// An absent range (nothing observed) yields an empty series.
    pub fn series(&self, range: Option<&BucketRange>) -> Vec<TimeSeriesPoint> {
        let Some(range) = range else {
            return Vec::new();
        };
        range
            .buckets()
            .map(|bucket_start| TimeSeriesPoint {
                bucket_start,
                value: self.counts.get(&bucket_start).copied().unwrap_or(0),
            })
            .collect()
    }
}
