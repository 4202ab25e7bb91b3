//! Consecutive-match streaks.
//!
//! Walking the stream in order, a streak grows while adjacent messages all
//! contain a match and share the author. Any other message (a non-matching
//! one, a media placeholder, or a match by another author) closes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shortest streak that is reported.
pub const MIN_STREAK: usize = 2;

/// An unbroken run of matched messages by one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsecutiveStreak {
    /// Author of every message in the run.
    pub author: String,
    /// Messages in the run.
    pub count: usize,
    /// Timestamp of the first message.
    pub start_timestamp: DateTime<Utc>,
}

/// Incremental streak detector.
#[derive(Debug, Default)]
pub struct StreakTracker {
    current: Option<ConsecutiveStreak>,
    finished: Vec<ConsecutiveStreak>,
}

impl StreakTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next message of the stream.
    pub fn observe(&mut self, author: &str, timestamp: DateTime<Utc>, matched: bool) {
        if !matched {
            self.close();
            return;
        }

        if let Some(current) = self.current.as_mut().filter(|c| c.author == author) {
            current.count += 1;
            return;
        }

        self.close();
        self.current = Some(ConsecutiveStreak {
            author: author.to_string(),
            count: 1,
            start_timestamp: timestamp,
        });
    }

    /// Closes the open streak without starting another.
    pub fn close(&mut self) {
        if let Some(streak) = self.current.take() {
            if streak.count >= MIN_STREAK {
                self.finished.push(streak);
            }
        }
    }

    /// Closes the open streak and returns the longest `limit` streaks,
    /// count descending then start time ascending.
    pub fn finish(mut self, limit: usize) -> Vec<ConsecutiveStreak> {
        self.close();
        let mut streaks = self.finished;
        streaks.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.start_timestamp.cmp(&b.start_timestamp))
        });
        streaks.truncate(limit);
        streaks
    }
}
