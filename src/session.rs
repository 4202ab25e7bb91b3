//! Immutable snapshots and bounded-lifetime session storage.
//!
//! A parsed transcript lives in a [`Snapshot`]: an `Arc<[Message]>` that any
//! number of analyses can read concurrently. Nothing ever edits it; merging
//! authors goes through [`Snapshot::relabeled`], which builds a new one.
//!
//! [`SessionStore`] maps opaque keys to snapshots for a fixed time to live.
//! Looking up a missing or expired key yields
//! [`AnalyzerError::SessionExpired`], which callers treat as "re-upload".
//! Shared reports are deep copies, so nothing done to the session afterwards
//! can change them.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use chatmetrics::session::{SessionStore, Snapshot};
//!
//! # fn main() -> chatmetrics::Result<()> {
//! let snapshot = Snapshot::from(chatmetrics::parse("01/01/24, 09:00 - Alice: ciao")?);
//! let store = SessionStore::new(Duration::from_secs(3600));
//!
//! let key = store.insert(snapshot);
//! assert_eq!(store.get(&key)?.len(), 1);
//! assert!(store.get("missing").unwrap_err().is_session_expired());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Message;
use crate::error::{AnalyzerError, Result};
use crate::report::AnalysisReport;

/// Default lifetime of an uploaded transcript.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Default lifetime of a shared report.
pub const DEFAULT_SHARE_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

// ============================================================================
// Snapshot
// ============================================================================

/// An immutable, cheaply clonable message stream.
#[derive(Debug, Clone)]
pub struct Snapshot(Arc<[Message]>);

impl Snapshot {
    /// The messages, in transcript order.
    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the snapshot holds no messages.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds a new snapshot in which every author found in `mapping` is
    /// renamed. Used to merge aliases of the same person; the original
    /// snapshot is untouched.
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use chatmetrics::session::Snapshot;
    ///
    /// # fn main() -> chatmetrics::Result<()> {
    /// let snapshot = Snapshot::from(chatmetrics::parse(
    ///     "01/01/24, 09:00 - Marco: ciao\n01/01/24, 09:01 - Marco Work: ehi",
    /// )?);
    /// let mapping = HashMap::from([("Marco Work".to_string(), "Marco".to_string())]);
    ///
    /// let merged = snapshot.relabeled(&mapping);
    /// assert!(merged.messages().iter().all(|m| m.author() == "Marco"));
    /// assert_eq!(snapshot.messages()[1].author(), "Marco Work");
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn relabeled(&self, mapping: &HashMap<String, String>) -> Snapshot {
        self.0
            .iter()
            .map(|msg| match mapping.get(msg.author()) {
                Some(target) => msg.relabeled(target.as_str()),
                None => msg.clone(),
            })
            .collect::<Vec<_>>()
            .into()
    }
}

impl From<Vec<Message>> for Snapshot {
    fn from(messages: Vec<Message>) -> Self {
        Snapshot(messages.into())
    }
}

impl Deref for Snapshot {
    type Target = [Message];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// ============================================================================
// Shared reports
// ============================================================================

/// A frozen copy of an analysis, addressable by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedReport {
    /// Share id.
    pub id: String,
    /// When the copy was taken.
    pub created_at: DateTime<Utc>,
    /// The copied report.
    pub report: AnalysisReport,
}

struct Entry<T> {
    value: T,
    /// `None` when the lifetime is too long to represent: never expires.
    expires_at: Option<Instant>,
}

impl<T> Entry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

// ============================================================================
// SessionStore
// ============================================================================

/// In-process store of snapshots and shared reports with expiry.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Entry<Snapshot>>>,
    shares: RwLock<HashMap<String, Entry<Arc<SharedReport>>>>,
    session_ttl: Duration,
    share_ttl: Duration,
}

impl SessionStore {
    /// Creates an empty store whose sessions live for `session_ttl`.
    pub fn new(session_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            shares: RwLock::new(HashMap::new()),
            session_ttl,
            share_ttl: DEFAULT_SHARE_TTL,
        }
    }

    /// Sets the lifetime of shared reports.
    #[must_use]
    pub fn with_share_ttl(mut self, ttl: Duration) -> Self {
        self.share_ttl = ttl;
        self
    }

    /// Stores `snapshot` under a fresh key and returns the key.
    pub fn insert(&self, snapshot: Snapshot) -> String {
        let key = Uuid::new_v4().to_string();
        tracing::debug!(key = %key, messages = snapshot.len(), "session created");
        self.sessions
            .write()
            .insert(key.clone(), Entry::new(snapshot, self.session_ttl));
        key
    }

    /// Looks up a live session.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::SessionExpired`] if the key is unknown or
    /// its lifetime has passed.
    pub fn get(&self, key: &str) -> Result<Snapshot> {
        let sessions = self.sessions.read();
        match sessions.get(key) {
            Some(entry) if !entry.is_expired(Instant::now()) => Ok(entry.value.clone()),
            _ => Err(AnalyzerError::session_expired(key)),
        }
    }

    /// Drops a session. Returns `true` if it existed.
    pub fn remove(&self, key: &str) -> bool {
        self.sessions.write().remove(key).is_some()
    }

    /// Number of stored sessions, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Returns `true` if no session is stored.
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Removes every expired session and share. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();

        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(now));
        let mut removed = before - sessions.len();
        drop(sessions);

        let mut shares = self.shares.write();
        let before = shares.len();
        shares.retain(|_, entry| !entry.is_expired(now));
        removed += before - shares.len();

        if removed > 0 {
            tracing::info!(removed, "purged expired sessions");
        }
        removed
    }

    /// Stores a deep copy of `report` and returns it with its new id.
    pub fn share(&self, report: &AnalysisReport) -> Arc<SharedReport> {
        let shared = Arc::new(SharedReport {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            report: report.clone(),
        });
        tracing::debug!(id = %shared.id, "report shared");
        self.shares.write().insert(
            shared.id.clone(),
            Entry::new(Arc::clone(&shared), self.share_ttl),
        );
        shared
    }

    /// Looks up a shared report.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::SessionExpired`] if the id is unknown or
    /// the share has expired.
    pub fn get_shared(&self, id: &str) -> Result<Arc<SharedReport>> {
        let shares = self.shares.read();
        match shares.get(id) {
            Some(entry) if !entry.is_expired(Instant::now()) => Ok(Arc::clone(&entry.value)),
            _ => Err(AnalyzerError::session_expired(id)),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.read().len())
            .field("shares", &self.shares.read().len())
            .field("session_ttl", &self.session_ttl)
            .field("share_ttl", &self.share_ttl)
            .finish()
    }
}
