//! Append-only log of completed sessions.
//!
//! Entries are immutable once created: the collection only ever sees
//! prepends and bulk clears, newest first. The whole collection persists
//! as a single JSON document under [`LOGS_KEY`]; missing or malformed data
//! loads as an empty log and never surfaces an error.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::Store;

/// Storage key for the persisted log collection.
pub const LOGS_KEY: &str = "deepwork_logs";

/// One completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Session length in seconds. Zero is legal (task-completion shortcuts).
    pub duration: u64,
    /// The "what did you achieve" text.
    pub note: String,
    /// Mode or category that produced the entry.
    #[serde(rename = "type")]
    pub kind: String,
}

impl LogEntry {
    /// Fresh entry stamped with a new id and the current time.
    pub fn new(note: impl Into<String>, duration: u64, kind: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            duration,
            note: note.into(),
            kind: kind.into(),
        }
    }

    /// Calendar date of the entry (UTC truncation).
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Newest-first collection of completed sessions over an injected store.
pub struct WorkLog {
    entries: Vec<LogEntry>,
    store: Box<dyn Store>,
}

impl WorkLog {
    /// Load the persisted collection, falling back to empty on missing or
    /// malformed data.
    pub fn load(store: Box<dyn Store>) -> Self {
        let entries = match store.load(LOGS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("discarding malformed work log: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("work log unavailable, starting empty: {e}");
                Vec::new()
            }
        };
        Self { entries, store }
    }

    /// Record a completed session. Never fails: persistence is best-effort
    /// and the in-memory collection updates regardless.
    pub fn add(&mut self, note: &str, duration: u64, kind: &str) -> &LogEntry {
        self.insert(LogEntry::new(note, duration, kind))
    }

    /// Prepend a pre-built entry (import path, fixed timestamps in tests).
    pub fn insert(&mut self, entry: LogEntry) -> &LogEntry {
        self.entries.insert(0, entry);
        self.persist();
        &self.entries[0]
    }

    /// Empty the collection and drop the persisted document.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.remove(LOGS_KEY) {
            log::warn!("failed to remove persisted work log: {e}");
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sessions per calendar day. Drives the activity heatmap; entries on
    /// the same date share a bucket.
    pub fn daily_counts(&self) -> BTreeMap<NaiveDate, u64> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.date()).or_insert(0) += 1;
        }
        counts
    }

    /// Entries whose timestamp falls on the given date, newest first.
    pub fn logs_on(&self, date: NaiveDate) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.date() == date).collect()
    }

    /// Entries recorded today (UTC).
    pub fn today(&self) -> Vec<&LogEntry> {
        self.logs_on(Utc::now().date_naive())
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.entries) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("failed to serialize work log: {e}");
                return;
            }
        };
        if let Err(e) = self.store.save(LOGS_KEY, &raw) {
            log::warn!("failed to persist work log: {e}");
        }
    }
}
