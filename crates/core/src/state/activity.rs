//! Append-only activity log.
//!
//! Entries are kept in insertion order and never edited. Pacing is done with
//! [`ActivityLog::append_after`], which must be awaited before the next
//! append so that log order matches call order.

use mm_protocol::log_models::{LogEntry, LogKind};
use std::time::Duration;

/// Time-ordered narration buffer for one run.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `entry` to the tail of the log.
    pub fn append(&mut self, entry: LogEntry) -> &LogEntry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Record a new entry stamped with the current time.
    pub fn record(&mut self, kind: LogKind, message: impl Into<String>) -> &LogEntry {
        self.append(LogEntry::now(kind, message))
    }

    /// Wait for `delay`, then append `entry`.
    ///
    /// The entry keeps the timestamp it was created with.
    pub async fn append_after(&mut self, entry: LogEntry, delay: Duration) -> &LogEntry {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.append(entry)
    }

    /// Empty the log.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
