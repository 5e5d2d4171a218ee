//! Activity log models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Category tag attached to every log entry.
///
/// Only the tag is stored; view layers map it to an icon of their choosing.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    #[default]
    Agent,
    Search,
    Code,
    Test,
    Review,
    Git,
    /// Failure narration.
    Error,
}

impl LogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::Agent => "agent",
            LogKind::Search => "search",
            LogKind::Code => "code",
            LogKind::Test => "test",
            LogKind::Review => "review",
            LogKind::Git => "git",
            LogKind::Error => "error",
        }
    }
}

/// A single narrated event in a run's activity log.
///
/// Entries are immutable once recorded; the log only ever grows at the tail
/// or is cleared as a whole.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct LogEntry {
    pub kind: LogKind,

    pub message: String,

    /// Capture time of the entry.
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn now(kind: LogKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
