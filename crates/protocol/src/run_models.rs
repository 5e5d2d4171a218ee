//! Run state read model.
//!
//! This module defines the serializable view of a single user-submitted run.
//! The core owns the mutable aggregate and publishes [`RunSnapshot`]s for
//! view layers to render.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::log_models::LogEntry;
use crate::step_models::{Step, StepStatus};

/// Overall status of a run.
///
/// `Idle -> Working -> Success | Error`. `Success` and `Error` are terminal
/// for that run; a new submission always starts a fresh run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// No run has been submitted yet.
    #[default]
    Idle,

    /// The pipeline is advancing.
    Working,

    /// Every step completed.
    Success,

    /// The run failed; see [`RunSnapshot::error`].
    Error,
}

impl RunStatus {
    pub fn is_working(self) -> bool {
        self == RunStatus::Working
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Success | RunStatus::Error)
    }
}

/// Point-in-time copy of a run, as seen by the view layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct RunSnapshot {
    /// Unique identifier for this run.
    #[ts(type = "string")]
    pub id: Uuid,

    /// The submitted feature request. Immutable for the run's lifetime.
    pub prompt: String,

    /// Pipeline steps in id order. Empty after a transport failure.
    pub steps: Vec<Step>,

    /// Activity log in insertion order.
    pub log: Vec<LogEntry>,

    pub status: RunStatus,

    /// External artifact produced by the run (e.g. a pull-request URL).
    ///
    /// Only present when `status` is `Success`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_ref: Option<String>,

    /// User-visible error banner. Only present when `status` is `Error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSnapshot {
    /// The step currently executing, if any.
    pub fn current_step(&self) -> Option<&Step> {
        self.steps
            .iter()
            .find(|step| step.status == StepStatus::InProgress)
    }

    /// Look up a step by its 1-based id.
    pub fn step(&self, id: u32) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == id)
    }

    /// Most recent log entry.
    pub fn last_entry(&self) -> Option<&LogEntry> {
        self.log.last()
    }
}
