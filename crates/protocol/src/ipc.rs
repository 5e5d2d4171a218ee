//! Inter-process communication protocol.
//!
//! This module defines the message types exchanged between a view layer
//! (the TUI, the headless CLI, or a browser client) and the core:
//! - `Op`: commands sent from the view to the core
//! - `Event`: progress updates sent from the core to the view
//!
//! Events are fine-grained so a view can mirror a run incrementally; a
//! full [`RunSnapshot`] is also available on request.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::log_models::LogEntry;
use crate::run_models::RunSnapshot;
use crate::step_models::StepStatus;

/// Operations sent from the view to the core.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "submitPrompt",
///   "payload": { "prompt": "Add a health check endpoint" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Start a new run for the given feature request.
    ///
    /// Ignored when the prompt is blank or a run is already working.
    SubmitPrompt { prompt: String },

    /// Ask the core to send back an [`Event::Snapshot`].
    GetSnapshot,

    /// Stop the in-flight run (if any) and shut down.
    Shutdown,
}

/// Events sent from the core to the view.
///
/// ```json
/// {
///   "type": "stepUpdated",
///   "payload": { "run_id": "uuid-here", "step_id": 2, "status": "in_progress" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A new run replaced the previous one. Carries the seeded steps.
    RunStarted { run: RunSnapshot },

    /// A step changed status.
    StepUpdated {
        #[ts(type = "string")]
        run_id: Uuid,
        step_id: u32,
        status: StepStatus,
    },

    /// An entry was appended to the run's activity log.
    ///
    /// Views should scroll to the newest entry.
    LogAppended {
        #[ts(type = "string")]
        run_id: Uuid,
        entry: LogEntry,
    },

    /// The step list was cleared after the run could not be launched.
    StepsReset {
        #[ts(type = "string")]
        run_id: Uuid,
    },

    /// Every step completed.
    RunSucceeded {
        #[ts(type = "string")]
        run_id: Uuid,
        result_ref: Option<String>,
    },

    /// The run ended in error.
    RunFailed {
        #[ts(type = "string")]
        run_id: Uuid,
        error: String,
    },

    /// Reply to [`Op::GetSnapshot`]. `None` while idle.
    Snapshot { run: Option<RunSnapshot> },
}

impl Event {
    /// The run this event refers to, when it refers to one.
    pub fn run_id(&self) -> Option<Uuid> {
        match self {
            Event::RunStarted { run } => Some(run.id),
            Event::StepUpdated { run_id, .. }
            | Event::LogAppended { run_id, .. }
            | Event::StepsReset { run_id }
            | Event::RunSucceeded { run_id, .. }
            | Event::RunFailed { run_id, .. } => Some(*run_id),
            Event::Snapshot { run } => run.as_ref().map(|run| run.id),
        }
    }

    /// Whether this event ends a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::RunSucceeded { .. } | Event::RunFailed { .. })
    }
}
