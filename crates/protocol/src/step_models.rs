//! Pipeline step models.
//!
//! A run walks an ordered list of steps, each seeded from a
//! [`StepDefinition`] in the active pipeline template.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::log_models::LogKind;

/// Lifecycle status of a single pipeline step.
///
/// Steps move `Pending -> InProgress -> Completed`. A step that reports a
/// failure becomes `Failed` and every step after it stays `Pending`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Not started yet.
    Pending,

    /// Currently executing. At most one step is in this state.
    InProgress,

    /// Finished successfully.
    Completed,

    /// Reported a failure; terminal for the run.
    Failed,
}

/// One step of a running pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct Step {
    /// 1-based ordinal, stable for the lifetime of the run.
    pub id: u32,

    /// Short human label (e.g. "Testing").
    pub title: String,

    /// Explanatory text shown while and after the step executes.
    pub description: String,

    /// Category tag used when narrating this step in the activity log.
    pub kind: LogKind,

    /// Current status.
    pub status: StepStatus,
}

/// Template entry describing a step before any run exists.
///
/// # Example
///
/// ```yaml
/// - title: Testing
///   description: Running unit and integration tests.
///   kind: test
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct StepDefinition {
    pub title: String,

    pub description: String,

    /// Narration tag for this step. Defaults to `agent`.
    #[serde(default)]
    pub kind: LogKind,
}

impl StepDefinition {
    pub fn new(title: impl Into<String>, description: impl Into<String>, kind: LogKind) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind,
        }
    }
}
