//! Run state machine implementation.
//!
//! A `Run` is the mutable aggregate for one submitted prompt. It is owned by
//! a single task at a time; the functions in this module are its only
//! mutators, and each one publishes the resulting snapshot and emits the
//! matching `Event` through a [`RunReporter`].

use crate::state::activity::ActivityLog;
use crate::state::tracker::{Advance, ProgressTracker};
use chrono::{DateTime, Utc};
use mm_protocol::ipc::Event;
use mm_protocol::log_models::{LogEntry, LogKind};
use mm_protocol::run_models::{RunSnapshot, RunStatus};
use mm_protocol::step_models::{StepDefinition, StepStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

/// The live state of one run.
#[derive(Debug, Clone)]
pub struct Run {
    pub id: Uuid,
    pub prompt: String,
    pub tracker: ProgressTracker,
    pub log: ActivityLog,
    pub status: RunStatus,
    pub result_ref: Option<String>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Run {
    /// Create a working run for `prompt` with its steps seeded from
    /// `template`.
    pub fn begin(prompt: String, template: &[StepDefinition]) -> Self {
        let mut run = Self {
            id: Uuid::new_v4(),
            prompt,
            tracker: ProgressTracker::new(),
            log: ActivityLog::new(),
            status: RunStatus::Idle,
            result_ref: None,
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        };

        run.log.clear();
        run.tracker.initialize(template);
        run.result_ref = None;
        run.status = RunStatus::Working;
        run
    }

    /// Copy the run into its serializable read model.
    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            id: self.id,
            prompt: self.prompt.clone(),
            steps: self.tracker.steps().to_vec(),
            log: self.log.entries().to_vec(),
            status: self.status,
            result_ref: self.result_ref.clone(),
            error: self.error.clone(),
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// Publishes run changes to view layers.
///
/// Every change replaces the latest snapshot on a watch channel and sends a
/// fine-grained `Event` on the events channel.
#[derive(Clone, Debug)]
pub struct RunReporter {
    events_tx: mpsc::Sender<Event>,
    snapshot_tx: Arc<watch::Sender<Option<RunSnapshot>>>,
}

impl RunReporter {
    pub fn new(events_tx: mpsc::Sender<Event>) -> Self {
        let (snapshot_tx, _) = watch::channel(None);
        Self {
            events_tx,
            snapshot_tx: Arc::new(snapshot_tx),
        }
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<Option<RunSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    /// The most recently published snapshot, `None` while idle.
    pub fn latest(&self) -> Option<RunSnapshot> {
        self.snapshot_tx.borrow().clone()
    }

    /// Send an event without touching the snapshot.
    ///
    /// Never waits: when the events channel is full the event is dropped
    /// and only the snapshot carries the change. A closed channel is ignored.
    pub fn send(&self, event: Event) {
        match self.events_tx.try_send(event) {
            Ok(()) | Err(TrySendError::Closed(_)) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(
                    run_id = ?event.run_id(),
                    capacity = self.events_tx.max_capacity(),
                    "event channel full, dropping event"
                );
            }
        }
    }

    fn publish(&self, run: &Run, event: Event) {
        self.snapshot_tx.send_replace(Some(run.snapshot()));
        self.send(event);
    }
}

/// Announce a freshly begun run.
pub async fn start_run(run: &Run, reporter: &RunReporter) {
    tracing::info!(run_id = %run.id, steps = run.tracker.steps().len(), "run started");
    reporter
        .publish(run, Event::RunStarted { run: run.snapshot() });
}

/// Advance the pipeline by one step and emit a status update per changed
/// step.
pub async fn advance_run(run: &mut Run, reporter: &RunReporter) -> Advance {
    let result = run.tracker.advance();

    match result {
        Advance::Moved { completed, started } => {
            tracing::debug!(run_id = %run.id, completed, started, "step advanced");
            emit_step(run, reporter, completed, StepStatus::Completed).await;
            emit_step(run, reporter, started, StepStatus::InProgress).await;
        }
        Advance::Finished { completed } => {
            tracing::debug!(run_id = %run.id, completed, "last step completed");
            emit_step(run, reporter, completed, StepStatus::Completed).await;
        }
        Advance::Idle => {
            tracing::debug!(run_id = %run.id, "advance ignored, no step in progress");
        }
    }

    result
}

/// Mark the in-progress step `step_id` as failed.
///
/// Returns `false` if that step was not in progress.
pub async fn fail_run_step(run: &mut Run, reporter: &RunReporter, step_id: u32) -> bool {
    if !run.tracker.fail(step_id) {
        return false;
    }
    emit_step(run, reporter, step_id, StepStatus::Failed).await;
    true
}

/// Clear every step, used when a run could not be launched at all.
pub async fn reset_run_steps(run: &mut Run, reporter: &RunReporter) {
    run.tracker.reset();
    reporter
        .publish(run, Event::StepsReset { run_id: run.id });
}

/// Append a log entry and emit it.
pub async fn log_to_run(run: &mut Run, reporter: &RunReporter, kind: LogKind, message: String) {
    let entry = run.log.record(kind, message).clone();
    reporter
        .publish(
            run,
            Event::LogAppended {
                run_id: run.id,
                entry,
            },
        );
}

/// Wait for `delay`, then append a log entry and emit it.
pub async fn log_to_run_after(
    run: &mut Run,
    reporter: &RunReporter,
    kind: LogKind,
    message: String,
    delay: Duration,
) {
    let entry = run
        .log
        .append_after(LogEntry::now(kind, message), delay)
        .await
        .clone();
    reporter
        .publish(
            run,
            Event::LogAppended {
                run_id: run.id,
                entry,
            },
        );
}

/// Mark the run successful.
pub async fn complete_run(run: &mut Run, reporter: &RunReporter, result_ref: Option<String>) {
    run.status = RunStatus::Success;
    run.result_ref = result_ref.clone();
    run.finished_at = Some(Utc::now());

    tracing::info!(run_id = %run.id, result_ref = ?run.result_ref, "run succeeded");
    reporter
        .publish(
            run,
            Event::RunSucceeded {
                run_id: run.id,
                result_ref,
            },
        );
}

/// Mark the run failed with a user-visible error message.
///
/// Log and steps are left as they are.
pub async fn fail_run(run: &mut Run, reporter: &RunReporter, error: String) {
    run.status = RunStatus::Error;
    run.result_ref = None;
    run.error = Some(error.clone());
    run.finished_at = Some(Utc::now());

    tracing::info!(run_id = %run.id, %error, "run failed");
    reporter
        .publish(
            run,
            Event::RunFailed {
                run_id: run.id,
                error,
            },
        );
}

async fn emit_step(run: &Run, reporter: &RunReporter, step_id: u32, status: StepStatus) {
    reporter
        .publish(
            run,
            Event::StepUpdated {
                run_id: run.id,
                step_id,
                status,
            },
        );
}
