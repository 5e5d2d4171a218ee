//! Run manager.
//!
//! The RunManager owns the active run slot. It applies the submit guard,
//! spawns the controller task that exclusively owns the `Run`, and answers
//! view operations from the latest published snapshot.

use crate::engine::RunController;
use crate::state::run::{start_run, RunReporter};
use mm_protocol::ipc::{Event, Op};
use mm_protocol::run_models::{RunSnapshot, RunStatus};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Why a prompt was not turned into a run.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("a run is already in progress")]
    RunInProgress,
}

/// Coordinates the single active run.
pub struct RunManager {
    controller: Arc<RunController>,
    reporter: RunReporter,
    /// Handle of the controller task for the current run.
    active: Mutex<Option<JoinHandle<()>>>,
}

impl RunManager {
    pub fn new(controller: RunController, events_tx: mpsc::Sender<Event>) -> Self {
        Self {
            controller: Arc::new(controller),
            reporter: RunReporter::new(events_tx),
            active: Mutex::new(None),
        }
    }

    /// Start a new run for `prompt` in the background.
    ///
    /// The run is already `working` (and its `RunStarted` event sent) when
    /// this returns.
    ///
    /// # Errors
    ///
    /// Rejected without touching any state when the prompt is blank or the
    /// current run is still working.
    pub async fn submit(&self, prompt: &str) -> Result<Uuid, SubmitRejected> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            tracing::debug!("submit rejected: empty prompt");
            return Err(SubmitRejected::EmptyPrompt);
        }

        let mut active = self.active.lock().await;
        let task_running = active.as_ref().is_some_and(|handle| !handle.is_finished());
        if task_running && self.status() == RunStatus::Working {
            tracing::debug!("submit rejected: run in progress");
            return Err(SubmitRejected::RunInProgress);
        }

        let mut run = self.controller.begin(prompt);
        let run_id = run.id;
        start_run(&run, &self.reporter).await;

        let controller = Arc::clone(&self.controller);
        let reporter = self.reporter.clone();
        *active = Some(tokio::spawn(async move {
            controller.drive(&mut run, &reporter).await;
        }));

        Ok(run_id)
    }

    /// The latest snapshot, `None` before the first run.
    pub fn snapshot(&self) -> Option<RunSnapshot> {
        self.reporter.latest()
    }

    pub fn status(&self) -> RunStatus {
        self.snapshot().map(|run| run.status).unwrap_or_default()
    }

    /// Watch snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<Option<RunSnapshot>> {
        self.reporter.subscribe()
    }

    /// Wait for the current run's controller task to finish.
    pub async fn wait(&self) {
        let handle = self.active.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "run task panicked");
                }
            }
        }
    }

    /// Abort the in-flight run, dropping its pending timers.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.active.lock().await.take() {
            handle.abort();
            tracing::info!("active run aborted");
        }
    }

    /// Apply one view operation. Returns `false` once the manager should
    /// stop serving.
    pub async fn handle_op(&self, op: Op) -> bool {
        match op {
            Op::SubmitPrompt { prompt } => {
                if let Err(reason) = self.submit(&prompt).await {
                    tracing::debug!(%reason, "prompt ignored");
                }
                true
            }
            Op::GetSnapshot => {
                self.reporter.send(Event::Snapshot {
                    run: self.snapshot(),
                });
                true
            }
            Op::Shutdown => {
                self.shutdown().await;
                false
            }
        }
    }

    /// Serve operations until `Shutdown` or until every sender is dropped.
    pub async fn serve(self: Arc<Self>, mut ops: mpsc::UnboundedReceiver<Op>) {
        while let Some(op) = ops.recv().await {
            if !self.handle_op(op).await {
                return;
            }
        }
        self.shutdown().await;
    }
}
