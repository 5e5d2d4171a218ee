//! Run execution engine.
//!
//! The `RunController` drives one run from `working` to a terminal state. It
//! either plays a scripted narration locally or first launches the run on an
//! agent backend and then narrates. Every mutation goes through the
//! functions in [`crate::state::run`], so each change reaches the view as an
//! `Event` plus a fresh snapshot.

pub mod script;

use crate::backend::{AgentBackend, BackendError, HttpBackend, LaunchReceipt};
use crate::config::models::AppConfig;
use crate::state::run::{
    advance_run, complete_run, fail_run, fail_run_step, log_to_run, log_to_run_after,
    reset_run_steps, Run, RunReporter,
};
use crate::state::tracker::Advance;
use mm_protocol::config_models::{DriveStrategy, GlobalConfig, PipelineTemplate};
use mm_protocol::log_models::LogKind;
use mm_protocol::run_models::RunStatus;
use script::{Beat, Script, Transition};
use std::sync::Arc;
use std::time::Duration;

pub use script::Line;

/// Logged after a successful launch when the backend sent no message.
pub const LAUNCHED_MESSAGE: &str = "Agent run initiated. See progress on the right.";

/// The single log entry written when the backend cannot be reached.
pub const UNREACHABLE_MESSAGE: &str =
    "Sorry, I couldn't connect to the agent. Please ensure the backend server is running.";

/// Drives runs through their steps.
pub struct RunController {
    template: PipelineTemplate,
    strategy: DriveStrategy,
    beat_interval: Duration,
    repository: String,
    backend: Option<Arc<dyn AgentBackend>>,
    script: Option<Script>,
}

impl RunController {
    /// A local controller for `template` with default settings.
    pub fn new(template: PipelineTemplate) -> Self {
        let defaults = GlobalConfig::default();
        Self {
            template,
            strategy: DriveStrategy::Local,
            beat_interval: Duration::from_millis(defaults.beat_interval_ms),
            repository: defaults.repository,
            backend: None,
            script: None,
        }
    }

    /// Build a controller from loaded configuration.
    ///
    /// The delegated strategy gets an [`HttpBackend`] for the configured
    /// endpoint.
    pub fn from_config(config: &AppConfig) -> Result<Self, BackendError> {
        let controller = Self::new(config.active_template())
            .with_strategy(config.global.strategy)
            .with_beat_interval(config.beat_interval())
            .with_repository(config.global.repository.clone());

        match config.global.strategy {
            DriveStrategy::Local => Ok(controller),
            DriveStrategy::Delegated => {
                let backend = HttpBackend::new(&config.global.endpoint, config.request_timeout())?;
                Ok(controller.with_backend(Arc::new(backend)))
            }
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn AgentBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_strategy(mut self, strategy: DriveStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_beat_interval(mut self, interval: Duration) -> Self {
        self.beat_interval = interval;
        self
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    /// Replace the default narration with a custom script.
    pub fn with_script(mut self, script: Script) -> Self {
        self.script = Some(script);
        self
    }

    pub fn template(&self) -> &PipelineTemplate {
        &self.template
    }

    pub fn strategy(&self) -> DriveStrategy {
        self.strategy
    }

    /// Create a working run for `prompt`, seeded from the template.
    pub fn begin(&self, prompt: impl Into<String>) -> Run {
        Run::begin(prompt.into(), &self.template.steps)
    }

    /// The script played for every run.
    pub fn script(&self) -> Script {
        self.script
            .clone()
            .unwrap_or_else(|| Script::narrate(&self.template.steps, self.beat_interval))
    }

    /// Drive `run` to a terminal state.
    ///
    /// Never returns an error: transport failures and failed steps end the
    /// run in `error` with the reason recorded on the run.
    pub async fn drive(&self, run: &mut Run, reporter: &RunReporter) {
        let result_ref = match self.strategy {
            DriveStrategy::Local => None,
            DriveStrategy::Delegated => match self.launch(run).await {
                Ok(receipt) => {
                    let message = receipt
                        .message
                        .unwrap_or_else(|| LAUNCHED_MESSAGE.to_string());
                    log_to_run(run, reporter, LogKind::Agent, message).await;
                    receipt.result_ref
                }
                Err(e) => {
                    tracing::warn!(run_id = %run.id, error = %e, "agent backend unreachable");
                    reset_run_steps(run, reporter).await;
                    log_to_run(run, reporter, LogKind::Error, UNREACHABLE_MESSAGE.to_string())
                        .await;
                    fail_run(run, reporter, format!("Failed to connect to the backend: {e}"))
                        .await;
                    return;
                }
            },
        };

        self.play(run, reporter, result_ref).await;
    }

    async fn launch(&self, run: &Run) -> Result<LaunchReceipt, BackendError> {
        let backend = self.backend.as_ref().ok_or(BackendError::NotConfigured)?;
        tracing::debug!(run_id = %run.id, backend = backend.name(), "launching run");
        backend.launch(&run.prompt).await
    }

    async fn play(&self, run: &mut Run, reporter: &RunReporter, result_ref: Option<String>) {
        let script = self.script();

        for (index, beat) in script.beats().iter().enumerate() {
            tracing::debug!(run_id = %run.id, beat = index, transition = ?beat.transition, "playing beat");

            if let Transition::Fail { reason } = &beat.transition {
                self.fail_current(run, reporter, beat, reason).await;
                return;
            }

            if beat.transition == Transition::Advance
                && advance_run(run, reporter).await == Advance::Idle
            {
                tracing::debug!(run_id = %run.id, beat = index, "advance beat had no step to move");
            }

            play_lines(run, reporter, beat).await;

            if !beat.delay.is_zero() {
                tokio::time::sleep(beat.delay).await;
            }
        }

        self.finish(run, reporter, result_ref).await;
    }

    async fn fail_current(&self, run: &mut Run, reporter: &RunReporter, beat: &Beat, reason: &str) {
        let failed = run
            .tracker
            .current()
            .map(|step| (step.id, step.title.clone(), step.kind));

        let error = match failed {
            Some((step_id, title, kind)) => {
                fail_run_step(run, reporter, step_id).await;
                let error = format!("{title} failed: {reason}");
                log_to_run(run, reporter, kind, error.clone()).await;
                error
            }
            None => {
                log_to_run(run, reporter, LogKind::Error, reason.to_string()).await;
                reason.to_string()
            }
        };

        play_lines(run, reporter, beat).await;
        fail_run(run, reporter, error).await;
    }

    async fn finish(&self, run: &mut Run, reporter: &RunReporter, result_ref: Option<String>) {
        if run.status != RunStatus::Working {
            return;
        }

        if let Some(step) = run.tracker.current() {
            let error = format!("Pipeline stopped before '{}' finished", step.title);
            fail_run(run, reporter, error).await;
            return;
        }

        let result_ref = result_ref.or_else(|| Some(self.pull_request_url(run)));
        complete_run(run, reporter, result_ref).await;
    }

    /// Simulated pull-request link for a run.
    pub fn pull_request_url(&self, run: &Run) -> String {
        let number = run.id.as_u128() % 900 + 100;
        format!("{}/pull/{number}", self.repository.trim_end_matches('/'))
    }
}

async fn play_lines(run: &mut Run, reporter: &RunReporter, beat: &Beat) {
    for line in &beat.lines {
        log_to_run_after(run, reporter, line.kind, line.message.clone(), line.pause).await;
    }
}
