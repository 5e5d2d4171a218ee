//! Test fixtures for controllers, managers and sample configuration.

use mm_core::config::models::AppConfig;
use mm_core::engine::RunController;
use mm_core::state::manager::RunManager;
use mm_core::state::run::RunReporter;
use mm_protocol::config_models::PipelineTemplate;
use mm_protocol::ipc::Event;
use mm_protocol::log_models::LogKind;
use mm_protocol::step_models::StepDefinition;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Prompt used by the end-to-end scenarios.
pub const HEALTH_CHECK_PROMPT: &str = "Add a health check endpoint";

/// Beat interval used in tests; time is paused so the value only matters
/// for elapsed-time assertions.
pub const TEST_BEAT: Duration = Duration::from_millis(200);

/// A local controller over the built-in five-stage pipeline.
#[allow(dead_code)]
pub fn default_controller() -> RunController {
    RunController::new(AppConfig::default_template())
        .with_beat_interval(TEST_BEAT)
        .with_repository("https://github.com/acme/shop")
}

/// A three-step template with distinct kinds.
#[allow(dead_code)]
pub fn short_template() -> PipelineTemplate {
    PipelineTemplate {
        name: "short".to_string(),
        steps: vec![
            StepDefinition::new("Planning", "Decomposing the task.", LogKind::Search),
            StepDefinition::new("Generating Code", "Writing files.", LogKind::Code),
            StepDefinition::new("Testing", "Running tests.", LogKind::Test),
        ],
    }
}

/// A reporter with a channel large enough for any test run.
#[allow(dead_code)]
pub fn test_reporter() -> (RunReporter, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(1024);
    (RunReporter::new(tx), rx)
}

/// A manager over `controller` with a large event channel.
#[allow(dead_code)]
pub fn test_manager(controller: RunController) -> (RunManager, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(1024);
    (RunManager::new(controller, tx), rx)
}

/// Drain every event currently buffered.
#[allow(dead_code)]
pub fn drain(rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Create a temporary project with a `.momentum/` directory.
///
/// Returns a TempDir that must be kept alive for the test duration.
#[allow(dead_code)]
pub fn create_test_project(config_toml: &str) -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let mm_dir = temp_dir.path().join(".momentum");

    std::fs::create_dir_all(mm_dir.join("pipelines"))?;
    std::fs::write(mm_dir.join("config.toml"), config_toml)?;

    let pipeline_yaml = r#"name: short
steps:
  - title: Planning
    description: Decomposing the task.
    kind: search
  - title: Generating Code
    description: Writing files.
    kind: code
"#;
    std::fs::write(mm_dir.join("pipelines/short.yaml"), pipeline_yaml)?;

    Ok(temp_dir)
}
