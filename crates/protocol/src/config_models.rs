//! Configuration models for the `.momentum/` directory.
//!
//! - `.momentum/config.toml` deserializes into [`GlobalConfig`]
//! - `.momentum/pipelines/*.yaml` each deserialize into a [`PipelineTemplate`]

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::step_models::StepDefinition;

/// How a run is driven once it has been submitted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum DriveStrategy {
    /// Fully local scripted narration. Never touches the network.
    #[default]
    Local,

    /// One `POST /agent/run` to the configured endpoint, then local narration.
    Delegated,
}

/// Project-wide settings from `.momentum/config.toml`.
///
/// Every field has a default, so an empty file is valid.
///
/// # Example
///
/// ```toml
/// strategy = "delegated"
/// endpoint = "http://127.0.0.1:8000"
/// beat-interval-ms = 2000
/// request-timeout-secs = 30
/// repository = "https://github.com/acme/shop"
/// pipeline = "feature-request"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalConfig {
    #[serde(default)]
    pub strategy: DriveStrategy,

    /// Base URL of the agent backend, used by the delegated strategy.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Pause between narration beats, in milliseconds.
    #[serde(default = "default_beat_interval_ms")]
    pub beat_interval_ms: u64,

    /// Timeout for the outbound launch request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Repository used to build simulated pull-request links.
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Name of the pipeline template to seed runs with.
    ///
    /// When unset, the built-in five-stage pipeline is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<String>,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_beat_interval_ms() -> u64 {
    2000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_repository() -> String {
    "https://github.com/momentum-agent/workspace".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            strategy: DriveStrategy::default(),
            endpoint: default_endpoint(),
            beat_interval_ms: default_beat_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            repository: default_repository(),
            pipeline: None,
        }
    }
}

/// An ordered list of step definitions used to seed a run.
///
/// # Example
///
/// ```yaml
/// name: feature-request
/// steps:
///   - title: Planning
///     description: Decomposing the task into smaller steps.
///     kind: search
///   - title: Generating Code
///     description: Writing files for the new feature.
///     kind: code
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct PipelineTemplate {
    pub name: String,

    pub steps: Vec<StepDefinition>,
}
