//! Configuration models that aggregate all settings.
//!
//! `AppConfig` combines the global settings with every pipeline template
//! found on disk and knows which template new runs are seeded from.

use mm_protocol::config_models::{GlobalConfig, PipelineTemplate};
use mm_protocol::log_models::LogKind;
use mm_protocol::step_models::StepDefinition;
use std::time::Duration;

/// Name of the built-in pipeline.
pub const DEFAULT_PIPELINE: &str = "feature-request";

/// Unified application configuration loaded from `.momentum/`.
///
/// # Example
///
/// ```rust,no_run
/// use mm_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Seeding runs from '{}'", config.active_template().name);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// All templates loaded from `pipelines/*.yaml`.
    pub pipelines: Vec<PipelineTemplate>,
}

impl AppConfig {
    /// The built-in five-stage pipeline.
    pub fn default_template() -> PipelineTemplate {
        PipelineTemplate {
            name: DEFAULT_PIPELINE.to_string(),
            steps: vec![
                StepDefinition::new(
                    "Planning",
                    "Decomposing the task into smaller steps.",
                    LogKind::Search,
                ),
                StepDefinition::new(
                    "Generating Code",
                    "Writing files for the requested feature.",
                    LogKind::Code,
                ),
                StepDefinition::new(
                    "Testing",
                    "Running unit and integration tests.",
                    LogKind::Test,
                ),
                StepDefinition::new(
                    "Opening Pull Request",
                    "Pushing code and creating a PR on GitHub.",
                    LogKind::Git,
                ),
                StepDefinition::new(
                    "Automated Review",
                    "Awaiting automated code review.",
                    LogKind::Review,
                ),
            ],
        }
    }

    /// Find a loaded template by name.
    pub fn template(&self, name: &str) -> Option<&PipelineTemplate> {
        self.pipelines.iter().find(|p| p.name == name)
    }

    /// The template new runs are seeded from.
    ///
    /// The one named by `pipeline` in `config.toml` if set, otherwise the
    /// built-in default. The loader has already rejected unknown names.
    pub fn active_template(&self) -> PipelineTemplate {
        self.global
            .pipeline
            .as_deref()
            .and_then(|name| self.template(name))
            .cloned()
            .unwrap_or_else(Self::default_template)
    }

    pub fn beat_interval(&self) -> Duration {
        Duration::from_millis(self.global.beat_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.global.request_timeout_secs)
    }
}
