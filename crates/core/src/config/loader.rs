//! Configuration file loader for the `.momentum/` directory structure.
//!
//! This module loads:
//! - `config.toml`: Global settings
//! - `pipelines/*.yaml` and `pipelines/*.yml`: Pipeline templates

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use crate::config::CONFIG_DIR;
use mm_protocol::config_models::{GlobalConfig, PipelineTemplate};
use std::path::Path;
use walkdir::WalkDir;

/// Loads all configuration from the `.momentum/` directory under `root`.
///
/// Missing directories or files fall back to defaults rather than erroring.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid TOML or YAML syntax
/// - A template has no steps, or `pipeline` names a template that was not found
///
/// # Example
///
/// ```rust,no_run
/// use mm_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} pipelines", config.pipelines.len());
/// # Ok(())
/// # }
/// ```
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let mm_dir = root.join(CONFIG_DIR);

    if !mm_dir.exists() {
        tracing::debug!(path = %mm_dir.display(), "no config directory, using defaults");
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&mm_dir)?;
    let pipelines = load_pipelines(&mm_dir)?;

    let config = AppConfig { global, pipelines };
    validate(&mm_dir, &config)?;

    tracing::debug!(
        pipelines = config.pipelines.len(),
        strategy = ?config.global.strategy,
        "configuration loaded"
    );
    Ok(config)
}

fn load_global_config(mm_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = mm_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: config_path,
        source,
    })
}

fn load_pipelines(mm_dir: &Path) -> ConfigResult<Vec<PipelineTemplate>> {
    let pipelines_dir = mm_dir.join("pipelines");

    if !pipelines_dir.exists() {
        return Ok(Vec::new());
    }

    let mut pipelines = Vec::new();

    for entry in WalkDir::new(&pipelines_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: pipelines_dir.clone(),
            source,
        })?;

        let path = entry.path();

        let ext = path.extension().and_then(|s| s.to_str());
        if ext != Some("yaml") && ext != Some("yml") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let pipeline: PipelineTemplate =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
                path: path.to_path_buf(),
                source,
            })?;

        if pipeline.steps.is_empty() {
            return Err(ConfigError::InvalidConfig {
                path: path.to_path_buf(),
                reason: format!("pipeline '{}' has no steps", pipeline.name),
            });
        }

        pipelines.push(pipeline);
    }

    Ok(pipelines)
}

fn validate(mm_dir: &Path, config: &AppConfig) -> ConfigResult<()> {
    let Some(name) = config.global.pipeline.as_deref() else {
        return Ok(());
    };

    if config.template(name).is_none() {
        return Err(ConfigError::InvalidConfig {
            path: mm_dir.join("config.toml"),
            reason: format!("unknown pipeline '{name}'"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_protocol::config_models::DriveStrategy;
    use mm_protocol::log_models::LogKind;
    use std::fs;
    use tempfile::tempdir;

    const HOTFIX_YAML: &str = r#"name: hotfix
steps:
  - title: Reproduce
    description: Writing a failing test for the bug.
    kind: test
  - title: Patch
    description: Applying the fix.
    kind: code
"#;

    /// A complete `.momentum/` tree loads every file.
    #[tokio::test]
    async fn test_load_config_acceptance() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let mm_dir = root.join(CONFIG_DIR);

        fs::create_dir_all(mm_dir.join("pipelines")).expect("Failed to create pipelines dir");

        let config_toml = r#"strategy = "delegated"
endpoint = "http://localhost:9000"
beat-interval-ms = 250
pipeline = "hotfix"
"#;
        fs::write(mm_dir.join("config.toml"), config_toml).expect("Failed to write config.toml");
        fs::write(mm_dir.join("pipelines/hotfix.yaml"), HOTFIX_YAML)
            .expect("Failed to write pipeline file");

        let config = load_config(root).await.expect("Failed to load config");

        assert_eq!(config.global.strategy, DriveStrategy::Delegated);
        assert_eq!(config.global.endpoint, "http://localhost:9000");
        assert_eq!(config.global.beat_interval_ms, 250);
        assert_eq!(config.global.request_timeout_secs, 30);

        assert_eq!(config.pipelines.len(), 1);
        let active = config.active_template();
        assert_eq!(active.name, "hotfix");
        assert_eq!(active.steps[0].kind, LogKind::Test);
        assert_eq!(active.steps[1].title, "Patch");
    }

    /// Loading from a directory without `.momentum/` yields defaults.
    #[tokio::test]
    async fn test_load_config_empty_directory() {
        let dir = tempdir().expect("Failed to create temp dir");

        let config = load_config(dir.path())
            .await
            .expect("Should handle missing .momentum");

        assert_eq!(config.global, GlobalConfig::default());
        assert!(config.pipelines.is_empty());
        assert_eq!(config.active_template().steps.len(), 5);
    }

    #[tokio::test]
    async fn test_load_config_partial() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mm_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&mm_dir).expect("Failed to create .momentum");

        fs::write(mm_dir.join("config.toml"), "beat-interval-ms = 10")
            .expect("Failed to write config.toml");

        let config = load_config(dir.path())
            .await
            .expect("Should handle partial config");

        assert_eq!(config.global.beat_interval_ms, 10);
        assert_eq!(config.global.strategy, DriveStrategy::Local);
        assert!(config.pipelines.is_empty());
    }

    #[tokio::test]
    async fn test_load_config_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mm_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&mm_dir).expect("Failed to create .momentum");

        fs::write(mm_dir.join("config.toml"), "strategy = [invalid toml")
            .expect("Failed to write config.toml");

        let result = load_config(dir.path()).await;

        if let Err(ConfigError::TomlParse { path, .. }) = result {
            assert!(path.ends_with("config.toml"));
        } else {
            panic!("Expected TomlParse error");
        }
    }

    #[tokio::test]
    async fn test_load_config_unknown_strategy() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mm_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&mm_dir).expect("Failed to create .momentum");

        fs::write(mm_dir.join("config.toml"), "strategy = \"remote\"")
            .expect("Failed to write config.toml");

        let result = load_config(dir.path()).await;
        assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
    }

    #[tokio::test]
    async fn test_load_config_invalid_yaml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mm_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(mm_dir.join("pipelines")).expect("Failed to create pipelines dir");

        fs::write(mm_dir.join("pipelines/test.yaml"), "name: test\n  invalid: [yaml")
            .expect("Failed to write pipeline file");

        let result = load_config(dir.path()).await;

        if let Err(ConfigError::YamlParse { path, .. }) = result {
            assert!(path.ends_with("test.yaml"));
        } else {
            panic!("Expected YamlParse error");
        }
    }

    #[tokio::test]
    async fn test_load_config_rejects_empty_pipeline() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mm_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(mm_dir.join("pipelines")).expect("Failed to create pipelines dir");

        fs::write(mm_dir.join("pipelines/empty.yaml"), "name: empty\nsteps: []\n")
            .expect("Failed to write pipeline file");

        let result = load_config(dir.path()).await;

        if let Err(ConfigError::InvalidConfig { path, reason }) = result {
            assert!(path.ends_with("empty.yaml"));
            assert!(reason.contains("no steps"));
        } else {
            panic!("Expected InvalidConfig error");
        }
    }

    #[tokio::test]
    async fn test_load_config_rejects_unknown_pipeline_name() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mm_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&mm_dir).expect("Failed to create .momentum");

        fs::write(mm_dir.join("config.toml"), "pipeline = \"missing\"")
            .expect("Failed to write config.toml");

        let result = load_config(dir.path()).await;

        if let Err(err @ ConfigError::InvalidConfig { .. }) = result {
            assert!(err.to_string().starts_with("Invalid configuration in"));
            assert!(err.to_string().contains("missing"));
        } else {
            panic!("Expected InvalidConfig error");
        }
    }

    #[tokio::test]
    async fn test_load_config_ignores_non_matching_files() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mm_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(mm_dir.join("pipelines")).expect("Failed to create pipelines dir");

        fs::write(mm_dir.join("pipelines/notes.txt"), "Not a yaml file")
            .expect("Failed to write txt file");
        fs::write(mm_dir.join("pipelines/hotfix.yml"), HOTFIX_YAML)
            .expect("Failed to write pipeline file");

        let config = load_config(dir.path())
            .await
            .expect("Should ignore non-matching files");

        assert_eq!(config.pipelines.len(), 1, "Should only load .yaml/.yml files");
        assert_eq!(config.pipelines[0].name, "hotfix");
    }
}
