//! Directory structure and file generation for `.momentum/` initialization.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::CONFIG_DIR;
use std::fs;
use std::path::{Path, PathBuf};

/// Pipeline written in minimal mode.
const MINIMAL_PIPELINE: &str = "pipelines/feature-request.yaml";

/// Options for initializing a `.momentum` directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory in which `.momentum/` is created.
    pub target_dir: PathBuf,

    /// Overwrite an existing `.momentum/` directory.
    pub force: bool,

    /// Only write the feature-request pipeline.
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate a `.momentum/` directory from the embedded templates.
///
/// ```text
/// .momentum/
/// ├── config.toml
/// └── pipelines/
///     ├── feature-request.yaml
///     └── hotfix.yaml (unless minimal)
/// ```
///
/// Returns the path of the created directory.
///
/// # Errors
///
/// - `DirectoryExists` if `.momentum/` exists and `force` is not set
/// - `TemplateNotFound` if an embedded template is missing
/// - `DirectoryCreate` / `FileWrite` on file system failures
pub async fn generate_momentum_structure(options: InitOptions) -> InitResult<PathBuf> {
    let mm_dir = options.target_dir.join(CONFIG_DIR);

    if mm_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(mm_dir));
    }

    fs::create_dir_all(mm_dir.join("pipelines")).map_err(|source| InitError::DirectoryCreate {
        path: mm_dir.join("pipelines"),
        source,
    })?;

    write_template_file(&mm_dir, "config.toml")?;

    if options.minimal {
        write_template_file(&mm_dir, MINIMAL_PIPELINE)?;
    } else {
        for pipeline_path in list_templates("pipelines/") {
            write_template_file(&mm_dir, &pipeline_path)?;
        }
    }

    tracing::info!(path = %mm_dir.display(), minimal = options.minimal, "initialized configuration");
    Ok(mm_dir)
}

fn write_template_file(mm_dir: &Path, template_path: &str) -> InitResult<()> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = mm_dir.join(template_path);

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path,
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::load_config;
    use tempfile::tempdir;

    fn options(dir: &Path, force: bool, minimal: bool) -> InitOptions {
        InitOptions {
            target_dir: dir.to_path_buf(),
            force,
            minimal,
        }
    }

    #[tokio::test]
    async fn test_generate_structure_success() {
        let dir = tempdir().unwrap();

        let mm_dir = generate_momentum_structure(options(dir.path(), false, false))
            .await
            .unwrap();

        assert_eq!(mm_dir, dir.path().join(".momentum"));
        assert!(mm_dir.join("config.toml").exists());
        assert!(mm_dir.join("pipelines/feature-request.yaml").exists());
        assert!(mm_dir.join("pipelines/hotfix.yaml").exists());
    }

    /// The generated tree must load cleanly.
    #[tokio::test]
    async fn test_generated_structure_loads() {
        let dir = tempdir().unwrap();
        generate_momentum_structure(options(dir.path(), false, false))
            .await
            .unwrap();

        let config = load_config(dir.path()).await.unwrap();

        assert_eq!(config.pipelines.len(), 2);
        let active = config.active_template();
        assert_eq!(active.name, "feature-request");
        assert_eq!(active.steps.len(), 5);
    }

    #[tokio::test]
    async fn test_generate_structure_minimal() {
        let dir = tempdir().unwrap();

        let mm_dir = generate_momentum_structure(options(dir.path(), false, true))
            .await
            .unwrap();

        assert!(mm_dir.join("pipelines/feature-request.yaml").exists());
        assert!(!mm_dir.join("pipelines/hotfix.yaml").exists());
        assert!(load_config(dir.path()).await.is_ok());
    }

    #[tokio::test]
    async fn test_generate_structure_exists_without_force() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".momentum")).unwrap();

        let result = generate_momentum_structure(options(dir.path(), false, false)).await;

        let err = result.unwrap_err();
        assert!(matches!(err, InitError::DirectoryExists(_)));
        assert!(err.to_string().contains("momentum init --force"));
        assert!(!dir.path().join(".momentum/config.toml").exists());
    }

    #[tokio::test]
    async fn test_generate_structure_exists_with_force() {
        let dir = tempdir().unwrap();
        let mm_dir = dir.path().join(".momentum");
        fs::create_dir_all(&mm_dir).unwrap();
        fs::write(mm_dir.join("config.toml"), "strategy = \"delegated\"").unwrap();

        generate_momentum_structure(options(dir.path(), true, false))
            .await
            .unwrap();

        let config = fs::read_to_string(mm_dir.join("config.toml")).unwrap();
        assert!(config.contains("strategy = \"local\""));
    }

    #[test]
    fn test_default_init_options() {
        let options = InitOptions::default();
        assert!(!options.force);
        assert!(!options.minimal);
    }
}
