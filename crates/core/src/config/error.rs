//! Errors raised while loading `.momentum/`.
//!
//! Missing files are not errors (defaults apply). Unreadable or malformed
//! files are, and so is a configuration that parses but cannot drive a run.

use std::path::PathBuf;
use thiserror::Error;

/// Why `load_config` rejected a project.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `config.toml` or a pipeline file exists but could not be read.
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `config.toml` is not valid TOML or has a bad `strategy` value.
    #[error("Failed to parse TOML file at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A file under `pipelines/` is not a valid pipeline template.
    #[error("Failed to parse YAML file at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// `pipelines/` could not be listed.
    #[error("Failed to traverse directory {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// A template with no steps, or `pipeline` naming a template that
    /// does not exist.
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },
}

/// Result of loading configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;
