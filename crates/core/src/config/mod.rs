//! Configuration loading and management.
//!
//! This module loads `config.toml` and the pipeline templates from the
//! `.momentum/` directory structure.

pub mod error;
pub mod loader;
pub mod models;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_config;
pub use models::AppConfig;

/// Name of the per-project configuration directory.
pub const CONFIG_DIR: &str = ".momentum";
