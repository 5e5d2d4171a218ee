//! # mm-protocol
//!
//! Data models shared by every momentum crate.
//!
//! This crate defines:
//! - Pipeline steps and their statuses
//! - Activity log entries
//! - The serializable read model of a run
//! - Configuration file formats (TOML settings, YAML pipeline templates)
//! - Operations and Events exchanged between a view and the core
//!
//! ## Modules
//!
//! - [`step_models`]: `Step`, `StepStatus`, `StepDefinition`
//! - [`log_models`]: `LogEntry`, `LogKind`
//! - [`run_models`]: `RunSnapshot`, `RunStatus`
//! - [`config_models`]: `GlobalConfig`, `PipelineTemplate`, `DriveStrategy`
//! - [`ipc`]: `Op` and `Event`
//!
//! Every type derives `TS` so a browser view can share the same shapes.

pub mod config_models;
pub mod ipc;
pub mod log_models;
pub mod run_models;
pub mod step_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use ipc::*;
pub use log_models::*;
pub use run_models::*;
pub use step_models::*;
