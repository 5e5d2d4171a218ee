//! Errors from `momentum init`.

use std::path::PathBuf;
use thiserror::Error;

/// Result of scaffolding `.momentum/`.
pub type InitResult<T> = Result<T, InitError>;

/// Why `.momentum/` could not be scaffolded.
#[derive(Debug, Error)]
pub enum InitError {
    /// Refused to overwrite an existing configuration.
    #[error("{0:?} already exists. Run `momentum init --force` to overwrite it.")]
    DirectoryExists(PathBuf),

    /// The binary was built without one of the bundled templates.
    #[error("Bundled template missing: {0}")]
    TemplateNotFound(String),

    #[error("Could not create {path:?}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not write {path:?}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
