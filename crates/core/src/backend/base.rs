//! Base AgentBackend trait and supporting types.

use async_trait::async_trait;
use thiserror::Error;

/// What the backend acknowledged when a run was launched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchReceipt {
    /// Optional message to show the user.
    pub message: Option<String>,

    /// Pull-request URL (or similar artifact) if the backend already knows it.
    pub result_ref: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("No agent backend configured")]
    NotConfigured,
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
    #[error("Request failed: {0}")]
    Network(String),
    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Something that can launch a real agent run for a prompt.
///
/// The backend does not stream progress back; once `launch` returns the
/// controller narrates the rest locally.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn launch(&self, prompt: &str) -> Result<LaunchReceipt, BackendError>;
}
