//! Mock backend for tests and offline demos.

use crate::backend::base::{AgentBackend, BackendError, LaunchReceipt};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;

pub struct MockBackend {
    outcome: Result<LaunchReceipt, BackendError>,
    delay: Duration,
    prompts: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Accept every launch with the given message.
    pub fn accepting(message: Option<&str>) -> Self {
        Self::new(Ok(LaunchReceipt {
            message: message.map(str::to_string),
            result_ref: None,
        }))
    }

    /// Reject every launch with `error`.
    pub fn rejecting(error: BackendError) -> Self {
        Self::new(Err(error))
    }

    pub fn new(outcome: Result<LaunchReceipt, BackendError>) -> Self {
        Self {
            outcome,
            delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Simulate network latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Prompts received so far, in call order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl AgentBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn launch(&self, prompt: &str) -> Result<LaunchReceipt, BackendError> {
        self.prompts.lock().await.push(prompt.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}
