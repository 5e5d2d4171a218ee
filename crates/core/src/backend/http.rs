//! HTTP backend for the delegated strategy.
//!
//! Sends `POST {endpoint}/agent/run` with `{"prompt": ...}` and expects a JSON
//! body with an optional `message`. Any non-2xx status, transport error or
//! unparsable body is reported as a [`BackendError`].

use crate::backend::base::{AgentBackend, BackendError, LaunchReceipt};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Path of the launch endpoint, relative to the configured base URL.
pub const RUN_PATH: &str = "/agent/run";

pub struct HttpBackend {
    client: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct AgentRunRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct AgentRunResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    pull_request_url: Option<String>,
}

impl HttpBackend {
    /// Create a backend for `endpoint` (e.g. `http://127.0.0.1:8000`).
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Full URL of the launch endpoint.
    pub fn run_url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), RUN_PATH)
    }
}

#[async_trait]
impl AgentBackend for HttpBackend {
    fn name(&self) -> &str {
        &self.endpoint
    }

    async fn launch(&self, prompt: &str) -> Result<LaunchReceipt, BackendError> {
        let url = self.run_url();
        tracing::debug!(%url, "launching agent run");

        let response = self
            .client
            .post(&url)
            .json(&AgentRunRequest { prompt })
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: AgentRunResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(LaunchReceipt {
            message: body.message.filter(|m| !m.trim().is_empty()),
            result_ref: body.pull_request_url,
        })
    }
}
