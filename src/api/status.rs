//! Client for the remote distraction status endpoint.
//!
//! The status provider is an external process (typically a gaze tracker
//! running next to the webcam) that exposes its latest verdict over HTTP:
//!
//! ```text
//! GET /status
//! {"alert": true}
//! ```
//!
//! ## Error Resilience
//!
//! The endpoint is polled about once a second and is often not running at
//! all. When used as a [`DetectionSource`] every failure is logged at debug
//! level and read as "not distracted", so a missing or broken provider can
//! never raise an alert or stop the polling loop. [`StatusClient::fetch`]
//! keeps the typed error for the `check` command.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lookaway::api::status::StatusClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = StatusClient::new("http://localhost:5000/status");
//!     let report = client.fetch().await?;
//!     println!("alert: {}", report.alert);
//!     Ok(())
//! }
//! ```

use crate::libs::detection::{DetectionSignal, DetectionSource};
use crate::libs::messages::Message;
use crate::msg_debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::future::Future;
use thiserror::Error;

/// Default endpoint of a locally running status provider.
pub const DEFAULT_STATUS_URL: &str = "http://localhost:5000/status";

/// Body returned by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StatusReport {
    /// Whether the provider currently sees the user as distracted.
    pub alert: bool,
}

/// Ways a single status query can fail.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("status endpoint unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("status endpoint answered with HTTP {0}")]
    HttpStatus(StatusCode),
    #[error("malformed status body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Read-only HTTP client for the status endpoint.
#[derive(Debug, Clone)]
pub struct StatusClient {
    /// HTTP client with connection pooling
    client: Client,
    /// Full URL of the status resource
    url: String,
}

impl StatusClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs one `GET` against the endpoint and decodes the body.
    pub async fn fetch(&self) -> Result<StatusReport, PollError> {
        let response = self.client.get(&self.url).send().await.map_err(PollError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::HttpStatus(status));
        }

        let body = response.bytes().await.map_err(PollError::Transport)?;
        serde_json::from_slice(&body).map_err(PollError::Decode)
    }
}

impl DetectionSource for StatusClient {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn poll(&self) -> impl Future<Output = DetectionSignal> + Send {
        async move {
            match self.fetch().await {
                Ok(report) => DetectionSignal::new(report.alert),
                Err(e) => {
                    msg_debug!(Message::StatusPollFailed(e.to_string()));
                    DetectionSignal::FOCUSED
                }
            }
        }
    }
}
