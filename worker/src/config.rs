//! Worker configuration

use std::time::Duration;

use reqwest::Url;
use shared::WorkerId;

use crate::error::{WorkerError, WorkerResult};

/// Runtime settings for one worker process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Base URL of the coordinator, e.g. `http://127.0.0.1:8080`
    pub server_url: String,

    /// Label used in log lines (`worker_{index}`)
    pub index: u32,

    /// Re-register under this ID instead of asking for a new one
    pub worker_id: Option<WorkerId>,

    /// Heartbeat period while a chunk is being computed
    pub heartbeat_interval: Duration,

    /// Per-request timeout for coordinator calls
    pub request_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".to_string(),
            index: 0,
            worker_id: None,
            heartbeat_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl WorkerConfig {
    pub fn validate(&self) -> WorkerResult<()> {
        let url = Url::parse(&self.server_url).map_err(|e| {
            WorkerError::config(format!("invalid server url {}: {e}", self.server_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(WorkerError::config(format!(
                "server url must be http or https, got {}",
                url.scheme()
            )));
        }
        if let Some(worker_id) = &self.worker_id {
            WorkerId::parse(worker_id.as_str())
                .map_err(|e| WorkerError::config(format!("worker id cannot be used: {e}")))?;
        }
        if self.heartbeat_interval.is_zero() {
            return Err(WorkerError::config("heartbeat interval must be positive"));
        }
        if self.request_timeout.is_zero() {
            return Err(WorkerError::config("request timeout must be positive"));
        }
        Ok(())
    }
}
