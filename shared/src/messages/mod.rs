//! Wire messages exchanged over HTTP
//!
//! - `job`: Client ↔ Coordinator (job creation, status, results)
//! - `worker`: Worker ↔ Coordinator (registration, result submission)
//!
//! Chunks travel as [`crate::WorkChunk`] directly. All bodies are JSON with
//! camelCase field names.

pub mod job;
pub mod worker;

pub use job::{CreateJobRequest, CreateJobResponse, JobResultsResponse, JobStatus};
pub use worker::{RegisterWorkerRequest, RegisterWorkerResponse, SubmitResultRequest};

use serde::{Deserialize, Serialize};

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Snapshot of the coordinator's bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorStats {
    pub jobs: usize,
    pub workers: usize,
    pub pending_chunks: usize,
    pub assigned_chunks: usize,
    pub completed_chunks: usize,
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub stats: CoordinatorStats,
}
