//! Client ↔ Coordinator messages

use serde::{Deserialize, Serialize};

use crate::JobId;

/// `POST /jobs`
///
/// `chunk_size` and `rounds` are signed so that out-of-range values can be
/// normalised by the coordinator instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub start: u64,
    pub end: u64,
    #[serde(default)]
    pub rounds: i64,
    #[serde(default)]
    pub chunk_size: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    pub job_id: JobId,
}

/// `GET /jobs/{jobId}/results`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResultsResponse {
    pub job_id: JobId,
    pub primes: Vec<u64>,
}

/// `GET /jobs/{jobId}` - progress of a job's chunks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub job_id: JobId,
    pub start: u64,
    pub end: u64,
    pub chunk_size: u64,
    pub rounds: u32,
    pub total_chunks: usize,
    pub pending: usize,
    pub assigned: usize,
    pub completed: usize,
    pub complete: bool,
}
