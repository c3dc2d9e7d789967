//! Worker ↔ Coordinator messages

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{ChunkId, ChunkResult, WorkerId};

/// `POST /workers` - the body is optional; supplying an ID re-registers it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterWorkerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<WorkerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterWorkerResponse {
    pub worker_id: WorkerId,
}

/// `POST /workers/{workerId}/results`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultRequest {
    pub chunk_id: ChunkId,
    pub primes: Vec<u64>,
    pub compute_duration_ms: u64,
}

impl From<ChunkResult> for SubmitResultRequest {
    fn from(result: ChunkResult) -> Self {
        Self {
            chunk_id: result.chunk_id,
            primes: result.primes,
            compute_duration_ms: u64::try_from(result.compute_duration.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

impl From<SubmitResultRequest> for ChunkResult {
    fn from(request: SubmitResultRequest) -> Self {
        Self {
            chunk_id: request.chunk_id,
            primes: request.primes,
            compute_duration: Duration::from_millis(request.compute_duration_ms),
        }
    }
}
