//! Worker trait definitions for dependency injection

use async_trait::async_trait;

use shared::{Algorithm, ChunkResult, WorkChunk, WorkerId};
use crate::error::{AlgorithmError, WorkerResult};

/// Coordinator access as seen by the worker loop
#[mockall::automock]
#[async_trait]
pub trait CoordinatorClient: Send + Sync {
    /// Register, optionally re-using a known ID, and return the assigned ID
    async fn register(&self, worker_id: Option<WorkerId>) -> WorkerResult<WorkerId>;

    /// Pull the next chunk; `None` when the queue is empty
    async fn next_chunk(&self, worker_id: &WorkerId) -> WorkerResult<Option<WorkChunk>>;

    /// Tell the coordinator this worker is still alive
    async fn heartbeat(&self, worker_id: &WorkerId) -> WorkerResult<()>;

    /// Submit the primes found in a chunk
    async fn submit_result(&self, worker_id: &WorkerId, result: ChunkResult) -> WorkerResult<()>;
}

/// Prime search over a closed range
///
/// Implementations are CPU-bound and called from the blocking pool.
#[mockall::automock]
pub trait AlgorithmProvider: Send + Sync {
    /// Ascending primes in `[start, end]` using the given algorithm
    fn primes_in_range(
        &self,
        start: u64,
        end: u64,
        algorithm: Algorithm,
    ) -> Result<Vec<u64>, AlgorithmError>;
}
