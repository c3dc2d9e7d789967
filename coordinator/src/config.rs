//! Coordinator configuration

use std::net::SocketAddr;
use std::time::Duration;

use shared::{DETERMINISTIC_LIMIT, MIN_PRIME};

use crate::error::{CoordinatorError, CoordinatorResult};

/// Chunk size used when a client asks for a non-positive one
pub const DEFAULT_CHUNK_SIZE: u64 = 10_000;

/// Ranges lying fully below this value are sieved instead of tested
pub const DEFAULT_THRESHOLD: u64 = 1_000_000;

/// Runtime settings for the coordinator process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// HTTP listen address
    pub bind_address: SocketAddr,

    /// Chunk size substituted for `chunkSize <= 0` requests
    pub default_chunk_size: u64,

    /// Deterministic/probabilistic boundary
    pub threshold: u64,

    /// Upper bound on chunks a single job may produce
    pub max_chunks_per_job: usize,

    /// An assigned chunk is requeued once its worker has been silent this long
    pub worker_timeout: Duration,

    /// How often the stale-assignment sweep runs
    pub sweep_interval: Duration,

    /// Request channel buffer for the coordinator task
    pub channel_buffer: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8080)),
            default_chunk_size: DEFAULT_CHUNK_SIZE,
            threshold: DEFAULT_THRESHOLD,
            max_chunks_per_job: 1_000_000,
            worker_timeout: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(15),
            channel_buffer: 256,
        }
    }
}

impl CoordinatorConfig {
    /// Check the settings are usable together
    pub fn validate(&self) -> CoordinatorResult<()> {
        if self.default_chunk_size == 0 {
            return Err(CoordinatorError::config("default_chunk_size must be positive"));
        }
        // Deterministic chunks end below the threshold, so it may sit one past the sieve limit
        if self.threshold <= MIN_PRIME || self.threshold > DETERMINISTIC_LIMIT + 1 {
            return Err(CoordinatorError::config(format!(
                "threshold must be in {}..={}",
                MIN_PRIME + 1,
                DETERMINISTIC_LIMIT + 1
            )));
        }
        if self.max_chunks_per_job == 0 {
            return Err(CoordinatorError::config("max_chunks_per_job must be positive"));
        }
        if self.worker_timeout.is_zero() {
            return Err(CoordinatorError::config("worker_timeout must be positive"));
        }
        if self.sweep_interval.is_zero() {
            return Err(CoordinatorError::config("sweep_interval must be positive"));
        }
        if self.channel_buffer == 0 {
            return Err(CoordinatorError::config("channel_buffer must be positive"));
        }
        Ok(())
    }

    /// Resolve the chunk size a client asked for, replacing `<= 0` by the default
    pub fn effective_chunk_size(&self, requested: i64) -> u64 {
        u64::try_from(requested)
            .ok()
            .filter(|size| *size > 0)
            .unwrap_or(self.default_chunk_size)
    }
}
