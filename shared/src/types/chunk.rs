//! Work chunks and their results

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::{ChunkId, JobId};
use crate::errors::{SharedError, SharedResult};

/// Round count used when a probabilistic chunk asks for zero rounds
pub const MIN_PROBABILISTIC_ROUNDS: u32 = 5;

/// Smallest value any range may start at
pub const MIN_PRIME: u64 = 2;

/// Largest `end` the deterministic sieve accepts
pub const DETERMINISTIC_LIMIT: u64 = 100_000_000;

/// Reject ranges that are inverted or start below [`MIN_PRIME`]
pub fn validate_range(start: u64, end: u64) -> SharedResult<()> {
    if start < MIN_PRIME {
        return Err(SharedError::invalid_range(format!(
            "start ({start}) is less than the minimum prime ({MIN_PRIME})"
        )));
    }
    if start > end {
        return Err(SharedError::invalid_range(format!(
            "start ({start}) must be less than or equal to end ({end})"
        )));
    }
    Ok(())
}

/// Primality algorithm a chunk must be computed with
///
/// Chosen by the coordinator when the chunk is created and carried on the
/// chunk; workers never decide it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Algorithm {
    /// Exact sieve, only valid below the threshold
    Deterministic,
    /// Miller-Rabin with the given number of random bases per candidate
    Probabilistic { rounds: u32 },
}

impl Algorithm {
    /// Deterministic iff both ends of the range lie below `threshold`
    pub fn select(start: u64, end: u64, threshold: u64, rounds: u32) -> Self {
        if start < threshold && end < threshold {
            Algorithm::Deterministic
        } else {
            Algorithm::Probabilistic { rounds }
        }
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self, Algorithm::Deterministic)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Deterministic => write!(f, "eratosthenes"),
            Algorithm::Probabilistic { rounds } => write!(f, "miller-rabin({rounds})"),
        }
    }
}

/// A contiguous inclusive sub-range of a job plus the algorithm to use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkChunk {
    pub id: ChunkId,
    pub job_id: JobId,
    pub start: u64,
    pub end: u64,
    pub algorithm: Algorithm,
}

/// Primes found in one chunk together with how long the search took
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkResult {
    pub chunk_id: ChunkId,
    pub primes: Vec<u64>,
    pub compute_duration: Duration,
}
