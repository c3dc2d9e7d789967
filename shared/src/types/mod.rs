//! Core types used throughout the prime range system

mod chunk;
mod ids;

pub use chunk::{
    validate_range, Algorithm, ChunkResult, WorkChunk, DETERMINISTIC_LIMIT, MIN_PRIME,
    MIN_PROBABILISTIC_ROUNDS,
};
pub use ids::{ChunkId, JobId, WorkerId, MAX_WORKER_ID_LEN};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Global process ID singleton - set once at startup
static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Used until a binary calls one of the `init_*` functions (library tests)
static UNINITIALIZED: ProcessId = ProcessId::Unset;

/// Process identifier for any component in the system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// Coordinator process (singleton)
    Coordinator,
    /// Worker process with an operator-chosen index
    Worker(u32),
    /// Nothing initialised the global yet
    Unset,
}

impl ProcessId {
    /// Initialize the global process ID for the coordinator
    pub fn init_coordinator() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Coordinator)
    }

    /// Initialize the global process ID for a worker with explicit index
    pub fn init_worker(index: u32) -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Worker(index))
    }

    /// Get the global process ID
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get().unwrap_or(&UNINITIALIZED)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::Coordinator => write!(f, "coordinator"),
            ProcessId::Worker(index) => write!(f, "worker_{index}"),
            ProcessId::Unset => write!(f, "unset"),
        }
    }
}
