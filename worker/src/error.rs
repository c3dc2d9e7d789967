//! Worker error types

use thiserror::Error;

/// Result type for worker operations
pub type WorkerResult<T> = Result<T, WorkerError>;

/// Failures of the prime search itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmError {
    #[error("Invalid range [{start}, {end}]: start must be at least 2 and not above end")]
    InvalidRange { start: u64, end: u64 },

    #[error("Range end {end} exceeds the sieve limit {limit}")]
    RangeTooLarge { end: u64, limit: u64 },
}

/// Worker error types
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Registration failed: {message}")]
    RegistrationFailed { message: String },

    #[error("Transport failure: {0}")]
    TransportFailure(#[from] reqwest::Error),

    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    #[error("Coordinator does not know worker: {worker_id}")]
    UnknownWorker { worker_id: String },

    #[error("Coordinator rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Algorithm error: {0}")]
    Algorithm(#[from] AlgorithmError),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl WorkerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the coordinator has forgotten this worker
    pub fn is_unknown_worker(&self) -> bool {
        matches!(self, Self::UnknownWorker { .. })
    }
}
