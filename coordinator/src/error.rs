//! Coordinator-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use shared::{ChunkId, ErrorResponse, JobId, SharedError, WorkerId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("Invalid range: {message}")]
    InvalidRange { message: String },

    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    #[error("Unknown worker: {worker_id}")]
    UnknownWorker { worker_id: WorkerId },

    #[error("Unknown job: {job_id}")]
    UnknownJob { job_id: JobId },

    #[error("Unknown chunk: {chunk_id}")]
    UnknownChunk { chunk_id: ChunkId },

    #[error("Chunk {chunk_id} is not assigned to worker {worker_id}")]
    NotAssigned { chunk_id: ChunkId, worker_id: WorkerId },

    #[error("Coordinator task is not running")]
    Unavailable,

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

impl CoordinatorError {
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::InvalidRange { message: message.into() }
    }

    pub fn config(field: impl Into<String>) -> Self {
        Self::ConfigurationError { field: field.into() }
    }

    /// HTTP status used when this error crosses the API boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRange { .. } | Self::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
            Self::UnknownWorker { .. } | Self::UnknownJob { .. } | Self::UnknownChunk { .. } => {
                StatusCode::NOT_FOUND
            }
            Self::NotAssigned { .. } => StatusCode::CONFLICT,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::ConfigurationError { .. } | Self::IoError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<SharedError> for CoordinatorError {
    fn from(error: SharedError) -> Self {
        match error {
            SharedError::InvalidRange { message } => Self::InvalidRange { message },
            SharedError::InvalidId { input } => Self::MalformedPayload {
                message: format!(
                    "invalid worker id '{input}': use letters, digits, '-', '_' or '.'"
                ),
            },
        }
    }
}

impl From<std::io::Error> for CoordinatorError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError { message: error.to_string() }
    }
}

impl IntoResponse for CoordinatorError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

pub type CoordinatorResult<T> = Result<T, CoordinatorError>;
