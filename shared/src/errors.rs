//! Shared error types for the distributed prime range system

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Invalid range: {message}")]
    InvalidRange { message: String },

    #[error("Invalid identifier: {input}")]
    InvalidId { input: String },
}

impl SharedError {
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::InvalidRange { message: message.into() }
    }
}

pub type SharedResult<T> = Result<T, SharedError>;
