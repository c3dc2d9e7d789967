//! Worker library for the distributed prime range service
//!
//! A worker registers with the coordinator, then pulls chunks, computes the
//! primes in each chunk with the algorithm the chunk names, and submits the
//! result back until the queue runs dry.

pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod traits;

// Re-export main types
pub use crate::config::WorkerConfig;
pub use crate::core::{RunSummary, WorkerAgent};
pub use crate::error::{AlgorithmError, WorkerError, WorkerResult};
pub use crate::services::{HttpCoordinatorClient, RealAlgorithmProvider};
pub use crate::traits::{AlgorithmProvider, CoordinatorClient};
