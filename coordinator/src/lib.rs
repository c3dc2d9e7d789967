//! Coordinator library for distributing prime range searches
//!
//! This library splits requested ranges into chunks, hands the chunks out to
//! pull-based workers, reclaims chunks from workers that go silent, and
//! stitches submitted results back together in range order.

pub mod api;
pub mod config;
pub mod coordinator;
pub mod core;
pub mod error;
pub mod service;

// Re-export commonly used types
pub use crate::config::CoordinatorConfig;
pub use crate::coordinator::Coordinator;
pub use crate::core::{ChunkStatus, ChunkStore, JobRecord, WorkerInfo};
pub use crate::error::{CoordinatorError, CoordinatorResult};
pub use crate::service::{CoordinatorHandle, CoordinatorRequest, CoordinatorService};
