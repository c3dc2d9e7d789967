//! Core business logic modules
//!
//! This module contains pure business logic with no I/O dependencies.
//! Time is passed in where it matters so behaviour stays testable.

pub mod chunking;
pub mod store;

pub use chunking::{chunk_count, plan_chunks};
pub use store::{ChunkStatus, ChunkStore, JobRecord, WorkerInfo};
