//! Shared types for the distributed prime range system
//!
//! Contains only what crosses the coordinator ↔ worker boundary: identifiers,
//! the chunk/result data model, wire messages, errors and logging helpers.
//! Coordinator-internal bookkeeping (queue, assignment records) lives in the
//! coordinator crate.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

pub use messages::{
    // Client ↔ Coordinator
    CreateJobRequest, CreateJobResponse, JobResultsResponse, JobStatus,

    // Worker ↔ Coordinator
    RegisterWorkerRequest, RegisterWorkerResponse, SubmitResultRequest,

    // Shared responses
    CoordinatorStats, ErrorResponse, HealthResponse,
};
