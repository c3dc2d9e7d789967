//! Core worker logic

pub mod agent;

pub use agent::{RunSummary, WorkerAgent};
