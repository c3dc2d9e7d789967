//! Worker services implementations

pub mod http_client;
pub mod provider;

#[cfg(test)]
pub mod tests;

pub use http_client::*;
pub use provider::*;
