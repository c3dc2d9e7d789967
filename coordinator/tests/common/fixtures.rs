//! Test fixtures and data for coordinator tests

use std::time::Duration;

use coordinator::CoordinatorConfig;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const GHOST_WORKER: &'static str = "ghost-worker";

    /// Primes in [2, 30], the canonical small scenario
    pub const PRIMES_TO_30: [u64; 10] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29];

    /// Default config with a short sweep so tests never wait long
    pub fn config() -> CoordinatorConfig {
        CoordinatorConfig {
            sweep_interval: Duration::from_millis(25),
            ..Default::default()
        }
    }

    /// Config whose workers go stale almost immediately
    pub fn fast_timeout_config() -> CoordinatorConfig {
        CoordinatorConfig {
            worker_timeout: Duration::from_millis(30),
            sweep_interval: Duration::from_millis(10),
            ..Default::default()
        }
    }

    pub fn create_job_body(
        start: u64,
        end: u64,
        rounds: i64,
        chunk_size: i64,
    ) -> serde_json::Value {
        serde_json::json!({
            "start": start,
            "end": end,
            "rounds": rounds,
            "chunkSize": chunk_size,
        })
    }

    /// Trial division reference for expected results
    pub fn primes_between(start: u64, end: u64) -> Vec<u64> {
        (start.max(2)..=end)
            .filter(|n| (2u64..).take_while(|d| d * d <= *n).all(|d| n % d != 0))
            .collect()
    }
}
