//! Algorithm provider backed by the in-crate prime searches

use shared::Algorithm;

use crate::algorithms::{probable_primes_in_range, sieve_range};
use crate::error::AlgorithmError;
use crate::traits::AlgorithmProvider;

/// Dispatches on [`Algorithm`] to the sieve or Miller-Rabin
#[derive(Debug, Clone, Copy, Default)]
pub struct RealAlgorithmProvider;

impl RealAlgorithmProvider {
    pub fn new() -> Self {
        Self
    }
}

impl AlgorithmProvider for RealAlgorithmProvider {
    fn primes_in_range(
        &self,
        start: u64,
        end: u64,
        algorithm: Algorithm,
    ) -> Result<Vec<u64>, AlgorithmError> {
        match algorithm {
            Algorithm::Deterministic => sieve_range(start, end),
            Algorithm::Probabilistic { rounds } => probable_primes_in_range(start, end, rounds),
        }
    }
}
