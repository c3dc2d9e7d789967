//! Prime search algorithms
//!
//! The sieve is exact and bounded; Miller-Rabin covers the whole `u64` domain
//! with a per-candidate false-positive bound of `4^-rounds`.

pub mod miller_rabin;
pub mod sieve;

pub use miller_rabin::{is_probable_prime, probable_primes_in_range};
pub use sieve::sieve_range;

use shared::MIN_PRIME;

use crate::error::AlgorithmError;

fn check_range(start: u64, end: u64) -> Result<(), AlgorithmError> {
    if start < MIN_PRIME || start > end {
        return Err(AlgorithmError::InvalidRange { start, end });
    }
    Ok(())
}
