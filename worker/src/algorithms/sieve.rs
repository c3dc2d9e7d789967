//! Segmented sieve of Eratosthenes

use shared::DETERMINISTIC_LIMIT;

use super::check_range;
use crate::error::AlgorithmError;

/// Numbers covered by one segment of the sieve
const SEGMENT_SIZE: u64 = 1 << 16;

/// Exact ascending primes in `[start, end]`
///
/// Memory stays at one segment plus the base primes up to `sqrt(end)`, so
/// narrow ranges far from zero cost little.
pub fn sieve_range(start: u64, end: u64) -> Result<Vec<u64>, AlgorithmError> {
    check_range(start, end)?;
    if end > DETERMINISTIC_LIMIT {
        return Err(AlgorithmError::RangeTooLarge {
            end,
            limit: DETERMINISTIC_LIMIT,
        });
    }

    let base = base_primes(isqrt(end));
    let mut primes = Vec::new();
    let mut composite = vec![false; SEGMENT_SIZE as usize];

    let mut low = start;
    while low <= end {
        let high = (low + SEGMENT_SIZE - 1).min(end);
        let width = (high - low + 1) as usize;
        composite[..width].fill(false);

        for &p in &base {
            let square = p * p;
            if square > high {
                break;
            }
            let first = square.max(low.div_ceil(p) * p);
            let mut multiple = first;
            while multiple <= high {
                composite[(multiple - low) as usize] = true;
                multiple += p;
            }
        }

        primes.extend(
            composite[..width]
                .iter()
                .enumerate()
                .filter(|(_, &is_composite)| !is_composite)
                .map(|(offset, _)| low + offset as u64),
        );
        low = high + 1;
    }

    Ok(primes)
}

/// Plain sieve up to and including `limit`
fn base_primes(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }
    let limit = limit as usize;
    let mut is_prime = vec![true; limit + 1];
    is_prime[0] = false;
    is_prime[1] = false;

    let mut i = 2;
    while i * i <= limit {
        if is_prime[i] {
            for multiple in (i * i..=limit).step_by(i) {
                is_prime[multiple] = false;
            }
        }
        i += 1;
    }

    is_prime
        .iter()
        .enumerate()
        .filter(|(_, &prime)| prime)
        .map(|(n, _)| n as u64)
        .collect()
}

/// Floor square root, exact for the sieve's domain
fn isqrt(n: u64) -> u64 {
    let mut root = (n as f64).sqrt() as u64;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial_division(start: u64, end: u64) -> Vec<u64> {
        (start..=end)
            .filter(|n| *n >= 2 && (2u64..).take_while(|d| d * d <= *n).all(|d| n % d != 0))
            .collect()
    }

    #[test]
    fn test_small_range() {
        assert_eq!(sieve_range(2, 30).unwrap(), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_single_values() {
        assert_eq!(sieve_range(2, 2).unwrap(), vec![2]);
        assert_eq!(sieve_range(97, 97).unwrap(), vec![97]);
        assert!(sieve_range(100, 100).unwrap().is_empty());
    }

    #[test]
    fn test_matches_trial_division_across_segments() {
        let start = 190_000;
        let end = start + 3 * SEGMENT_SIZE + 17;
        assert_eq!(sieve_range(start, end).unwrap(), trial_division(start, end));
    }

    #[test]
    fn test_prime_count_below_one_million() {
        assert_eq!(sieve_range(2, 1_000_000).unwrap().len(), 78_498);
    }

    #[test]
    fn test_range_at_limit() {
        let primes = sieve_range(DETERMINISTIC_LIMIT - 100, DETERMINISTIC_LIMIT).unwrap();
        assert_eq!(primes, trial_division(DETERMINISTIC_LIMIT - 100, DETERMINISTIC_LIMIT));
    }

    #[test]
    fn test_rejects_bad_ranges() {
        assert_eq!(sieve_range(1, 10), Err(AlgorithmError::InvalidRange { start: 1, end: 10 }));
        assert_eq!(sieve_range(20, 10), Err(AlgorithmError::InvalidRange { start: 20, end: 10 }));
        assert_eq!(
            sieve_range(2, DETERMINISTIC_LIMIT + 1),
            Err(AlgorithmError::RangeTooLarge {
                end: DETERMINISTIC_LIMIT + 1,
                limit: DETERMINISTIC_LIMIT
            })
        );
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(99), 9);
        assert_eq!(isqrt(100), 10);
        assert_eq!(isqrt(DETERMINISTIC_LIMIT), 10_000);
    }
}
