//! Miller-Rabin probabilistic primality test

use rand::Rng;
use shared::MIN_PROBABILISTIC_ROUNDS;

use super::check_range;
use crate::error::AlgorithmError;

/// Trial divisors checked before any witness round
const SMALL_PRIMES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Ascending probable primes in `[start, end]`
///
/// `rounds == 0` falls back to [`MIN_PROBABILISTIC_ROUNDS`].
pub fn probable_primes_in_range(
    start: u64,
    end: u64,
    rounds: u32,
) -> Result<Vec<u64>, AlgorithmError> {
    check_range(start, end)?;
    let rounds = if rounds == 0 { MIN_PROBABILISTIC_ROUNDS } else { rounds };
    let mut rng = rand::thread_rng();

    Ok((start..=end)
        .filter(|&n| is_probable_prime(n, rounds, &mut rng))
        .collect())
}

/// Miller-Rabin with `rounds` bases drawn uniformly from `[2, n - 2]`
///
/// Never rejects a prime; accepts a composite with probability at most
/// `4^-rounds`.
pub fn is_probable_prime<R: Rng + ?Sized>(n: u64, rounds: u32, rng: &mut R) -> bool {
    if n < 2 {
        return false;
    }
    for p in SMALL_PRIMES {
        if n == p {
            return true;
        }
        if n % p == 0 {
            return false;
        }
    }

    // n - 1 = d * 2^s with d odd
    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;

    (0..rounds).all(|_| {
        let a = rng.gen_range(2..=n - 2);
        passes_round(n, d, s, a)
    })
}

fn passes_round(n: u64, d: u64, s: u32, a: u64) -> bool {
    let mut x = pow_mod(a, d, n);
    if x == 1 || x == n - 1 {
        return true;
    }
    for _ in 1..s {
        x = mul_mod(x, x, n);
        if x == n - 1 {
            return true;
        }
    }
    false
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut result = 1;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::sieve_range;

    #[test]
    fn test_matches_sieve_on_small_range() {
        let expected = sieve_range(2, 20_000).unwrap();
        assert_eq!(probable_primes_in_range(2, 20_000, 20).unwrap(), expected);
    }

    #[test]
    fn test_large_known_values() {
        let mut rng = rand::thread_rng();

        // 2^61 - 1 and the largest prime below 2^64
        assert!(is_probable_prime(2_305_843_009_213_693_951, 20, &mut rng));
        assert!(is_probable_prime(u64::MAX - 58, 20, &mut rng));

        let semiprime = 1_000_000_007u64 * 998_244_353;
        assert!(!is_probable_prime(semiprime, 20, &mut rng));
        assert!(!is_probable_prime(u64::MAX, 20, &mut rng));
    }

    #[test]
    fn test_carmichael_numbers_rejected() {
        let mut rng = rand::thread_rng();
        for n in [561, 1105, 1729, 2465, 2821, 6601, 8911, 41041, 825265] {
            assert!(!is_probable_prime(n, 20, &mut rng), "{n}");
        }
    }

    #[test]
    fn test_zero_rounds_uses_minimum() {
        // 41^2 survives trial division; only witness rounds can reject it
        assert!(probable_primes_in_range(1_681, 1_681, 0).unwrap().is_empty());
        assert_eq!(probable_primes_in_range(97, 101, 0).unwrap(), vec![97, 101]);
    }

    #[test]
    fn test_range_ending_at_u64_max() {
        let primes = probable_primes_in_range(u64::MAX - 60, u64::MAX, 20).unwrap();
        assert_eq!(primes, vec![u64::MAX - 58]);
    }

    #[test]
    fn test_rejects_bad_ranges() {
        assert_eq!(
            probable_primes_in_range(0, 5, 5),
            Err(AlgorithmError::InvalidRange { start: 0, end: 5 })
        );
        assert_eq!(
            probable_primes_in_range(9, 3, 5),
            Err(AlgorithmError::InvalidRange { start: 9, end: 3 })
        );
    }

    #[test]
    fn test_pow_mod() {
        assert_eq!(pow_mod(2, 10, 1_000), 24);
        assert_eq!(pow_mod(u64::MAX - 1, 2, u64::MAX), 1);
    }
}
