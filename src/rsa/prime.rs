// Primality testing and prime generation
// Miller-Rabin with a bit-length dependent round count, plus a cancellable search loop

use log::{debug, warn};
use num_integer::Integer;
use num_traits::One;
use rand::Rng;

use super::bigint::{mod_pow, random_in_range, random_odd, RsaBigInt};
use crate::error::{Error, Result};
use crate::util::CancelToken;

/// Smallest prime bit length the search accepts. Below this the loop may never
/// find an odd candidate of the exact length that is also prime.
pub const MIN_PRIME_BITS: u64 = 4;

/// Minimum number of Miller-Rabin rounds for a number of `bit_length` bits.
///
/// Follows NIST FIPS 186-4, Appendix C, Table C.3 (error probability 2^-100)
/// for 512/1024/1536-bit factors; smaller sizes get a fixed 10 rounds.
pub fn rounds_for(bit_length: u64) -> usize {
    if bit_length >= 1536 {
        return 3;
    }
    if bit_length >= 1024 {
        return 4;
    }
    if bit_length >= 512 {
        return 7;
    }
    10
}

/// Returns true if `n` is probably prime.
///
/// Numbers below 10 are checked against {2, 3, 5, 7}, even numbers are
/// rejected, and everything else goes through Miller-Rabin with one round
/// more than [`rounds_for`] demands.
pub fn is_probable_prime<R: Rng + ?Sized>(n: &RsaBigInt, rng: &mut R) -> bool {
    if n < &RsaBigInt::from(10u8) {
        return [2u8, 3, 5, 7].iter().any(|&p| n == &RsaBigInt::from(p));
    }
    if n.is_even() {
        return false;
    }

    let rounds = rounds_for(n.bits());
    miller_rabin(n, rounds + 1, rng)
}

/// Miller-Rabin test with `k` random witnesses.
///
/// A `false` result is always correct; `true` is wrong with probability at
/// most 4^-k.
pub fn miller_rabin<R: Rng + ?Sized>(n: &RsaBigInt, k: usize, rng: &mut R) -> bool {
    let two = RsaBigInt::from(2u8);
    if n < &two {
        return false;
    }
    if n == &two || n == &RsaBigInt::from(3u8) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n-1 as 2^r * d with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    let n_minus_two = n - 2u8;

    for _ in 0..k {
        // Witness a in [2, n-2]
        let a = random_in_range(&two, &n_minus_two, rng);

        // n > 3 here, so the modulus is never zero
        let mut x = match mod_pow(&a, &d, n) {
            Ok(x) => x,
            Err(_) => return false,
        };

        if x.is_one() || x == n_minus_one {
            continue;
        }

        let mut passed = false;
        for _ in 1..r {
            x = (&x * &x) % n;
            if x.is_one() {
                // Non-trivial square root of 1
                return false;
            }
            if x == n_minus_one {
                passed = true;
                break;
            }
        }

        if !passed {
            return false;
        }
    }

    true
}

/// Generate a probable prime of exactly `bit_length` bits.
///
/// Keeps drawing random odd candidates until one passes
/// [`is_probable_prime`]. The search has no retry cap; it stops early only
/// when `cancel` is triggered.
pub fn generate_prime<R: Rng + ?Sized>(
    bit_length: u64,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<RsaBigInt> {
    if bit_length < MIN_PRIME_BITS {
        return Err(Error::InvalidBitLength {
            min: MIN_PRIME_BITS,
            actual: bit_length,
        });
    }

    let mut attempts = 0u64;
    loop {
        if cancel.is_cancelled() {
            warn!("prime search cancelled after {} candidates", attempts);
            return Err(Error::Cancelled);
        }

        let candidate = random_odd(bit_length, rng)?;
        attempts += 1;

        if is_probable_prime(&candidate, rng) {
            debug!("found {}-bit prime after {} candidates", bit_length, attempts);
            return Ok(candidate);
        }
    }
}
