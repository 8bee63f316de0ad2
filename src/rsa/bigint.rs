// RSA Big Integer Operations
// Square-and-multiply exponentiation and extended-Euclid inverse over num-bigint

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use rand::Rng;

use crate::error::{Error, Result};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply algorithm
///
/// `exp == 0` yields 1 (0 when `modulus == 1`). A zero modulus is rejected.
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> Result<RsaBigInt> {
    if modulus.is_zero() {
        return Err(Error::InvalidModulus);
    }
    if modulus.is_one() {
        return Ok(RsaBigInt::zero());
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    Ok(result)
}

/// Compute modular inverse: a^(-1) mod m
///
/// Iterative extended Euclidean algorithm tracking the Bézout coefficient of
/// `a`. The result is normalized into `[0, m)`.
///
/// Returns [`Error::NoModularInverse`] when `gcd(a, m) != 1` and
/// [`Error::InvalidModulus`] when `m <= 1`.
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Result<RsaBigInt> {
    if m <= &RsaBigInt::one() {
        return Err(Error::InvalidModulus);
    }

    let modulus = BigInt::from(m.clone());

    // Invariant: old_r ≡ old_s * a (mod m) and r ≡ s * a (mod m)
    let mut old_r = BigInt::from(a % m);
    let mut r = modulus.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return Err(Error::NoModularInverse);
    }

    if old_s.is_negative() {
        old_s += &modulus;
    }
    if old_s >= modulus {
        old_s %= &modulus;
    }

    let (_, inverse) = old_s.into_parts();
    Ok(inverse)
}

/// Draw a uniformly random odd integer of exactly `bits` bits.
///
/// The top bit is forced so the value has the requested length and the low
/// bit so it is odd. Zero bits is rejected with [`Error::InvalidBitLength`].
pub fn random_odd<R: Rng + ?Sized>(bits: u64, rng: &mut R) -> Result<RsaBigInt> {
    if bits == 0 {
        return Err(Error::InvalidBitLength { min: 1, actual: 0 });
    }

    let mut candidate = rng.gen_biguint(bits);
    candidate |= RsaBigInt::one() << (bits - 1);
    candidate |= RsaBigInt::one();
    Ok(candidate)
}

/// Uniform random integer in `[low, high]`, both ends inclusive. Requires `low <= high`.
pub(crate) fn random_in_range<R: Rng + ?Sized>(low: &RsaBigInt, high: &RsaBigInt, rng: &mut R) -> RsaBigInt {
    rng.gen_biguint_range(low, &(high + 1u8))
}
