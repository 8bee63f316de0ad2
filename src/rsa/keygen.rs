// RSA Key Generation
// Composes two generated primes into an (n, e, d) key pair

use log::debug;
use rand::Rng;

use super::bigint::{from_u64, mod_inverse, RsaBigInt};
use super::prime::generate_prime;
use crate::error::{Error, Result};
use crate::util::CancelToken;

/// Fixed public exponent
pub const PUBLIC_EXPONENT: u64 = 65537;

/// Largest channel sample value. The modulus must exceed it.
pub const MAX_CHANNEL_VALUE: u64 = 255;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub n: RsaBigInt, // Modulus
    pub e: RsaBigInt, // Public exponent
}

/// RSA Private Key
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub n: RsaBigInt, // Modulus (same as public)
    pub d: RsaBigInt, // Private exponent
    pub p: RsaBigInt, // First prime factor
    pub q: RsaBigInt, // Second prime factor
}

// Keeps d, p and q out of log output
impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey").field("n", &self.n).finish_non_exhaustive()
    }
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
    pub prime_bits: u64,
}

impl PublicKey {
    /// Bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Modulus as big-endian hex, for display
    pub fn modulus_hex(&self) -> String {
        hex::encode(self.n.to_bytes_be())
    }
}

impl PrivateKey {
    /// Euler's totient (p-1)(q-1)
    pub fn totient(&self) -> RsaBigInt {
        (&self.p - 1u8) * (&self.q - 1u8)
    }
}

impl KeyPair {
    pub fn p(&self) -> &RsaBigInt {
        &self.private_key.p
    }

    pub fn q(&self) -> &RsaBigInt {
        &self.private_key.q
    }

    pub fn e(&self) -> &RsaBigInt {
        &self.public_key.e
    }

    pub fn n(&self) -> &RsaBigInt {
        &self.public_key.n
    }

    pub fn d(&self) -> &RsaBigInt {
        &self.private_key.d
    }
}

/// Generate an RSA key pair from two primes of `prime_bits` bits each.
///
/// `e` is fixed at 65537 and `d = e^(-1) mod (p-1)(q-1)`. If the second prime
/// equals the first it is redrawn.
///
/// # Errors
///
/// - [`Error::InvalidBitLength`] if `prime_bits` is below the prime search minimum.
/// - [`Error::NoModularInverse`] if `e` shares a factor with the totient; the
///   caller should retry with fresh primes.
/// - [`Error::ModulusTooSmall`] if `n <= 255`.
/// - [`Error::Cancelled`] if `cancel` fires during the prime search.
pub fn generate_keypair<R: Rng + ?Sized>(
    prime_bits: u64,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<KeyPair> {
    let p = generate_prime(prime_bits, rng, cancel)?;
    let mut q = generate_prime(prime_bits, rng, cancel)?;
    while q == p {
        debug!("drew the same prime twice, redrawing q");
        q = generate_prime(prime_bits, rng, cancel)?;
    }

    let e = from_u64(PUBLIC_EXPONENT);
    let n = &p * &q;
    if n <= from_u64(MAX_CHANNEL_VALUE) {
        return Err(Error::ModulusTooSmall);
    }

    let totient = (&p - 1u8) * (&q - 1u8);
    let d = mod_inverse(&e, &totient)?;

    Ok(KeyPair {
        public_key: PublicKey { n: n.clone(), e },
        private_key: PrivateKey { n, d, p, q },
        prime_bits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::mod_pow;
    use num_traits::One;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_key_properties() {
        let mut rng = StdRng::seed_from_u64(21);
        let keypair = generate_keypair(16, &mut rng, &CancelToken::new()).unwrap();

        // Verify n = p * q
        assert_eq!(keypair.n(), &(keypair.p() * keypair.q()));
        assert_ne!(keypair.p(), keypair.q());
        assert_eq!(keypair.e(), &from_u64(65537));
        assert_eq!(keypair.prime_bits, 16);

        // Verify e * d ≡ 1 (mod φ(n))
        let phi_n = keypair.private_key.totient();
        assert!(keypair.d() < &phi_n);
        assert_eq!((keypair.e() * keypair.d()) % &phi_n, RsaBigInt::one());
    }

    #[test]
    fn test_channel_round_trip() {
        let mut rng = StdRng::seed_from_u64(22);
        let cancel = CancelToken::new();

        // A handful of seeds may land on a totient sharing a factor with e
        let keypair = loop {
            match generate_keypair(12, &mut rng, &cancel) {
                Ok(keypair) => break keypair,
                Err(Error::NoModularInverse) => continue,
                Err(e) => panic!("unexpected error: {e}"),
            }
        };

        for s in 0..=255u64 {
            let m = from_u64(s);
            let c = mod_pow(&m, keypair.e(), keypair.n()).unwrap();
            let back = mod_pow(&c, keypair.d(), keypair.n()).unwrap();
            assert_eq!(back, m, "sample {s} did not survive the round trip");
        }
    }

    #[test]
    fn test_modulus_too_small() {
        // 4-bit primes are 11 or 13, so n is at most 169
        let mut rng = StdRng::seed_from_u64(23);
        let result = generate_keypair(4, &mut rng, &CancelToken::new());
        assert_eq!(result, Err(Error::ModulusTooSmall));
    }

    #[test]
    fn test_invalid_bit_length() {
        let mut rng = StdRng::seed_from_u64(24);
        let result = generate_keypair(2, &mut rng, &CancelToken::new());
        assert!(matches!(result, Err(Error::InvalidBitLength { .. })));
    }

    #[test]
    fn test_cancelled() {
        let mut rng = StdRng::seed_from_u64(25);
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(generate_keypair(16, &mut rng, &cancel), Err(Error::Cancelled));
    }

    #[test]
    fn test_private_key_debug_hides_exponent() {
        let mut rng = StdRng::seed_from_u64(26);
        let keypair = generate_keypair(16, &mut rng, &CancelToken::new()).unwrap();
        let rendered = format!("{:?}", keypair.private_key);
        assert!(rendered.starts_with("PrivateKey { n: "));
        assert!(!rendered.contains("d:"));
        assert!(!rendered.contains("p:"));
    }
}
