// Session configuration

use crate::error::{Error, Result};

/// Smallest prime size a session accepts. 5-bit primes are at least 17, so
/// n = p*q is at least 17*19 = 323 and every channel value stays below it.
pub const MIN_SESSION_PRIME_BITS: u64 = 5;

/// Configuration for an encryption session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Bit length of each RSA prime
    pub prime_bits: u64,
    /// Spread the per-pixel loop across the rayon pool
    pub parallel: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prime_bits: 7,
            parallel: true,
        }
    }
}

impl SessionConfig {
    pub fn with_prime_bits(mut self, bits: u64) -> Self {
        self.prime_bits = bits;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.prime_bits < MIN_SESSION_PRIME_BITS {
            return Err(Error::InvalidBitLength {
                min: MIN_SESSION_PRIME_BITS,
                actual: self.prime_bits,
            });
        }
        Ok(())
    }
}
