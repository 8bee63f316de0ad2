// Image Module
// Applies the RSA primitives channel by channel across an RGB buffer

pub mod buffer;
pub mod cache;
pub mod decrypt;
pub mod encrypt;

pub use buffer::{Rgb, RgbImage};
pub use cache::{CipherTriple, CiphertextCache};
pub use decrypt::{decrypt_image, decrypt_image_with, decrypt_with_key};
pub use encrypt::{encrypt_image, encrypt_image_with, encrypt_with_key, EncryptedImage};

use crate::error::{Error, Result};
use crate::rsa::keygen::MAX_CHANNEL_VALUE;
use crate::rsa::RsaBigInt;

/// How the per-pixel loop is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sweep {
    /// Pixels spread across the rayon thread pool
    #[default]
    Parallel,
    Sequential,
}

impl Sweep {
    pub fn from_parallel(parallel: bool) -> Self {
        if parallel {
            Sweep::Parallel
        } else {
            Sweep::Sequential
        }
    }
}

/// Channel encryption is only injective when n > 255
pub(crate) fn check_modulus(n: &RsaBigInt) -> Result<()> {
    if n <= &RsaBigInt::from(MAX_CHANNEL_VALUE) {
        return Err(Error::ModulusTooSmall);
    }
    Ok(())
}
