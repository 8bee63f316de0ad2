// Per-pixel RSA encryption
// Encrypts every channel sample and keeps the full-precision result in a cache

use rayon::prelude::*;

use super::buffer::{Rgb, RgbImage};
use super::cache::{CipherTriple, CiphertextCache};
use super::{check_modulus, Sweep};
use crate::error::Result;
use crate::rsa::bigint::{mod_pow, RsaBigInt};
use crate::rsa::PublicKey;

/// Output of [`encrypt_image`].
///
/// `display` holds `c mod 256` per channel and is only fit for viewing or
/// export. `cache` holds the real ciphertext and is what decryption needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedImage {
    pub display: RgbImage,
    pub cache: CiphertextCache,
}

/// Encrypt every channel of `image` with `c = s^e mod n`, sweeping pixels in parallel.
pub fn encrypt_image(image: &RgbImage, e: &RsaBigInt, n: &RsaBigInt) -> Result<EncryptedImage> {
    encrypt_image_with(image, e, n, Sweep::Parallel)
}

/// Encrypt with an explicit sweep strategy. Both strategies give identical output.
pub fn encrypt_image_with(
    image: &RgbImage,
    e: &RsaBigInt,
    n: &RsaBigInt,
    sweep: Sweep,
) -> Result<EncryptedImage> {
    check_modulus(n)?;

    let encrypt_pixel = |px: &Rgb| -> Result<CipherTriple> {
        Ok([
            encrypt_sample(px[0], e, n)?,
            encrypt_sample(px[1], e, n)?,
            encrypt_sample(px[2], e, n)?,
        ])
    };

    let entries: Vec<CipherTriple> = match sweep {
        Sweep::Parallel => image.pixels().par_iter().map(encrypt_pixel).collect::<Result<_>>()?,
        Sweep::Sequential => image.pixels().iter().map(encrypt_pixel).collect::<Result<_>>()?,
    };

    let display_pixels = entries
        .iter()
        .map(|c| [low_byte(&c[0]), low_byte(&c[1]), low_byte(&c[2])])
        .collect();

    let display = RgbImage::from_pixels(image.width(), image.height(), display_pixels)?;
    let cache = CiphertextCache::new(image.height(), image.width(), entries);

    Ok(EncryptedImage { display, cache })
}

/// Encrypt using the modulus and exponent of a public key
pub fn encrypt_with_key(image: &RgbImage, key: &PublicKey, sweep: Sweep) -> Result<EncryptedImage> {
    encrypt_image_with(image, &key.e, &key.n, sweep)
}

fn encrypt_sample(sample: u8, e: &RsaBigInt, n: &RsaBigInt) -> Result<RsaBigInt> {
    mod_pow(&RsaBigInt::from(sample), e, n)
}

/// c mod 256
fn low_byte(c: &RsaBigInt) -> u8 {
    c.to_bytes_le().first().copied().unwrap_or(0)
}
