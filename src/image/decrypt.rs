// Per-pixel RSA decryption
// Reads ciphertext from the cache, never from the lossy display image

use num_traits::ToPrimitive;
use rayon::prelude::*;

use super::buffer::{Rgb, RgbImage};
use super::cache::CiphertextCache;
use super::{check_modulus, Sweep};
use crate::error::{Error, Result};
use crate::rsa::bigint::{mod_pow, RsaBigInt};
use crate::rsa::PrivateKey;

/// Recover the `rows x cols` plaintext image from `cache`, sweeping pixels in parallel.
pub fn decrypt_image(
    cache: &CiphertextCache,
    d: &RsaBigInt,
    n: &RsaBigInt,
    rows: usize,
    cols: usize,
) -> Result<RgbImage> {
    decrypt_image_with(cache, d, n, rows, cols, Sweep::Parallel)
}

/// Decrypt with an explicit sweep strategy.
///
/// Fails with [`Error::CoordinateOutOfCache`] if any requested pixel was
/// never encrypted into `cache`, and with [`Error::ChannelOverflow`] if a
/// recovered value exceeds 255 (the key does not match the cache).
pub fn decrypt_image_with(
    cache: &CiphertextCache,
    d: &RsaBigInt,
    n: &RsaBigInt,
    rows: usize,
    cols: usize,
    sweep: Sweep,
) -> Result<RgbImage> {
    check_modulus(n)?;
    cache.covers(rows, cols)?;

    let decrypt_pixel = |index: usize| -> Result<Rgb> {
        let (row, col) = (index / cols, index % cols);
        let triple = cache.get(row, col)?;

        let mut px = [0u8; 3];
        for (out, c) in px.iter_mut().zip(triple.iter()) {
            *out = mod_pow(c, d, n)?
                .to_u8()
                .ok_or(Error::ChannelOverflow { row, col })?;
        }
        Ok(px)
    };

    let total = rows * cols;
    let pixels: Vec<Rgb> = match sweep {
        Sweep::Parallel => (0..total).into_par_iter().map(decrypt_pixel).collect::<Result<_>>()?,
        Sweep::Sequential => (0..total).map(decrypt_pixel).collect::<Result<_>>()?,
    };

    RgbImage::from_pixels(cols, rows, pixels)
}

/// Decrypt the whole cache using a private key
pub fn decrypt_with_key(cache: &CiphertextCache, key: &PrivateKey, sweep: Sweep) -> Result<RgbImage> {
    decrypt_image_with(cache, &key.d, &key.n, cache.rows(), cache.cols(), sweep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::encrypt::encrypt_image;
    use crate::rsa::bigint::from_u64;

    // p = 61, q = 53, e = 65537, d = e^-1 mod 3120
    fn toy_key() -> (RsaBigInt, RsaBigInt, RsaBigInt) {
        let e = from_u64(65537);
        let n = from_u64(3233);
        let d = crate::rsa::mod_inverse(&e, &from_u64(3120)).unwrap();
        (e, d, n)
    }

    #[test]
    fn test_round_trip_every_sample() {
        let bytes: Vec<u8> = (0..=255u8).flat_map(|s| [s, 255 - s, s / 2]).collect();
        let image = RgbImage::from_raw(16, 16, &bytes).unwrap();
        let (e, d, n) = toy_key();

        let encrypted = encrypt_image(&image, &e, &n).unwrap();
        let decrypted = decrypt_image(&encrypted.cache, &d, &n, 16, 16).unwrap();

        assert_eq!(decrypted, image);
    }

    #[test]
    fn test_partial_extent() {
        let image = RgbImage::from_raw(2, 2, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]).unwrap();
        let (e, d, n) = toy_key();

        let encrypted = encrypt_image(&image, &e, &n).unwrap();
        let top_left = decrypt_image(&encrypted.cache, &d, &n, 1, 1).unwrap();

        assert_eq!(top_left.width(), 1);
        assert_eq!(top_left.pixels(), &[[1, 2, 3]]);
    }

    #[test]
    fn test_extent_beyond_cache() {
        let image = RgbImage::filled(2, 2, [9, 9, 9]);
        let (e, d, n) = toy_key();

        let encrypted = encrypt_image(&image, &e, &n).unwrap();
        let result = decrypt_image_with(&encrypted.cache, &d, &n, 3, 2, Sweep::Sequential);
        assert_eq!(result, Err(Error::CoordinateOutOfCache { row: 2, col: 0 }));
    }

    #[test]
    fn test_cleared_cache() {
        let image = RgbImage::filled(2, 2, [255, 255, 255]);
        let (e, d, n) = toy_key();

        let mut encrypted = encrypt_image(&image, &e, &n).unwrap();
        encrypted.cache.clear();

        let result = decrypt_image_with(&encrypted.cache, &d, &n, 2, 2, Sweep::Sequential);
        assert_eq!(result, Err(Error::CoordinateOutOfCache { row: 0, col: 0 }));
    }

    #[test]
    fn test_wrong_key_overflows() {
        let n = from_u64(3233);
        let cache = CiphertextCache::new(1, 2, vec![
            [from_u64(10), from_u64(20), from_u64(30)],
            [from_u64(40), from_u64(3000), from_u64(50)],
        ]);

        // With d = 1 the "plaintext" is the ciphertext itself
        let result = decrypt_image_with(&cache, &from_u64(1), &n, 1, 2, Sweep::Sequential);
        assert_eq!(result, Err(Error::ChannelOverflow { row: 0, col: 1 }));
    }
}
