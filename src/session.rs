// Encryption session
// Owns the key pair and ciphertext cache between an encrypt and its decrypt

use log::{debug, info, warn};
use rand::{thread_rng, Rng};

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::image::{decrypt_image_with, encrypt_with_key, CiphertextCache, RgbImage, Sweep};
use crate::rsa::{generate_keypair, KeyPair};
use crate::util::CancelToken;

/// One RSA image encryption session.
///
/// Key generation, encryption and decryption are expected in that order. The
/// cache written by [`Session::encrypt`] is consumed by the next successful
/// [`Session::decrypt`], and [`Session::reset`] discards keys and cache alike.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    cancel: CancelToken,
    keypair: Option<KeyPair>,
    cache: Option<CiphertextCache>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancelToken::new(),
            keypair: None,
            cache: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Token that interrupts key generation from another thread
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn keypair(&self) -> Option<&KeyPair> {
        self.keypair.as_ref()
    }

    pub fn cache(&self) -> Option<&CiphertextCache> {
        self.cache.as_ref()
    }

    /// Generate a fresh key pair using the thread-local RNG.
    pub fn generate_keys(&mut self) -> Result<&KeyPair> {
        self.generate_keys_with_rng(&mut thread_rng())
    }

    /// Generate a fresh key pair, resampling primes until `e` is invertible.
    ///
    /// Any cache from a previous key is dropped. On cancellation no key is
    /// stored.
    pub fn generate_keys_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&KeyPair> {
        self.keypair = None;
        self.cache = None;

        let mut attempt = 0u32;
        let keypair = loop {
            attempt += 1;
            match generate_keypair(self.config.prime_bits, rng, &self.cancel) {
                Ok(keypair) => break keypair,
                Err(Error::NoModularInverse) => {
                    debug!("attempt {}: e not invertible mod totient, resampling primes", attempt);
                }
                Err(Error::Cancelled) => {
                    warn!("key generation cancelled after {} attempts", attempt);
                    return Err(Error::Cancelled);
                }
                Err(e) => return Err(e),
            }
        };

        info!(
            "Generated keys: {}-bit primes, modulus {}",
            keypair.prime_bits,
            keypair.public_key.modulus_hex()
        );
        let stored: &KeyPair = self.keypair.insert(keypair);
        Ok(stored)
    }

    /// RSA-encrypt `image`, keeping the full-precision cache for decryption.
    ///
    /// Returns the display rendering (`c mod 256` per channel). Replaces any
    /// cache left by an earlier encryption.
    pub fn encrypt(&mut self, image: &RgbImage) -> Result<RgbImage> {
        let keypair = self.keypair.as_ref().ok_or(Error::MissingKeyPair)?;
        let encrypted = encrypt_with_key(image, &keypair.public_key, self.sweep())?;

        info!("Encrypted RSA: {}x{} image", image.width(), image.height());
        self.cache = Some(encrypted.cache);
        Ok(encrypted.display)
    }

    /// Decrypt the `rows x cols` extent of the last encryption.
    ///
    /// The cache is consumed only when decryption succeeds; a rejected
    /// request leaves it in place for a corrected retry. Decrypting without
    /// a matching cache, including after [`Session::reset`], fails with
    /// [`Error::CoordinateOutOfCache`].
    pub fn decrypt(&mut self, rows: usize, cols: usize) -> Result<RgbImage> {
        let empty = CiphertextCache::default();
        let cache = self.cache.as_ref().unwrap_or(&empty);
        cache.covers(rows, cols)?;

        let keypair = self.keypair.as_ref().ok_or(Error::MissingKeyPair)?;
        let key = &keypair.private_key;
        let plain = decrypt_image_with(cache, &key.d, &key.n, rows, cols, self.sweep())?;

        self.cache = None;
        info!("Decrypted RSA: {}x{} image", cols, rows);
        Ok(plain)
    }

    /// Interrupt any key generation holding this session's token.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Discard keys and cache and re-arm the cancellation token.
    pub fn reset(&mut self) {
        self.keypair = None;
        self.cache = None;
        self.cancel.reset();
        info!("Session reset");
    }

    fn sweep(&self) -> Sweep {
        Sweep::from_parallel(self.config.parallel)
    }
}
