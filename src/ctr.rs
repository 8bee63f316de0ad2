// Counter-mode block cipher path
// The cipher itself is external; this module holds the IV, the true
// ciphertext, and the square-image framing used to display it.

use log::info;
use num_integer::Roots;
use rand::Rng;

use crate::error::{Error, Result};
use crate::image::RgbImage;

/// Length of a counter-mode IV in bytes
pub const IV_LEN: usize = 16;

pub type Iv = [u8; IV_LEN];

/// A block cipher in counter mode, keyed by the implementor.
pub trait CtrCipher {
    fn encrypt_ctr(&self, plaintext: &[u8], iv: &Iv) -> Vec<u8>;
    fn decrypt_ctr(&self, ciphertext: &[u8], iv: &Iv) -> Vec<u8>;
}

/// Pack ciphertext bytes into the smallest square RGB image that holds them.
///
/// Three bytes per pixel, zero-filled after the last byte. An empty input
/// gives a 0x0 image.
pub fn frame_ciphertext(ciphertext: &[u8]) -> RgbImage {
    let num_pixels = (ciphertext.len() + 2) / 3;
    let mut side = num_pixels.sqrt();
    if side * side < num_pixels {
        side += 1;
    }

    let mut framed = RgbImage::filled(side, side, [0; 3]);
    for (i, chunk) in ciphertext.chunks(3).enumerate() {
        let mut px = [0u8; 3];
        px[..chunk.len()].copy_from_slice(chunk);
        framed.set(i / side, i % side, px);
    }
    framed
}

struct Sealed {
    iv: Iv,
    ciphertext: Vec<u8>,
}

/// Holds the IV and the real ciphertext between an encrypt and its decrypt.
pub struct CtrSession<C> {
    cipher: C,
    iv: Option<Iv>,
    sealed: Option<Sealed>,
}

impl<C: CtrCipher> CtrSession<C> {
    pub fn new(cipher: C) -> Self {
        Self {
            cipher,
            iv: None,
            sealed: None,
        }
    }

    /// Use a fixed IV instead of a random one
    pub fn with_iv(mut self, iv: Iv) -> Self {
        self.iv = Some(iv);
        self
    }

    pub fn iv(&self) -> Option<&Iv> {
        self.iv.as_ref()
    }

    /// Draw a fresh random IV, replacing any previous one.
    pub fn generate_iv<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Iv {
        let iv: Iv = rng.gen();
        self.iv = Some(iv);
        iv
    }

    pub fn has_ciphertext(&self) -> bool {
        self.sealed.is_some()
    }

    /// Encrypt `plaintext` and return its framed image for display.
    ///
    /// A random IV is drawn first if none is set. The ciphertext is kept for
    /// [`CtrSession::decrypt`].
    pub fn encrypt<R: Rng + ?Sized>(&mut self, plaintext: &[u8], rng: &mut R) -> RgbImage {
        let iv = match self.iv {
            Some(iv) => iv,
            None => self.generate_iv(rng),
        };

        let ciphertext = self.cipher.encrypt_ctr(plaintext, &iv);
        let framed = frame_ciphertext(&ciphertext);
        info!(
            "Encrypted CTR: {} bytes into {}x{} frame, iv {}",
            ciphertext.len(),
            framed.width(),
            framed.height(),
            hex::encode(iv)
        );

        self.sealed = Some(Sealed { iv, ciphertext });
        framed
    }

    /// Decrypt the ciphertext kept by the last [`CtrSession::encrypt`].
    ///
    /// The ciphertext is consumed; a second call fails with
    /// [`Error::MissingCiphertext`].
    pub fn decrypt(&mut self) -> Result<Vec<u8>> {
        let sealed = self.sealed.take().ok_or(Error::MissingCiphertext)?;
        let plaintext = self.cipher.decrypt_ctr(&sealed.ciphertext, &sealed.iv);
        info!("Decrypted CTR: {} bytes", plaintext.len());
        Ok(plaintext)
    }

    /// Forget the IV and any pending ciphertext
    pub fn reset(&mut self) {
        self.iv = None;
        self.sealed = None;
    }
}
