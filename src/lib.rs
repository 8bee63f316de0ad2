//! Per-pixel RSA image encryption on top of hand-rolled number theory.
//!
//! Keys come from Miller-Rabin probable primes and an extended-Euclid
//! inverse. Every channel of every pixel is encrypted as `c = s^e mod n`.
//! Because `c` rarely fits in a byte, encryption produces two artifacts: a
//! display image holding `c mod 256` and a [`CiphertextCache`] holding the
//! real values. Decryption only ever reads the cache.
//!
//! ```rust,no_run
//! use pixel_rsa::{RgbImage, Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::default().with_prime_bits(16))?;
//! session.generate_keys()?;
//!
//! let image = RgbImage::filled(2, 2, [255, 255, 255]);
//! let _display = session.encrypt(&image)?;
//! let plain = session.decrypt(image.height(), image.width())?;
//! assert_eq!(plain, image);
//! # Ok::<(), pixel_rsa::Error>(())
//! ```

pub mod config;
pub mod ctr;
pub mod error;
pub mod image;
pub mod rsa;
pub mod session;
pub mod util;

pub use config::SessionConfig;
pub use ctr::{frame_ciphertext, CtrCipher, CtrSession};
pub use error::{Error, Result};
pub use image::{decrypt_image, encrypt_image, CiphertextCache, EncryptedImage, RgbImage};
pub use rsa::{generate_keypair, KeyPair};
pub use session::Session;
pub use util::CancelToken;
