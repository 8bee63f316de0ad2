// RSA Module - Main module file
// Exports the number-theoretic primitives and key generation

pub mod bigint;
pub mod keygen;
pub mod prime;

pub use bigint::{mod_inverse, mod_pow, RsaBigInt};
pub use keygen::{generate_keypair, KeyPair, PrivateKey, PublicKey, PUBLIC_EXPONENT};
pub use prime::{generate_prime, is_probable_prime, miller_rabin, rounds_for};
