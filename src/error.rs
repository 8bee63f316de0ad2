// Error types
// Every failure in the crate is reported through this enum

/// Errors that can occur during key generation and image encryption.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid bit length: must be at least {min} bits, got {actual}")]
    InvalidBitLength { min: u64, actual: u64 },

    #[error("No modular inverse: operands are not coprime")]
    NoModularInverse,

    #[error("Pixel ({row}, {col}) has no entry in the ciphertext cache")]
    CoordinateOutOfCache { row: usize, col: usize },

    #[error("Modulus too small: n must exceed 255 to encrypt 8-bit channels")]
    ModulusTooSmall,

    #[error("Invalid modulus")]
    InvalidModulus,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid image buffer: expected {expected} bytes, got {actual}")]
    InvalidImage { expected: usize, actual: usize },

    #[error("Decrypted value at pixel ({row}, {col}) does not fit in a channel")]
    ChannelOverflow { row: usize, col: usize },

    #[error("No key pair generated")]
    MissingKeyPair,

    #[error("No ciphertext to decrypt")]
    MissingCiphertext,
}

pub type Result<T> = std::result::Result<T, Error>;
