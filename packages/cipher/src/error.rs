//! Claims cipher errors

use kidset_key::KeyError;
use thiserror::Error;

/// Errors raised while encrypting or decrypting claim values
#[derive(Debug, Error)]
pub enum CipherError {
    /// Input is not a string
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Encryption failed
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Ciphertext is malformed, tampered with, or encrypted under another key
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// Key set lifecycle or storage failure
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Result type for cipher operations
pub type Result<T> = std::result::Result<T, CipherError>;
