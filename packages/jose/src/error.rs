//! JOSE primitive error types

use thiserror::Error;

/// Result type for JOSE primitive operations
pub type JoseResult<T> = Result<T, JoseError>;

/// Errors raised by the crypto provider
#[derive(Debug, Error)]
pub enum JoseError {
    /// Key material is missing fields or has the wrong shape
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Key generation failed
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Compact serialization is malformed
    #[error("Malformed compact serialization: {0}")]
    Format(String),

    /// Header names an algorithm this provider does not implement
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Signature does not verify
    #[error("Invalid signature")]
    InvalidSignature,

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (wrong key, tampered ciphertext)
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// JSON (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JoseError {
    /// Create an invalid key error
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Create a decryption error
    pub fn decryption(msg: impl Into<String>) -> Self {
        Self::Decryption(msg.into())
    }
}
