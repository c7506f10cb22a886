//! Key set lifecycle errors

use thiserror::Error;

/// Errors raised while generating, persisting or loading key sets
#[derive(Debug, Error)]
pub enum KeyError {
    /// The crypto provider failed to produce key material
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// `save` was called without a freshly generated key set
    #[error("No generated key set to save")]
    KeysNotGenerated,

    /// The resident key set was generated but never saved
    #[error("Resident key set has not been saved")]
    KeysNotSaved,

    /// Storage has no record for the requested id (`latest` when none was given)
    #[error("Key set not found: {0}")]
    KeyNotFound(String),

    /// The storage backend failed
    #[error("Key storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A stored record could not be read back as a key set
    #[error("Invalid key set record: {0}")]
    InvalidRecord(String),

    /// A key set id is not a well-formed identifier
    #[error("Invalid key set id: {0}")]
    InvalidKid(String),
}

impl KeyError {
    /// Create a storage unavailable error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    /// Key not found for an optional id
    pub fn not_found(id: Option<&str>) -> Self {
        Self::KeyNotFound(id.unwrap_or("latest").to_string())
    }
}

/// Result type for key operations
pub type Result<T> = std::result::Result<T, KeyError>;
