//! # kidset cipher
//!
//! Encrypts claim values as compact JWE (A128KW + A128GCM) with the
//! symmetric secret of a key set, and decrypts them again.

#![forbid(unsafe_code)]

mod claims_cipher;
pub mod error;

pub use claims_cipher::ClaimsCipher;
pub use error::{CipherError, Result};
