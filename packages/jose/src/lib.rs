//! JOSE building blocks for kidset
//!
//! This crate provides:
//! - JSON Web Key types for EC P-256 signing pairs and `oct` secrets
//! - The `CryptoProvider` capability consumed by the key, token and cipher crates
//! - `JoseCrypto`, the default provider: ES256 compact JWS and
//!   A128KW + A128GCM compact JWE

pub(crate) mod encoding;
mod error;
pub(crate) mod es256;
pub(crate) mod jwe;
mod jwk;
mod provider;
mod types;

pub use error::*;
pub use jwk::{Curve, Jwk, KeyType};
pub use provider::{CryptoProvider, JoseCrypto, peek_header};
pub use types::*;
