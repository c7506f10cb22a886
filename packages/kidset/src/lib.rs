//! # kidset
//!
//! Generates ES256 signing key sets with a companion symmetric secret,
//! persists them under random ids, and issues tokens whose `kid` header
//! names the key set needed to verify them. Older key sets stay loadable,
//! so rotating keys never invalidates tokens already in circulation.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kidset::prelude::*;
//! use serde_json::json;
//!
//! let mut manager = KeySetManager::new(FileKeyStorage::new("./keys"), JoseCrypto::new());
//! manager.generate_keys()?;
//! manager.save_keys()?;
//!
//! let claims = json!({"iss": "issuer1", "aud": "aud1", "uid": 42});
//! let token = TokenIssuer::new(&mut manager).create(claims.as_object().cloned().unwrap_or_default())?;
//! let decoded = TokenVerifier::new(&mut manager).decode(&token)?;
//! ```

#![forbid(unsafe_code)]

pub mod cli;

pub use kidset_cipher as cipher;
pub use kidset_common as common;
pub use kidset_jose as jose;
pub use kidset_jwt as jwt;
pub use kidset_key as key;

/// Common imports
pub mod prelude {
    pub use kidset_cipher::{CipherError, ClaimsCipher};
    pub use kidset_common::{KidsetConfig, LoggingTransformer};
    pub use kidset_jose::{Claims, CryptoProvider, JoseCrypto, Jwk};
    pub use kidset_jwt::{DecodedToken, JwtError, TokenIssuer, TokenVerifier};
    pub use kidset_key::{
        FileKeyStorage, KeyError, KeySetManager, KeyStorage, MemoryKeyStorage,
    };
}
