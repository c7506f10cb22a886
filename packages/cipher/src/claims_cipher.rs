//! Compact JWE encryption of claim values with the key set secret

use crate::error::{CipherError, Result};
use kidset_jose::{CryptoProvider, JoseHeader};
use kidset_key::{KeyError, KeySetManager, KeyStorage, is_valid_kid};
use serde_json::Value;

/// Encrypts and decrypts strings with the symmetric secret of a key set
///
/// With an explicit kid the named key set is loaded into the manager;
/// otherwise the resident key set is used, loading the latest one when
/// nothing is resident.
pub struct ClaimsCipher<'a, S, C> {
    manager: &'a mut KeySetManager<S, C>,
}

impl<'a, S: KeyStorage, C: CryptoProvider> ClaimsCipher<'a, S, C> {
    /// Cipher borrowing `manager` for its lifetime
    pub fn new(manager: &'a mut KeySetManager<S, C>) -> Self {
        Self { manager }
    }

    /// Encrypt `plaintext` into a five-segment compact JWE
    pub fn encrypt(&mut self, plaintext: &str, kid: Option<&str>) -> Result<String> {
        self.select(kid)?;
        // nothing could decrypt under a set that is never persisted
        if self.manager.is_dirty() {
            return Err(KeyError::KeysNotSaved.into());
        }
        let (kid, secret) = match (self.manager.kid(), self.manager.secret_key()) {
            (Some(kid), Some(secret)) => (kid, secret),
            _ => return Err(KeyError::KeysNotGenerated.into()),
        };

        self.manager
            .crypto()
            .encrypt_compact(&JoseHeader::jwe(kid), plaintext.as_bytes(), secret)
            .map_err(|e| CipherError::Encryption(e.to_string()))
    }

    /// Decrypt a compact JWE produced by [`encrypt`](Self::encrypt)
    pub fn decrypt(&mut self, ciphertext: &str, kid: Option<&str>) -> Result<String> {
        self.select(kid)?;
        let secret = self
            .manager
            .secret_key()
            .ok_or(KeyError::KeysNotGenerated)?;

        let plaintext = self
            .manager
            .crypto()
            .decrypt_compact(ciphertext, secret)
            .map_err(|e| {
                log::debug!("Rejected ciphertext: {e}");
                CipherError::Decryption(e.to_string())
            })?;
        String::from_utf8(plaintext)
            .map_err(|_| CipherError::Decryption("plaintext is not UTF-8".into()))
    }

    /// [`encrypt`](Self::encrypt) for a JSON value, which must be a string
    pub fn encrypt_value(&mut self, value: &Value, kid: Option<&str>) -> Result<String> {
        let plaintext = expect_string(value)?;
        self.encrypt(plaintext, kid)
    }

    /// [`decrypt`](Self::decrypt) for a JSON value, which must be a string
    pub fn decrypt_value(&mut self, value: &Value, kid: Option<&str>) -> Result<String> {
        let ciphertext = expect_string(value)?;
        self.decrypt(ciphertext, kid)
    }

    fn select(&mut self, kid: Option<&str>) -> Result<()> {
        match kid {
            Some(kid) if !is_valid_kid(kid) => Err(KeyError::InvalidKid(kid.to_string()).into()),
            Some(kid) if self.manager.kid() == Some(kid) => Ok(()),
            Some(kid) => Ok(self.manager.load_keys(Some(kid))?),
            None => Ok(self.manager.ensure_loaded()?),
        }
    }
}

fn expect_string(value: &Value) -> Result<&str> {
    value.as_str().ok_or_else(|| {
        let kind = match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        CipherError::InvalidInput(format!("expected a string, got {kind}"))
    })
}
