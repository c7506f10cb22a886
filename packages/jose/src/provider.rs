//! The crypto capability consumed by key management, token and cipher code

use crate::{
    error::JoseResult,
    es256, jwe,
    jwk::Jwk,
    types::{Claims, JoseHeader},
};
use std::sync::Arc;

/// Key generation and compact JWS/JWE primitives
///
/// Implementations must be stateless with respect to keys: every call
/// receives the key material it needs.
pub trait CryptoProvider: Send + Sync {
    /// Generate an asymmetric signing pair as (private, public)
    fn generate_signing_pair(&self) -> JoseResult<(Jwk, Jwk)>;

    /// Generate a symmetric secret of `bits` length
    fn generate_secret(&self, bits: usize) -> JoseResult<Jwk>;

    /// Sign `claims` under `header` into a compact JWS
    fn sign(&self, header: &JoseHeader, claims: &Claims, private_key: &Jwk) -> JoseResult<String>;

    /// Verify a compact JWS and return its header and claims
    fn verify(&self, token: &str, public_key: &Jwk) -> JoseResult<(JoseHeader, Claims)>;

    /// Encrypt `plaintext` into a compact JWE
    fn encrypt_compact(
        &self,
        header: &JoseHeader,
        plaintext: &[u8],
        secret: &Jwk,
    ) -> JoseResult<String>;

    /// Decrypt a compact JWE
    fn decrypt_compact(&self, token: &str, secret: &Jwk) -> JoseResult<Vec<u8>>;
}

/// Default provider: ES256 signatures, A128KW + A128GCM encryption
#[derive(Debug, Clone, Copy, Default)]
pub struct JoseCrypto;

impl JoseCrypto {
    /// Create the provider
    pub fn new() -> Self {
        Self
    }
}

impl CryptoProvider for JoseCrypto {
    fn generate_signing_pair(&self) -> JoseResult<(Jwk, Jwk)> {
        log::debug!("Generating P-256 signing pair");
        es256::generate_keypair()
    }

    fn generate_secret(&self, bits: usize) -> JoseResult<Jwk> {
        log::debug!("Generating {bits}-bit symmetric secret");
        jwe::generate_secret(bits)
    }

    fn sign(&self, header: &JoseHeader, claims: &Claims, private_key: &Jwk) -> JoseResult<String> {
        es256::sign(header, claims, private_key)
    }

    fn verify(&self, token: &str, public_key: &Jwk) -> JoseResult<(JoseHeader, Claims)> {
        es256::verify(token, public_key)
    }

    fn encrypt_compact(
        &self,
        header: &JoseHeader,
        plaintext: &[u8],
        secret: &Jwk,
    ) -> JoseResult<String> {
        jwe::encrypt(header, plaintext, secret)
    }

    fn decrypt_compact(&self, token: &str, secret: &Jwk) -> JoseResult<Vec<u8>> {
        jwe::decrypt(token, secret)
    }
}

impl<T: CryptoProvider + ?Sized> CryptoProvider for Arc<T> {
    fn generate_signing_pair(&self) -> JoseResult<(Jwk, Jwk)> {
        (**self).generate_signing_pair()
    }

    fn generate_secret(&self, bits: usize) -> JoseResult<Jwk> {
        (**self).generate_secret(bits)
    }

    fn sign(&self, header: &JoseHeader, claims: &Claims, private_key: &Jwk) -> JoseResult<String> {
        (**self).sign(header, claims, private_key)
    }

    fn verify(&self, token: &str, public_key: &Jwk) -> JoseResult<(JoseHeader, Claims)> {
        (**self).verify(token, public_key)
    }

    fn encrypt_compact(
        &self,
        header: &JoseHeader,
        plaintext: &[u8],
        secret: &Jwk,
    ) -> JoseResult<String> {
        (**self).encrypt_compact(header, plaintext, secret)
    }

    fn decrypt_compact(&self, token: &str, secret: &Jwk) -> JoseResult<Vec<u8>> {
        (**self).decrypt_compact(token, secret)
    }
}

/// Decode the protected header of any compact token without verifying it
pub fn peek_header(token: &str) -> JoseResult<JoseHeader> {
    match token.split('.').count() {
        3 => es256::peek_header(token),
        _ => jwe::peek_header(token),
    }
}
