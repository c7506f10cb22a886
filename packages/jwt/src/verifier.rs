//! Kid-driven token verification
//!
//! Decoding walks a fixed pipeline and stops at the first failing stage:
//!
//! ```text
//! received -> header parsed -> kid validated -> keys loaded -> signature verified
//! ```
//!
//! [`TokenVerifier::validate`] then compares claims against expected values.
//! Nothing from the token is trusted until its signature verifies, and the
//! kid is checked for shape before it is used as a storage key.

use crate::error::{JwtError, JwtResult};
use kidset_common::LoggingTransformer;
use kidset_jose::{Claims, CryptoProvider, JoseError, JoseHeader, SIGNING_ALG, peek_header};
use kidset_key::{KeyError, KeySetManager, KeyStorage, is_valid_kid};
use serde::Serialize;

/// A verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedToken {
    /// Protected header
    pub header: JoseHeader,
    /// Claims
    pub claims: Claims,
}

/// Verifies tokens against the key set their header names
pub struct TokenVerifier<'a, S, C> {
    manager: &'a mut KeySetManager<S, C>,
}

impl<'a, S: KeyStorage, C: CryptoProvider> TokenVerifier<'a, S, C> {
    /// Verifier borrowing `manager` for its lifetime
    pub fn new(manager: &'a mut KeySetManager<S, C>) -> Self {
        Self { manager }
    }

    /// Verify `token` and return its header and claims
    ///
    /// The key set named by the header `kid` is loaded into the manager,
    /// replacing whatever was resident.
    pub fn decode(&mut self, token: &str) -> JwtResult<DecodedToken> {
        self.decode_inner(token).inspect_err(|e| {
            LoggingTransformer::log_token_rejected(e.stage(), e);
        })
    }

    /// Check that every expected claim is present in `decoded` with an equal value
    pub fn validate(&self, decoded: &DecodedToken, expected: &Claims) -> JwtResult<()> {
        for (name, value) in expected {
            if decoded.claims.get(name) != Some(value) {
                let err = JwtError::claims_mismatch(name.as_str());
                LoggingTransformer::log_token_rejected(err.stage(), &err);
                return Err(err);
            }
        }
        Ok(())
    }

    /// [`decode`](Self::decode) followed by [`validate`](Self::validate)
    pub fn decode_and_validate(&mut self, token: &str, expected: &Claims) -> JwtResult<DecodedToken> {
        let decoded = self.decode(token)?;
        self.validate(&decoded, expected)?;
        Ok(decoded)
    }

    fn decode_inner(&mut self, token: &str) -> JwtResult<DecodedToken> {
        if token.split('.').count() != 3 {
            return Err(JwtError::token_format("expected 3 segments"));
        }
        let header = peek_header(token).map_err(|e| JwtError::token_format(e.to_string()))?;

        let kid = match header.kid.as_deref() {
            Some(kid) if is_valid_kid(kid) => kid,
            Some(kid) => return Err(JwtError::TokenKidInvalid(kid.to_string())),
            None => return Err(JwtError::TokenKidInvalid(String::new())),
        };

        self.manager.load_keys(Some(kid))?;
        let public_key = self.manager.public_key().ok_or_else(|| KeyError::not_found(Some(kid)))?;

        if header.alg != SIGNING_ALG {
            return Err(JwtError::SignatureVerification);
        }
        let (header, claims) = self
            .manager
            .crypto()
            .verify(token, public_key)
            .map_err(|e| match e {
                JoseError::Format(msg) => JwtError::TokenFormat(msg),
                _ => JwtError::SignatureVerification,
            })?;

        log::debug!("Verified token under key set {kid}");
        Ok(DecodedToken { header, claims })
    }
}
