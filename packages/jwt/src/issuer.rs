//! Token issuance under the active key set

use crate::{
    claims::check_claims,
    error::{JwtError, JwtResult},
};
use kidset_common::LoggingTransformer;
use kidset_jose::{Claims, CryptoProvider, JoseHeader};
use kidset_key::{KeyError, KeySetManager, KeyStorage};
use serde_json::Value;

/// Signs claims with the manager's resident key set
///
/// When nothing is resident the most recently created key set is loaded
/// on first use. Every issued token bumps the key set counter, which is
/// written back to storage before the token is returned.
pub struct TokenIssuer<'a, S, C> {
    manager: &'a mut KeySetManager<S, C>,
}

impl<'a, S: KeyStorage, C: CryptoProvider> TokenIssuer<'a, S, C> {
    /// Issuer borrowing `manager` for its lifetime
    pub fn new(manager: &'a mut KeySetManager<S, C>) -> Self {
        Self { manager }
    }

    /// Check `claims`, stamp `iat` and sign them into a compact JWS
    ///
    /// A caller-supplied `iat` is overwritten. The header carries `alg`
    /// `ES256` and the active key set id as `kid`.
    pub fn create(&mut self, mut claims: Claims) -> JwtResult<String> {
        check_claims(&claims)?;
        self.manager.ensure_loaded()?;
        // an unsaved set would sign tokens nobody can verify
        if self.manager.is_dirty() {
            return Err(KeyError::KeysNotSaved.into());
        }

        let (kid, private_key) = match (self.manager.kid(), self.manager.private_key()) {
            (Some(kid), Some(key)) => (kid.to_string(), key),
            _ => return Err(KeyError::KeysNotGenerated.into()),
        };

        claims.insert("iat".to_string(), Value::from(chrono::Utc::now().timestamp()));
        let token = self
            .manager
            .crypto()
            .sign(&JoseHeader::jws(&kid), &claims, private_key)
            .map_err(|e| JwtError::Signing(e.to_string()))?;

        let counter = self.manager.record_issuance()?;

        let uid = claims.get("uid").map(Value::to_string).unwrap_or_default();
        LoggingTransformer::log_token_issued(&kid, &uid, counter);
        Ok(token)
    }
}
