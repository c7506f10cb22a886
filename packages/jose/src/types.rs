//! Protected header and claim set types

use serde::{Deserialize, Serialize};

/// Claim set carried by a token: a JSON object
pub type Claims = serde_json::Map<String, serde_json::Value>;

/// JWS signing algorithm used for every kidset token
pub const SIGNING_ALG: &str = "ES256";
/// JWE key management algorithm
pub const KEY_WRAP_ALG: &str = "A128KW";
/// JWE content encryption algorithm
pub const CONTENT_ENC: &str = "A128GCM";

/// JOSE protected header shared by JWS and JWE compact tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoseHeader {
    /// Algorithm (`ES256` for signatures, `A128KW` for key wrapping)
    pub alg: String,
    /// Content encryption, JWE only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enc: Option<String>,
    /// Token type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Key set identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl JoseHeader {
    /// Header for an ES256-signed JWT
    #[must_use]
    pub fn jws(kid: impl Into<String>) -> Self {
        Self {
            alg: SIGNING_ALG.to_string(),
            enc: None,
            typ: Some("JWT".to_string()),
            kid: Some(kid.into()),
        }
    }

    /// Header for an A128KW + A128GCM JWE
    #[must_use]
    pub fn jwe(kid: impl Into<String>) -> Self {
        Self {
            alg: KEY_WRAP_ALG.to_string(),
            enc: Some(CONTENT_ENC.to_string()),
            typ: None,
            kid: Some(kid.into()),
        }
    }
}
