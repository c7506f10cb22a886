//! JWT error types

use kidset_key::KeyError;
use std::fmt;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// JWT error types
#[derive(Debug)]
pub enum JwtError {
    /// A required claim is missing or has the wrong type
    InvalidClaims(String),
    /// Token is not a well-formed compact JWS
    TokenFormat(String),
    /// Header `kid` is absent or not a well-formed key set id
    TokenKidInvalid(String),
    /// Signature does not verify under the key set named by the token
    SignatureVerification,
    /// A decoded claim differs from the expected value
    ClaimsValidation {
        /// Name of the first mismatching claim
        claim: String,
    },
    /// The crypto provider failed to sign
    Signing(String),
    /// Key set lifecycle or storage failure
    Key(KeyError),
}

impl fmt::Display for JwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JwtError::InvalidClaims(msg) => write!(f, "Invalid claims: {msg}"),
            JwtError::TokenFormat(msg) => write!(f, "Malformed token: {msg}"),
            JwtError::TokenKidInvalid(kid) => write!(f, "Invalid token kid: {kid:?}"),
            JwtError::SignatureVerification => write!(f, "Token signature verification failed"),
            JwtError::ClaimsValidation { claim } => {
                write!(f, "Claim '{claim}' does not match the expected value")
            }
            JwtError::Signing(msg) => write!(f, "Signing error: {msg}"),
            // transparent, like `#[error(transparent)]` in the other crates
            JwtError::Key(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for JwtError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JwtError::Key(e) => e.source(),
            _ => None,
        }
    }
}

impl From<KeyError> for JwtError {
    fn from(e: KeyError) -> Self {
        JwtError::Key(e)
    }
}

impl JwtError {
    /// Create an invalid claims error
    #[inline]
    #[must_use]
    pub fn invalid_claims(msg: impl Into<String>) -> Self {
        JwtError::InvalidClaims(msg.into())
    }

    /// Create a token format error
    #[inline]
    #[must_use]
    pub fn token_format(msg: impl Into<String>) -> Self {
        JwtError::TokenFormat(msg.into())
    }

    /// Create a claims validation error
    #[inline]
    #[must_use]
    pub fn claims_mismatch(claim: impl Into<String>) -> Self {
        JwtError::ClaimsValidation {
            claim: claim.into(),
        }
    }

    /// Pipeline stage name used when logging rejections
    pub(crate) fn stage(&self) -> &'static str {
        match self {
            JwtError::TokenFormat(_) => "header",
            JwtError::TokenKidInvalid(_) => "kid",
            JwtError::Key(_) => "keys",
            JwtError::SignatureVerification => "signature",
            JwtError::ClaimsValidation { .. } => "claims",
            JwtError::InvalidClaims(_) | JwtError::Signing(_) => "issue",
        }
    }
}
