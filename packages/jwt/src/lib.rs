//! ES256 JSON Web Tokens bound to kidset key sets
//!
//! This crate provides:
//! - `TokenIssuer`: required-claim checks, `iat` stamping, signing under the
//!   active key set with its id as `kid`
//! - `TokenVerifier`: kid-driven key set selection, signature verification
//!   and expected-claim validation

mod claims;
mod error;
mod issuer;
mod verifier;

pub use claims::{ClaimType, REQUIRED_CLAIMS, check_claims};
pub use error::*;
pub use issuer::TokenIssuer;
pub use kidset_jose::{Claims, JoseHeader};
pub use verifier::{DecodedToken, TokenVerifier};
