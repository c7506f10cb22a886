//! JSON Web Key (JWK) representation of kidset key material
//!
//! Only the two shapes kidset generates are modelled: EC P-256 signing keys
//! (`kty: "EC"`) and symmetric secrets (`kty: "oct"`). Private members are
//! base64url strings, redacted from `Debug` and zeroized on drop.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Cryptographic key type
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub enum KeyType {
    /// Elliptic curve key pair
    EC,

    /// Octet sequence (symmetric key)
    #[serde(rename = "oct")]
    Oct,
}

/// Cryptographic curve type
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub enum Curve {
    /// NIST P-256
    #[serde(rename = "P-256")]
    P256,
}

/// A JSON Web Key as persisted in key set records
#[derive(Clone, Deserialize, Serialize, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct Jwk {
    /// Key type
    #[zeroize(skip)]
    pub kty: KeyType,

    /// Curve, EC keys only
    #[zeroize(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<Curve>,

    /// X coordinate, EC keys only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,

    /// Y coordinate, EC keys only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,

    /// Private scalar, EC private keys only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,

    /// Key value, `oct` keys only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
}

impl Jwk {
    /// EC P-256 private key
    pub fn ec_private(x: String, y: String, d: String) -> Self {
        Self {
            kty: KeyType::EC,
            crv: Some(Curve::P256),
            x: Some(x),
            y: Some(y),
            d: Some(d),
            k: None,
        }
    }

    /// EC P-256 public key
    pub fn ec_public(x: String, y: String) -> Self {
        Self {
            kty: KeyType::EC,
            crv: Some(Curve::P256),
            x: Some(x),
            y: Some(y),
            d: None,
            k: None,
        }
    }

    /// Symmetric key
    pub fn oct(k: String) -> Self {
        Self {
            kty: KeyType::Oct,
            crv: None,
            x: None,
            y: None,
            d: None,
            k: Some(k),
        }
    }

    /// Whether this key carries secret material
    pub fn is_private(&self) -> bool {
        self.d.is_some() || self.k.is_some()
    }

    /// The public half of an EC key; `None` for `oct` keys
    pub fn to_public(&self) -> Option<Jwk> {
        match (self.kty, &self.x, &self.y) {
            (KeyType::EC, Some(x), Some(y)) => Some(Jwk::ec_public(x.clone(), y.clone())),
            _ => None,
        }
    }
}

impl fmt::Debug for Jwk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Jwk")
            .field("kty", &self.kty)
            .field("crv", &self.crv)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("d", &redacted(&self.d))
            .field("k", &redacted(&self.k))
            .finish()
    }
}
