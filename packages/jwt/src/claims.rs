//! Required claim schema

use crate::error::{JwtError, JwtResult};
use kidset_jose::Claims;
use serde_json::Value;

/// JSON type a required claim must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimType {
    /// JSON string
    String,
    /// JSON number without a fractional part (booleans are not integers)
    Integer,
}

impl ClaimType {
    fn name(self) -> &'static str {
        match self {
            ClaimType::String => "string",
            ClaimType::Integer => "integer",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            ClaimType::String => value.is_string(),
            ClaimType::Integer => value.is_i64() || value.is_u64(),
        }
    }
}

/// Claims every issued token must carry, checked in this order
pub const REQUIRED_CLAIMS: [(&str, ClaimType); 3] = [
    ("iss", ClaimType::String),
    ("aud", ClaimType::String),
    ("uid", ClaimType::Integer),
];

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check presence and type of every required claim, stopping at the first failure
pub fn check_claims(claims: &Claims) -> JwtResult<()> {
    for (name, expected) in REQUIRED_CLAIMS {
        let value = claims
            .get(name)
            .ok_or_else(|| JwtError::invalid_claims(format!("missing required claim '{name}'")))?;
        if !expected.matches(value) {
            return Err(JwtError::invalid_claims(format!(
                "incorrect type for claim '{name}': expected {}, got {}",
                expected.name(),
                type_name(value)
            )));
        }
    }
    Ok(())
}
