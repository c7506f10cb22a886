//! Base64url helpers (RFC 7515, no padding)

use crate::error::{JoseError, JoseResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use zeroize::Zeroizing;

#[inline]
pub(crate) fn b64_encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

#[inline]
pub(crate) fn b64_decode(input: &str, what: &str) -> JoseResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| JoseError::format(format!("{what} is not base64url: {e}")))
}

/// Decode a secret JWK member into a fixed-size, zeroized buffer
pub(crate) fn decode_secret<const N: usize>(
    member: Option<&str>,
    name: &str,
) -> JoseResult<Zeroizing<[u8; N]>> {
    let encoded = member.ok_or_else(|| JoseError::invalid_key(format!("missing '{name}'")))?;
    let decoded = Zeroizing::new(
        URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| JoseError::invalid_key(format!("'{name}' is not base64url")))?,
    );
    if decoded.len() != N {
        return Err(JoseError::invalid_key(format!(
            "'{name}' must be {N} bytes, got {}",
            decoded.len()
        )));
    }
    let mut out = Zeroizing::new([0u8; N]);
    out.copy_from_slice(&decoded);
    Ok(out)
}
