//! ES256 (ECDSA P-256 / SHA-256) key generation, signing and verification

use crate::{
    encoding::{b64_decode, b64_encode, decode_secret},
    error::{JoseError, JoseResult},
    jwk::{Curve, Jwk, KeyType},
    types::{Claims, JoseHeader, SIGNING_ALG},
};
use p256::{
    ecdsa::{
        Signature, SigningKey, VerifyingKey,
        signature::{Signer, Verifier},
    },
    elliptic_curve::sec1::ToEncodedPoint,
};
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

const COORDINATE_LEN: usize = 32;
// A uniformly random 32-byte string is a valid P-256 scalar except with
// probability ~2^-32, so a handful of draws always suffices in practice.
const MAX_SCALAR_DRAWS: usize = 8;

/// Generate a P-256 key pair as (private JWK, public JWK)
pub(crate) fn generate_keypair() -> JoseResult<(Jwk, Jwk)> {
    let signing_key = random_signing_key()?;
    let point = signing_key.verifying_key().to_encoded_point(false);
    let (x, y) = match (point.x(), point.y()) {
        (Some(x), Some(y)) => (b64_encode(x), b64_encode(y)),
        _ => return Err(JoseError::KeyGeneration("public point is the identity".into())),
    };

    let mut scalar = signing_key.to_bytes();
    let d = b64_encode(&scalar);
    scalar.as_mut_slice().zeroize();

    let public = Jwk::ec_public(x.clone(), y.clone());
    Ok((Jwk::ec_private(x, y, d), public))
}

fn random_signing_key() -> JoseResult<SigningKey> {
    let mut rng = rand::rng();
    for _ in 0..MAX_SCALAR_DRAWS {
        let mut bytes = Zeroizing::new([0u8; COORDINATE_LEN]);
        rng.fill_bytes(bytes.as_mut());
        if let Ok(key) = SigningKey::from_slice(bytes.as_ref()) {
            return Ok(key);
        }
    }
    Err(JoseError::KeyGeneration(
        "could not draw a valid P-256 scalar".into(),
    ))
}

fn ensure_p256(jwk: &Jwk) -> JoseResult<()> {
    if jwk.kty != KeyType::EC || jwk.crv != Some(Curve::P256) {
        return Err(JoseError::invalid_key("expected an EC P-256 key"));
    }
    Ok(())
}

fn signing_key(jwk: &Jwk) -> JoseResult<SigningKey> {
    ensure_p256(jwk)?;
    let d = decode_secret::<COORDINATE_LEN>(jwk.d.as_deref(), "d")?;
    SigningKey::from_slice(d.as_ref()).map_err(|_| JoseError::invalid_key("invalid P-256 scalar"))
}

fn verifying_key(jwk: &Jwk) -> JoseResult<VerifyingKey> {
    ensure_p256(jwk)?;
    let coordinate = |member: Option<&str>, name: &str| -> JoseResult<Vec<u8>> {
        let encoded = member.ok_or_else(|| JoseError::invalid_key(format!("missing '{name}'")))?;
        let bytes = b64_decode(encoded, name).map_err(|_| JoseError::invalid_key(name))?;
        if bytes.len() != COORDINATE_LEN {
            return Err(JoseError::invalid_key(format!("'{name}' must be 32 bytes")));
        }
        Ok(bytes)
    };

    // Uncompressed SEC1 point: 0x04 || x || y
    let mut sec1 = Vec::with_capacity(1 + 2 * COORDINATE_LEN);
    sec1.push(0x04);
    sec1.extend_from_slice(&coordinate(jwk.x.as_deref(), "x")?);
    sec1.extend_from_slice(&coordinate(jwk.y.as_deref(), "y")?);

    VerifyingKey::from_sec1_bytes(&sec1).map_err(|_| JoseError::invalid_key("point not on P-256"))
}

/// Sign header and claims into a compact JWS
pub(crate) fn sign(header: &JoseHeader, claims: &Claims, private_key: &Jwk) -> JoseResult<String> {
    if header.alg != SIGNING_ALG {
        return Err(JoseError::UnsupportedAlgorithm(header.alg.clone()));
    }
    let signing_key = signing_key(private_key)?;

    let header_b64 = b64_encode(serde_json::to_vec(header)?);
    let claims_b64 = b64_encode(serde_json::to_vec(claims)?);

    let mut signing_input = String::with_capacity(header_b64.len() + 1 + claims_b64.len());
    signing_input.push_str(&header_b64);
    signing_input.push('.');
    signing_input.push_str(&claims_b64);

    // JWS carries the fixed-width r || s form, not DER
    let signature: Signature = signing_key.sign(signing_input.as_bytes());
    let signature_b64 = b64_encode(signature.to_bytes());

    let mut jws = String::with_capacity(signing_input.len() + 1 + signature_b64.len());
    jws.push_str(&signing_input);
    jws.push('.');
    jws.push_str(&signature_b64);
    Ok(jws)
}

/// Split a compact JWS into its three segments
pub(crate) fn split(token: &str) -> JoseResult<[&str; 3]> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(p), Some(s), None) if !h.is_empty() && !p.is_empty() => Ok([h, p, s]),
        _ => Err(JoseError::format("JWS must have 3 non-empty segments")),
    }
}

/// Decode the protected header of a compact JWS without verifying it
pub(crate) fn peek_header(token: &str) -> JoseResult<JoseHeader> {
    let [header_b64, _, _] = split(token)?;
    let header_json = b64_decode(header_b64, "header")?;
    serde_json::from_slice(&header_json)
        .map_err(|e| JoseError::format(format!("header is not a JOSE header: {e}")))
}

/// Verify a compact JWS and return its header and claims
pub(crate) fn verify(token: &str, public_key: &Jwk) -> JoseResult<(JoseHeader, Claims)> {
    let [header_b64, claims_b64, signature_b64] = split(token)?;
    let header = peek_header(token)?;
    if header.alg != SIGNING_ALG {
        return Err(JoseError::UnsupportedAlgorithm(header.alg));
    }

    let verifying_key = verifying_key(public_key)?;
    let signature_bytes = b64_decode(signature_b64, "signature")
        .map_err(|_| JoseError::InvalidSignature)?;
    let signature =
        Signature::from_slice(&signature_bytes).map_err(|_| JoseError::InvalidSignature)?;

    let mut signing_input = String::with_capacity(header_b64.len() + 1 + claims_b64.len());
    signing_input.push_str(header_b64);
    signing_input.push('.');
    signing_input.push_str(claims_b64);

    verifying_key
        .verify(signing_input.as_bytes(), &signature)
        .map_err(|_| JoseError::InvalidSignature)?;

    // Only decode claims after signature verification succeeds
    let claims_json = b64_decode(claims_b64, "payload")?;
    let claims: Claims = serde_json::from_slice(&claims_json)
        .map_err(|e| JoseError::format(format!("payload is not a JSON object: {e}")))?;

    Ok((header, claims))
}
