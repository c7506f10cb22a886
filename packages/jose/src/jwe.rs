//! Compact JWE with A128KW key wrapping and A128GCM content encryption
//!
//! Layout: `header.encrypted_key.iv.ciphertext.tag`, every segment base64url.
//! A fresh content key and IV are drawn per message; the encoded protected
//! header is the GCM additional authenticated data (RFC 7516 section 5.1).

use crate::{
    encoding::{b64_decode, b64_encode, decode_secret},
    error::{JoseError, JoseResult},
    jwk::{Jwk, KeyType},
    types::{CONTENT_ENC, JoseHeader, KEY_WRAP_ALG},
};
use aes_gcm::{
    Aes128Gcm, KeyInit, Nonce,
    aead::{Aead, Payload},
};
use aes_kw::KekAes128;
use rand::RngCore;
use zeroize::Zeroizing;

const KEY_LEN: usize = 16;
const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;
// RFC 3394 adds one 8-byte block to the wrapped key
const WRAPPED_LEN: usize = KEY_LEN + 8;

/// Generate a random `oct` key of `bits` length
pub(crate) fn generate_secret(bits: usize) -> JoseResult<Jwk> {
    if bits == 0 || bits % 8 != 0 {
        return Err(JoseError::KeyGeneration(format!(
            "secret length must be a positive multiple of 8 bits, got {bits}"
        )));
    }
    let mut key = Zeroizing::new(vec![0u8; bits / 8]);
    rand::rng().fill_bytes(key.as_mut_slice());
    Ok(Jwk::oct(b64_encode(key.as_slice())))
}

fn key_encryption_key(secret: &Jwk) -> JoseResult<KekAes128> {
    if secret.kty != KeyType::Oct {
        return Err(JoseError::invalid_key("expected an oct key"));
    }
    let k = decode_secret::<KEY_LEN>(secret.k.as_deref(), "k")?;
    Ok(KekAes128::from(*k))
}

fn ensure_algorithms(header: &JoseHeader) -> JoseResult<()> {
    if header.alg != KEY_WRAP_ALG {
        return Err(JoseError::UnsupportedAlgorithm(header.alg.clone()));
    }
    match header.enc.as_deref() {
        Some(CONTENT_ENC) => Ok(()),
        Some(other) => Err(JoseError::UnsupportedAlgorithm(other.to_string())),
        None => Err(JoseError::format("JWE header has no 'enc'")),
    }
}

/// Encrypt `plaintext` under `secret`
pub(crate) fn encrypt(header: &JoseHeader, plaintext: &[u8], secret: &Jwk) -> JoseResult<String> {
    ensure_algorithms(header)?;
    let kek = key_encryption_key(secret)?;

    let mut rng = rand::rng();
    let mut cek = Zeroizing::new([0u8; KEY_LEN]);
    rng.fill_bytes(cek.as_mut());
    let mut iv = [0u8; IV_LEN];
    rng.fill_bytes(&mut iv);

    let mut wrapped = [0u8; WRAPPED_LEN];
    kek.wrap(cek.as_ref(), &mut wrapped)
        .map_err(|e| JoseError::Encryption(format!("key wrap: {e}")))?;

    let header_b64 = b64_encode(serde_json::to_vec(header)?);
    let cipher = Aes128Gcm::new_from_slice(cek.as_ref())
        .map_err(|_| JoseError::Encryption("content key length".into()))?;
    let mut sealed = cipher
        .encrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: plaintext,
                aad: header_b64.as_bytes(),
            },
        )
        .map_err(|_| JoseError::Encryption("AES-GCM seal failed".into()))?;

    // aes-gcm appends the tag to the ciphertext
    let tag = sealed.split_off(sealed.len() - TAG_LEN);

    Ok(format!(
        "{header_b64}.{}.{}.{}.{}",
        b64_encode(&wrapped),
        b64_encode(iv),
        b64_encode(&sealed),
        b64_encode(&tag)
    ))
}

/// Decode the protected header of a compact JWE without decrypting it
pub(crate) fn peek_header(token: &str) -> JoseResult<JoseHeader> {
    let header_b64 = token
        .split('.')
        .next()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| JoseError::format("JWE has no header"))?;
    let header_json = b64_decode(header_b64, "header")?;
    serde_json::from_slice(&header_json)
        .map_err(|e| JoseError::format(format!("header is not a JOSE header: {e}")))
}

/// Decrypt a compact JWE produced by [`encrypt`]
pub(crate) fn decrypt(token: &str, secret: &Jwk) -> JoseResult<Vec<u8>> {
    let parts: Vec<&str> = token.split('.').collect();
    let [header_b64, wrapped_b64, iv_b64, ciphertext_b64, tag_b64] = parts.as_slice() else {
        return Err(JoseError::format("JWE must have 5 segments"));
    };

    let header = peek_header(token)?;
    ensure_algorithms(&header)?;
    let kek = key_encryption_key(secret)?;

    let wrapped = b64_decode(wrapped_b64, "encrypted key")?;
    let iv = b64_decode(iv_b64, "iv")?;
    let mut sealed = b64_decode(ciphertext_b64, "ciphertext")?;
    let tag = b64_decode(tag_b64, "tag")?;
    if iv.len() != IV_LEN || tag.len() != TAG_LEN || wrapped.len() != WRAPPED_LEN {
        return Err(JoseError::format("JWE key, iv or tag has the wrong length"));
    }

    let mut cek = Zeroizing::new([0u8; KEY_LEN]);
    kek.unwrap(&wrapped, cek.as_mut())
        .map_err(|_| JoseError::decryption("content key unwrap failed"))?;
    let cipher = Aes128Gcm::new_from_slice(cek.as_ref())
        .map_err(|_| JoseError::decryption("content key length"))?;

    sealed.extend_from_slice(&tag);
    cipher
        .decrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: &sealed,
                aad: header_b64.as_bytes(),
            },
        )
        .map_err(|_| JoseError::decryption("authentication tag mismatch"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_length_follows_bits() {
        let secret = generate_secret(128).unwrap();
        let k = b64_decode(secret.k.as_deref().unwrap(), "k").unwrap();
        assert_eq!(k.len(), 16);
        assert!(generate_secret(0).is_err());
        assert!(generate_secret(100).is_err());
    }

    #[test]
    fn encrypt_then_decrypt() {
        let secret = generate_secret(128).unwrap();
        let token = encrypt(&JoseHeader::jwe("kid-1"), "héllo wörld".as_bytes(), &secret).unwrap();

        assert_eq!(token.split('.').count(), 5);
        assert_eq!(decrypt(&token, &secret).unwrap(), "héllo wörld".as_bytes());
        assert_eq!(peek_header(&token).unwrap().kid.as_deref(), Some("kid-1"));
    }

    #[test]
    fn ciphertexts_are_randomized() {
        let secret = generate_secret(128).unwrap();
        let header = JoseHeader::jwe("kid-1");
        let a = encrypt(&header, b"same", &secret).unwrap();
        let b = encrypt(&header, b"same", &secret).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails() {
        let token = encrypt(&JoseHeader::jwe("kid-1"), b"data", &generate_secret(128).unwrap()).unwrap();
        let other = generate_secret(128).unwrap();
        assert!(matches!(decrypt(&token, &other), Err(JoseError::Decryption(_))));
    }

    #[test]
    fn tampered_header_fails_authentication() {
        let secret = generate_secret(128).unwrap();
        let token = encrypt(&JoseHeader::jwe("kid-1"), b"data", &secret).unwrap();
        let forged_header = b64_encode(serde_json::to_vec(&JoseHeader::jwe("kid-2")).unwrap());
        let rest = token.split_once('.').unwrap().1;
        let forged = format!("{forged_header}.{rest}");
        assert!(matches!(decrypt(&forged, &secret), Err(JoseError::Decryption(_))));
    }

    #[test]
    fn structural_errors() {
        let secret = generate_secret(128).unwrap();
        assert!(matches!(decrypt("a.b.c", &secret), Err(JoseError::Format(_))));
        assert!(matches!(decrypt("", &secret), Err(JoseError::Format(_))));
        let signing = Jwk::ec_public("x".into(), "y".into());
        let token = encrypt(&JoseHeader::jwe("kid-1"), b"data", &secret).unwrap();
        assert!(matches!(decrypt(&token, &signing), Err(JoseError::InvalidKey(_))));
    }
}
