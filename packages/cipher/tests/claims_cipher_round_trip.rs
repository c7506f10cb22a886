//! Round-trip and key selection tests for the claims cipher

use kidset_cipher::*;
use kidset_jose::JoseCrypto;
use kidset_key::{KeyError, KeySetManager, MemoryKeyStorage};
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn provisioned() -> (Arc<MemoryKeyStorage>, String) {
    let storage = Arc::new(MemoryKeyStorage::new());
    let mut admin = KeySetManager::new(Arc::clone(&storage), JoseCrypto::new());
    admin.generate_keys().unwrap();
    admin.save_keys().unwrap();
    let kid = admin.kid().unwrap().to_string();
    (storage, kid)
}

#[test]
fn test_empty_and_non_ascii_strings() {
    let (storage, _) = provisioned();
    let mut manager = KeySetManager::new(storage, JoseCrypto::new());
    let mut cipher = ClaimsCipher::new(&mut manager);

    for plaintext in ["", "plain ascii", "žluťoučký kůň", "日本語 🚀"] {
        let ciphertext = cipher.encrypt(plaintext, None).unwrap();
        assert_eq!(ciphertext.split('.').count(), 5);
        assert_eq!(cipher.decrypt(&ciphertext, None).unwrap(), plaintext);
    }
}

#[test]
fn test_value_entry_points_round_trip() {
    let (storage, _) = provisioned();
    let mut manager = KeySetManager::new(storage, JoseCrypto::new());
    let mut cipher = ClaimsCipher::new(&mut manager);

    let ciphertext = cipher.encrypt_value(&json!("secret claim"), None).unwrap();
    let plaintext = cipher.decrypt_value(&json!(ciphertext), None).unwrap();
    assert_eq!(plaintext, "secret claim");
}

#[test]
fn test_explicit_kid_selects_older_key_set() {
    let (storage, old_kid) = provisioned();
    let mut manager = KeySetManager::new(Arc::clone(&storage), JoseCrypto::new());
    let ciphertext = ClaimsCipher::new(&mut manager)
        .encrypt("payload", Some(&old_kid))
        .unwrap();

    let mut admin = KeySetManager::new(Arc::clone(&storage), JoseCrypto::new());
    admin.generate_keys().unwrap();
    admin.save_keys().unwrap();

    // the latest key set cannot open it, the named one can
    let mut fresh = KeySetManager::new(Arc::clone(&storage), JoseCrypto::new());
    let mut cipher = ClaimsCipher::new(&mut fresh);
    assert!(matches!(
        cipher.decrypt(&ciphertext, None),
        Err(CipherError::Decryption(_))
    ));
    assert_eq!(cipher.decrypt(&ciphertext, Some(&old_kid)).unwrap(), "payload");
}

#[test]
fn test_unknown_kid_is_not_found() {
    let (storage, _) = provisioned();
    let mut manager = KeySetManager::new(storage, JoseCrypto::new());
    let result = ClaimsCipher::new(&mut manager).encrypt("x", Some(&kidset_key::new_kid()));
    assert!(matches!(
        result,
        Err(CipherError::Key(KeyError::KeyNotFound(_)))
    ));
}

#[test]
fn test_empty_store_has_nothing_to_encrypt_with() {
    let mut manager = KeySetManager::new(MemoryKeyStorage::new(), JoseCrypto::new());
    let mut cipher = ClaimsCipher::new(&mut manager);
    assert!(matches!(
        cipher.encrypt("x", None),
        Err(CipherError::Key(KeyError::KeyNotFound(_)))
    ));
    assert!(matches!(
        cipher.decrypt("a.b.c.d.e", None),
        Err(CipherError::Key(KeyError::KeyNotFound(_)))
    ));
}

#[test]
fn test_storage_outage_surfaces_as_key_error() {
    let (storage, kid) = provisioned();
    storage.set_unavailable(true);
    let mut manager = KeySetManager::new(Arc::clone(&storage), JoseCrypto::new());
    let mut cipher = ClaimsCipher::new(&mut manager);

    assert!(matches!(
        cipher.encrypt("x", None),
        Err(CipherError::Key(KeyError::StorageUnavailable(_)))
    ));
    assert!(matches!(
        cipher.decrypt("a.b.c.d.e", Some(&kid)),
        Err(CipherError::Key(KeyError::StorageUnavailable(_)))
    ));

    storage.set_unavailable(false);
    let ciphertext = cipher.encrypt("x", Some(&kid)).unwrap();
    assert_eq!(cipher.decrypt(&ciphertext, None).unwrap(), "x");
}

proptest! {
    #[test]
    fn test_decrypt_inverts_encrypt(plaintext in any::<String>()) {
        let (storage, _) = provisioned();
        let mut manager = KeySetManager::new(storage, JoseCrypto::new());
        let mut cipher = ClaimsCipher::new(&mut manager);

        let ciphertext = cipher.encrypt(&plaintext, None).unwrap();
        prop_assert_eq!(cipher.decrypt(&ciphertext, None).unwrap(), plaintext);
    }
}
