//! Tests for the key set lifecycle against both bundled storage backends

use kidset_jose::JoseCrypto;
use kidset_key::*;
use std::sync::Arc;

#[test]
fn test_generated_ids_are_distinct() {
    let mut manager = KeySetManager::new(MemoryKeyStorage::new(), JoseCrypto::new());
    manager.generate_keys().unwrap();
    let first = manager.kid().map(str::to_string);
    manager.generate_keys().unwrap();
    let second = manager.kid().map(str::to_string);

    assert_ne!(first, second);
    assert!(second.as_deref().is_some_and(is_valid_kid));
    assert_eq!(manager.counter(), Some(0));
}

#[test]
fn test_round_trip_through_fresh_manager() {
    let storage = Arc::new(MemoryKeyStorage::new());

    let mut writer = KeySetManager::new(Arc::clone(&storage), JoseCrypto::new());
    writer.generate_keys().unwrap();
    writer.save_keys().unwrap();
    let generated = writer.keyset().cloned().unwrap();

    let mut reader = KeySetManager::new(Arc::clone(&storage), JoseCrypto::new());
    reader.load_keys(Some(generated.id())).unwrap();

    assert_eq!(reader.public_key(), Some(generated.public_key()));
    assert_eq!(reader.private_key(), Some(generated.private_key()));
    assert_eq!(reader.secret_key(), Some(generated.secret_key()));
    assert_eq!(reader.counter(), Some(0));
    assert!(!reader.is_dirty());
}

#[test]
fn test_save_after_load_is_rejected() {
    let storage = Arc::new(MemoryKeyStorage::new());
    let mut writer = KeySetManager::new(Arc::clone(&storage), JoseCrypto::new());
    writer.generate_keys().unwrap();
    writer.save_keys().unwrap();

    let mut reader = KeySetManager::new(storage, JoseCrypto::new());
    reader.load_keys(None).unwrap();
    assert!(matches!(reader.save_keys(), Err(KeyError::KeysNotGenerated)));
}

#[test]
fn test_latest_follows_creation_order() {
    let storage = Arc::new(MemoryKeyStorage::new());
    let mut manager = KeySetManager::new(Arc::clone(&storage), JoseCrypto::new());

    manager.generate_keys().unwrap();
    manager.save_keys().unwrap();
    let older = manager.kid().map(str::to_string);

    manager.generate_keys().unwrap();
    manager.save_keys().unwrap();
    let newer = manager.kid().map(str::to_string);

    // persisting the older set's counter must not make it the latest
    manager.load_keys(older.as_deref()).unwrap();
    manager.increment_counter();
    manager.store_counter().unwrap();

    let mut fresh = KeySetManager::new(storage, JoseCrypto::new());
    fresh.ensure_loaded().unwrap();
    assert_eq!(fresh.kid().map(str::to_string), newer);
}

#[test]
fn test_file_storage_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    let mut writer = KeySetManager::new(FileKeyStorage::new(dir.path()), JoseCrypto::new());
    writer.generate_keys().unwrap();
    writer.save_keys().unwrap();
    writer.increment_counter();
    writer.increment_counter();
    writer.store_counter().unwrap();
    let kid = writer.kid().map(str::to_string);

    let mut reader = KeySetManager::new(FileKeyStorage::new(dir.path()), JoseCrypto::new());
    reader.load_keys(None).unwrap();

    assert_eq!(reader.kid().map(str::to_string), kid);
    assert_eq!(reader.counter(), Some(2));
    assert_eq!(reader.secret_key(), writer.secret_key());
}

#[test]
fn test_ensure_loaded_on_empty_storage() {
    let mut manager = KeySetManager::new(MemoryKeyStorage::new(), JoseCrypto::new());
    assert!(matches!(
        manager.ensure_loaded(),
        Err(KeyError::KeyNotFound(_))
    ));
}
