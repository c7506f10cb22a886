//! Key set lifecycle: generate, save, load

use crate::{
    error::{KeyError, Result},
    kid::new_kid,
    record::{KeyRecord, KeySet, RecordKeys},
    storage::KeyStorage,
};
use kidset_common::LoggingTransformer;
use kidset_jose::{CryptoProvider, Jwk, KeyType};

/// Size of the symmetric payload secret
pub const SECRET_BITS: usize = 128;

/// Owns at most one resident key set and moves it through its lifecycle
///
/// ```text
/// (empty) --generate--> dirty --save--> clean
///    \                                    ^
///     `-------------- load ---------------'
/// ```
///
/// Mutating operations take `&mut self`; share a manager across threads
/// only behind a lock.
#[derive(Debug)]
pub struct KeySetManager<S, C> {
    storage: S,
    crypto: C,
    resident: Option<KeySet>,
}

impl<S: KeyStorage, C: CryptoProvider> KeySetManager<S, C> {
    /// Manager over the given storage and crypto capabilities, with nothing resident
    pub fn new(storage: S, crypto: C) -> Self {
        Self {
            storage,
            crypto,
            resident: None,
        }
    }

    /// Generate a new key set in memory and make it resident
    ///
    /// The new set is dirty until [`save_keys`](Self::save_keys). Provider
    /// failures surface as [`KeyError::KeyGeneration`].
    pub fn generate_keys(&mut self) -> Result<()> {
        let (private, public) = self
            .crypto
            .generate_signing_pair()
            .map_err(|e| KeyError::KeyGeneration(e.to_string()))?;
        let secret = self
            .crypto
            .generate_secret(SECRET_BITS)
            .map_err(|e| KeyError::KeyGeneration(e.to_string()))?;

        let id = new_kid();
        self.discard_unsaved("generate");
        LoggingTransformer::log_key_event("generate", &id, true);
        self.resident = Some(KeySet::generated(
            id,
            RecordKeys {
                private,
                public,
                secret,
            },
        ));
        Ok(())
    }

    /// Persist the freshly generated key set
    ///
    /// Only a dirty key set can be saved; anything else is
    /// [`KeyError::KeysNotGenerated`].
    pub fn save_keys(&mut self) -> Result<()> {
        let keyset = match self.resident.as_mut() {
            Some(keyset) if keyset.is_dirty() => keyset,
            _ => return Err(KeyError::KeysNotGenerated),
        };

        let result = self.storage.save(keyset.id(), &keyset.to_record());
        LoggingTransformer::log_key_event("save", keyset.id(), result.is_ok());
        result?;
        keyset.mark_saved();
        Ok(())
    }

    /// Replace the resident key set with the one stored under `id`, or the
    /// most recently created one when `id` is `None`
    ///
    /// On failure the resident key set is left as it was.
    pub fn load_keys(&mut self, id: Option<&str>) -> Result<()> {
        let (loaded_id, record) = match self.storage.load(id) {
            Ok(found) => found,
            Err(e) => {
                LoggingTransformer::log_key_event("load", id.unwrap_or("latest"), false);
                return Err(e);
            }
        };
        check_record(&loaded_id, &record)?;

        self.discard_unsaved("load");
        LoggingTransformer::log_key_event("load", &loaded_id, true);
        self.resident = Some(KeySet::from_record(loaded_id, record));
        Ok(())
    }

    /// Load the latest key set when nothing is resident
    pub fn ensure_loaded(&mut self) -> Result<()> {
        if self.resident.is_none() {
            self.load_keys(None)?;
        }
        Ok(())
    }

    /// Write the resident key set back to storage so its counter is durable
    pub fn store_counter(&mut self) -> Result<()> {
        let keyset = self.resident.as_ref().ok_or(KeyError::KeysNotGenerated)?;
        if keyset.is_dirty() {
            return Err(KeyError::KeysNotSaved);
        }
        self.storage.save(keyset.id(), &keyset.to_record())
    }

    /// Persist the resident set with its counter bumped, then bump it in memory
    ///
    /// The resident counter is left unchanged when the write fails.
    pub fn record_issuance(&mut self) -> Result<u64> {
        let keyset = self.resident.as_mut().ok_or(KeyError::KeysNotGenerated)?;
        if keyset.is_dirty() {
            return Err(KeyError::KeysNotSaved);
        }
        let mut record = keyset.to_record();
        record.counter = record.counter.saturating_add(1);
        self.storage.save(keyset.id(), &record)?;
        Ok(keyset.increment())
    }

    /// Bump the resident counter; `None` when nothing is resident
    pub fn increment_counter(&mut self) -> Option<u64> {
        self.resident.as_mut().map(KeySet::increment)
    }

    /// Resident key set
    pub fn keyset(&self) -> Option<&KeySet> {
        self.resident.as_ref()
    }

    /// Resident key set id
    pub fn kid(&self) -> Option<&str> {
        self.resident.as_ref().map(KeySet::id)
    }

    /// Resident public key
    pub fn public_key(&self) -> Option<&Jwk> {
        self.resident.as_ref().map(KeySet::public_key)
    }

    /// Resident private key
    pub fn private_key(&self) -> Option<&Jwk> {
        self.resident.as_ref().map(KeySet::private_key)
    }

    /// Resident symmetric secret
    pub fn secret_key(&self) -> Option<&Jwk> {
        self.resident.as_ref().map(KeySet::secret_key)
    }

    /// Resident counter
    pub fn counter(&self) -> Option<u64> {
        self.resident.as_ref().map(KeySet::counter)
    }

    /// Whether the resident key set was generated but not saved
    pub fn is_dirty(&self) -> bool {
        self.resident.as_ref().is_some_and(KeySet::is_dirty)
    }

    /// Crypto capability
    pub fn crypto(&self) -> &C {
        &self.crypto
    }

    /// Storage capability
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn discard_unsaved(&self, operation: &str) {
        if let Some(keyset) = self.resident.as_ref().filter(|k| k.is_dirty()) {
            log::warn!(
                "Discarding unsaved key set {} on {operation}",
                keyset.id()
            );
        }
    }
}

// Records come from outside the process; reject ones that cannot sign or encrypt
fn check_record(id: &str, record: &KeyRecord) -> Result<()> {
    let keys = &record.keys;
    let usable = keys.private.kty == KeyType::EC
        && keys.private.d.is_some()
        && keys.public.kty == KeyType::EC
        && keys.public.x.is_some()
        && keys.secret.kty == KeyType::Oct
        && keys.secret.k.is_some();
    if usable {
        Ok(())
    } else {
        Err(KeyError::InvalidRecord(format!(
            "key set {id} is missing key material"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyStorage;
    use kidset_jose::{Claims, JoseCrypto, JoseError, JoseHeader, JoseResult};

    struct BrokenCrypto;

    impl CryptoProvider for BrokenCrypto {
        fn generate_signing_pair(&self) -> JoseResult<(Jwk, Jwk)> {
            Err(JoseError::KeyGeneration("entropy source offline".into()))
        }
        fn generate_secret(&self, _bits: usize) -> JoseResult<Jwk> {
            Err(JoseError::KeyGeneration("entropy source offline".into()))
        }
        fn sign(&self, _: &JoseHeader, _: &Claims, _: &Jwk) -> JoseResult<String> {
            Err(JoseError::InvalidSignature)
        }
        fn verify(&self, _: &str, _: &Jwk) -> JoseResult<(JoseHeader, Claims)> {
            Err(JoseError::InvalidSignature)
        }
        fn encrypt_compact(&self, _: &JoseHeader, _: &[u8], _: &Jwk) -> JoseResult<String> {
            Err(JoseError::Encryption("offline".into()))
        }
        fn decrypt_compact(&self, _: &str, _: &Jwk) -> JoseResult<Vec<u8>> {
            Err(JoseError::decryption("offline"))
        }
    }

    fn manager() -> KeySetManager<MemoryKeyStorage, JoseCrypto> {
        KeySetManager::new(MemoryKeyStorage::new(), JoseCrypto::new())
    }

    #[test]
    fn accessors_are_absent_before_generate() {
        let manager = manager();
        assert!(manager.kid().is_none());
        assert!(manager.public_key().is_none());
        assert!(manager.private_key().is_none());
        assert!(manager.secret_key().is_none());
        assert!(manager.counter().is_none());
        assert!(!manager.is_dirty());
    }

    #[test]
    fn generate_populates_every_field() {
        let mut manager = manager();
        manager.generate_keys().unwrap();

        assert!(manager.kid().is_some());
        assert!(manager.private_key().is_some_and(Jwk::is_private));
        assert!(manager.public_key().is_some_and(|k| !k.is_private()));
        assert!(manager.secret_key().is_some_and(|k| k.kty == KeyType::Oct));
        assert_eq!(manager.counter(), Some(0));
        assert!(manager.is_dirty());
    }

    #[test]
    fn provider_failure_is_wrapped() {
        let mut manager = KeySetManager::new(MemoryKeyStorage::new(), BrokenCrypto);
        let err = manager.generate_keys().unwrap_err();
        assert!(matches!(err, KeyError::KeyGeneration(msg) if msg.contains("entropy")));
        assert!(manager.kid().is_none());
    }

    #[test]
    fn save_requires_a_generated_set() {
        let mut manager = manager();
        assert!(matches!(manager.save_keys(), Err(KeyError::KeysNotGenerated)));

        manager.generate_keys().unwrap();
        manager.save_keys().unwrap();
        assert!(!manager.is_dirty());
        // already saved
        assert!(matches!(manager.save_keys(), Err(KeyError::KeysNotGenerated)));
    }

    #[test]
    fn save_failure_keeps_set_dirty() {
        let mut manager = manager();
        manager.generate_keys().unwrap();
        manager.storage().set_unavailable(true);

        assert!(matches!(manager.save_keys(), Err(KeyError::StorageUnavailable(_))));
        assert!(manager.is_dirty());
    }

    #[test]
    fn failed_load_leaves_resident_set() {
        let mut manager = manager();
        manager.generate_keys().unwrap();
        manager.save_keys().unwrap();
        let kid = manager.kid().map(str::to_string);

        assert!(matches!(
            manager.load_keys(Some("missing")),
            Err(KeyError::KeyNotFound(_))
        ));
        assert_eq!(manager.kid().map(str::to_string), kid);

        manager.storage().set_unavailable(true);
        assert!(matches!(
            manager.load_keys(None),
            Err(KeyError::StorageUnavailable(_))
        ));
        assert_eq!(manager.kid().map(str::to_string), kid);
    }

    #[test]
    fn counter_is_persisted_on_store() {
        let mut manager = manager();
        assert_eq!(manager.increment_counter(), None);
        assert!(matches!(manager.store_counter(), Err(KeyError::KeysNotGenerated)));

        manager.generate_keys().unwrap();
        assert_eq!(manager.increment_counter(), Some(1));
        assert!(matches!(manager.store_counter(), Err(KeyError::KeysNotSaved)));

        manager.save_keys().unwrap();
        manager.increment_counter();
        manager.store_counter().unwrap();

        let (_, record) = manager.storage().load(manager.kid()).unwrap();
        assert_eq!(record.counter, 2);
    }

    #[test]
    fn failed_issuance_write_keeps_counter() {
        let mut manager = manager();
        assert!(matches!(manager.record_issuance(), Err(KeyError::KeysNotGenerated)));
        manager.generate_keys().unwrap();
        assert!(matches!(manager.record_issuance(), Err(KeyError::KeysNotSaved)));
        manager.save_keys().unwrap();

        manager.storage().set_unavailable(true);
        assert!(matches!(
            manager.record_issuance(),
            Err(KeyError::StorageUnavailable(_))
        ));
        assert_eq!(manager.counter(), Some(0));

        manager.storage().set_unavailable(false);
        assert_eq!(manager.record_issuance().unwrap(), 1);
        let (_, record) = manager.storage().load(manager.kid()).unwrap();
        assert_eq!(record.counter, 1);
    }

    #[test]
    fn incomplete_records_are_rejected() {
        let storage = MemoryKeyStorage::new();
        let mut record = {
            let mut m = KeySetManager::new(&storage, JoseCrypto::new());
            m.generate_keys().unwrap();
            m.keyset().map(KeySet::to_record).unwrap()
        };
        record.keys.private = record.keys.public.clone();
        storage.save("broken", &record).unwrap();

        let mut manager = KeySetManager::new(&storage, JoseCrypto::new());
        assert!(matches!(
            manager.load_keys(Some("broken")),
            Err(KeyError::InvalidRecord(_))
        ));
        assert!(manager.kid().is_none());
    }
}
