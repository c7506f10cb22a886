//! Persisted key set record and the resident key set value

use kidset_jose::Jwk;
use serde::{Deserialize, Serialize};

/// Key material of a stored record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordKeys {
    /// EC P-256 private signing key
    pub private: Jwk,
    /// EC P-256 public verification key
    pub public: Jwk,
    /// Symmetric payload encryption key
    pub secret: Jwk,
}

/// What storage persists under a key set id:
/// `{"keys": {"private": .., "public": .., "secret": ..}, "counter": n}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Key material
    pub keys: RecordKeys,
    /// Tokens issued under this key set
    pub counter: u64,
}

/// A signing pair, a symmetric secret and a usage counter under one id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySet {
    id: String,
    keys: RecordKeys,
    counter: u64,
    dirty: bool,
}

impl KeySet {
    /// Freshly generated key set: counter 0, not yet persisted
    pub(crate) fn generated(id: String, keys: RecordKeys) -> Self {
        Self {
            id,
            keys,
            counter: 0,
            dirty: true,
        }
    }

    /// Key set read back from storage
    pub(crate) fn from_record(id: String, record: KeyRecord) -> Self {
        Self {
            id,
            keys: record.keys,
            counter: record.counter,
            dirty: false,
        }
    }

    /// Snapshot to hand to storage
    pub fn to_record(&self) -> KeyRecord {
        KeyRecord {
            keys: self.keys.clone(),
            counter: self.counter,
        }
    }

    /// Key set id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Private signing key
    pub fn private_key(&self) -> &Jwk {
        &self.keys.private
    }

    /// Public verification key
    pub fn public_key(&self) -> &Jwk {
        &self.keys.public
    }

    /// Symmetric secret
    pub fn secret_key(&self) -> &Jwk {
        &self.keys.secret
    }

    /// Tokens issued so far
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Generated but not yet persisted
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn increment(&mut self) -> u64 {
        self.counter = self.counter.saturating_add(1);
        self.counter
    }
}
