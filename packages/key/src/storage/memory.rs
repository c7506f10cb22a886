//! In-process key storage

use super::KeyStorage;
use crate::{
    error::{KeyError, Result},
    record::KeyRecord,
};
use std::{
    collections::HashMap,
    sync::{
        RwLock,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

#[derive(Debug, Default)]
struct Records {
    by_id: HashMap<String, KeyRecord>,
    // creation order; re-saving an id keeps its position
    order: Vec<String>,
}

/// Key storage held in memory
///
/// "Latest" is the most recently created record. The outage switch makes
/// every call fail with `StorageUnavailable`, which lets callers exercise
/// their backend-failure paths.
#[derive(Debug, Default)]
pub struct MemoryKeyStorage {
    records: RwLock<Records>,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryKeyStorage {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a backend outage (or end one)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `save`/`load` calls received, including failed ones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.by_id.len()).unwrap_or(0)
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(KeyError::storage("memory store is offline"));
        }
        Ok(())
    }
}

impl KeyStorage for MemoryKeyStorage {
    fn save(&self, id: &str, record: &KeyRecord) -> Result<()> {
        self.check_available()?;
        let mut records = self
            .records
            .write()
            .map_err(|_| KeyError::storage("memory store lock poisoned"))?;
        if records.by_id.insert(id.to_string(), record.clone()).is_none() {
            records.order.push(id.to_string());
        }
        log::debug!("Stored key set {id} in memory");
        Ok(())
    }

    fn load(&self, id: Option<&str>) -> Result<(String, KeyRecord)> {
        self.check_available()?;
        let records = self
            .records
            .read()
            .map_err(|_| KeyError::storage("memory store lock poisoned"))?;
        let id = match id {
            Some(id) => id,
            None => records
                .order
                .last()
                .map(String::as_str)
                .ok_or_else(|| KeyError::not_found(None))?,
        };
        records
            .by_id
            .get(id)
            .map(|record| (id.to_string(), record.clone()))
            .ok_or_else(|| KeyError::not_found(Some(id)))
    }
}
