//! Key storage capability and the bundled backends

mod file;
mod memory;

pub use file::FileKeyStorage;
pub use memory::MemoryKeyStorage;

use crate::{error::Result, record::KeyRecord};
use std::sync::Arc;

/// Persists and retrieves key set records by id
pub trait KeyStorage: Send + Sync {
    /// Insert or replace the record stored under `id`
    ///
    /// Fails with `StorageUnavailable` when the backend fails.
    fn save(&self, id: &str, record: &KeyRecord) -> Result<()>;

    /// Fetch the record stored under `id`, or the most recently created
    /// record when `id` is `None`
    ///
    /// Fails with `KeyNotFound` when no matching record exists.
    fn load(&self, id: Option<&str>) -> Result<(String, KeyRecord)>;
}

impl<T: KeyStorage + ?Sized> KeyStorage for Arc<T> {
    fn save(&self, id: &str, record: &KeyRecord) -> Result<()> {
        (**self).save(id, record)
    }

    fn load(&self, id: Option<&str>) -> Result<(String, KeyRecord)> {
        (**self).load(id)
    }
}

impl<T: KeyStorage + ?Sized> KeyStorage for &T {
    fn save(&self, id: &str, record: &KeyRecord) -> Result<()> {
        (**self).save(id, record)
    }

    fn load(&self, id: Option<&str>) -> Result<(String, KeyRecord)> {
        (**self).load(id)
    }
}
