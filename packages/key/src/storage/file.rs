//! Directory-backed key storage
//!
//! Layout under the root directory:
//! - `<kid>.json`: one record per key set
//! - `latest`: the id of the most recently created record
//!
//! Writes go to a temporary file first and are renamed into place. On Unix
//! the directory is `0700` and files are `0600`.

use super::KeyStorage;
use crate::{
    error::{KeyError, Result},
    kid::is_valid_kid,
    record::KeyRecord,
};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

const LATEST_FILE: &str = "latest";
const RECORD_EXT: &str = "json";

/// Key storage persisting one JSON file per key set
#[derive(Debug, Clone)]
pub struct FileKeyStorage {
    root: PathBuf,
}

impl FileKeyStorage {
    /// Store rooted at `root`; the directory is created on first save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    // Ids become file names, so only well-formed kids are accepted
    fn record_path(&self, id: &str) -> Result<PathBuf> {
        if !is_valid_kid(id) {
            return Err(KeyError::InvalidKid(id.to_string()));
        }
        Ok(self.root.join(format!("{id}.{RECORD_EXT}")))
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            KeyError::storage(format!(
                "failed to create directory {}: {e}",
                self.root.display()
            ))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o700);
            if let Err(e) = fs::set_permissions(&self.root, perms) {
                log::warn!("Failed to set key directory permissions: {e}");
            }
        }
        Ok(())
    }

    fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents).map_err(|e| {
            KeyError::storage(format!("failed to write {}: {e}", temp_path.display()))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            if let Err(e) = fs::set_permissions(&temp_path, perms) {
                log::warn!("Failed to set key file permissions: {e}");
            }
        }

        fs::rename(&temp_path, path).map_err(|e| {
            KeyError::storage(format!(
                "failed to rename {} to {}: {e}",
                temp_path.display(),
                path.display()
            ))
        })
    }

    fn latest_id(&self) -> Result<String> {
        match fs::read_to_string(self.root.join(LATEST_FILE)) {
            Ok(id) => Ok(id.trim().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(KeyError::not_found(None)),
            Err(e) => Err(KeyError::storage(format!("failed to read latest pointer: {e}"))),
        }
    }
}

impl KeyStorage for FileKeyStorage {
    fn save(&self, id: &str, record: &KeyRecord) -> Result<()> {
        let path = self.record_path(id)?;
        self.ensure_root()?;

        let created = !path.exists();
        let json = serde_json::to_vec_pretty(record)
            .map_err(|e| KeyError::InvalidRecord(e.to_string()))?;
        Self::write_atomic(&path, &json)?;

        if created {
            // a record without the pointer would never become the latest
            if let Err(e) = Self::write_atomic(&self.root.join(LATEST_FILE), id.as_bytes()) {
                if let Err(remove_err) = fs::remove_file(&path) {
                    log::warn!("Failed to remove {}: {remove_err}", path.display());
                }
                return Err(e);
            }
        }
        log::info!("Key set {id} saved to {}", self.root.display());
        Ok(())
    }

    fn load(&self, id: Option<&str>) -> Result<(String, KeyRecord)> {
        let id = match id {
            Some(id) => id.to_string(),
            None => self.latest_id()?,
        };
        let path = self.record_path(&id)?;

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(KeyError::not_found(Some(&id)));
            }
            Err(e) => {
                return Err(KeyError::storage(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        let record = serde_json::from_slice(&bytes)
            .map_err(|e| KeyError::InvalidRecord(format!("{}: {e}", path.display())))?;

        log::debug!("Loaded key set {id} from {}", self.root.display());
        Ok((id, record))
    }
}
