//! # kidset key management
//!
//! Lifecycle of a key set: an ES256 signing pair, a symmetric payload
//! secret and a usage counter stored under a random identifier.
//!
//! ```rust,ignore
//! use kidset_jose::JoseCrypto;
//! use kidset_key::{KeySetManager, MemoryKeyStorage};
//!
//! let mut manager = KeySetManager::new(MemoryKeyStorage::new(), JoseCrypto::new());
//! manager.generate_keys()?;
//! manager.save_keys()?;
//! println!("active key set: {:?}", manager.kid());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod kid;
pub mod manager;
pub mod record;
pub mod storage;

pub use error::{KeyError, Result};
pub use kid::{is_valid_kid, new_kid};
pub use manager::{KeySetManager, SECRET_BITS};
pub use record::{KeyRecord, KeySet, RecordKeys};
pub use storage::{FileKeyStorage, KeyStorage, MemoryKeyStorage};
