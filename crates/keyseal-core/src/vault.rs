use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use rand::RngCore;
use thiserror::Error;

/// Number of random bytes behind each generated entry name. At 8 bytes the
/// chance of two names colliding is negligible even under heavy concurrent
/// use, so no existence check is performed before a write.
pub const NAME_ENTROPY_BYTES: usize = 8;

/// Errors produced by vault implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VaultError {
    /// Requested entry does not exist.
    #[error("entry not found: {name}")]
    NotFound { name: String },
    /// Underlying storage failure (permissions, disk full, invalid path).
    #[error("storage failure: {reason}")]
    Io { reason: String },
}

/// Contract for persisting text payloads under caller-chosen names.
///
/// Implementations create the entry on `write` without checking whether it
/// already exists; callers are expected to pick names via
/// [`unique_entry_name`] so collisions are practically impossible.
pub trait Vault: Send + Sync {
    /// Persist a text payload under a name, overwriting any existing entry.
    fn write(&self, name: &str, payload: &str) -> Result<(), VaultError>;

    /// Retrieve the payload stored under a name.
    fn read(&self, name: &str) -> Result<String, VaultError>;
}

/// Derive a collision-resistant entry name from fresh randomness:
/// `<prefix>_<hex>.txt`, where the hex suffix encodes
/// [`NAME_ENTROPY_BYTES`] bytes drawn from `rng`.
pub fn unique_entry_name<R: RngCore>(rng: &mut R, prefix: &str) -> String {
    let mut suffix = [0u8; NAME_ENTROPY_BYTES];
    rng.fill_bytes(&mut suffix);
    format!("{prefix}_{}.txt", hex::encode(suffix))
}

/// In-memory vault for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct InMemoryVault {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Vault for InMemoryVault {
    fn write(&self, name: &str, payload: &str) -> Result<(), VaultError> {
        let mut map = self.inner.lock().map_err(|err| VaultError::Io {
            reason: format!("lock poisoned: {err}"),
        })?;
        map.insert(name.to_string(), payload.to_string());
        Ok(())
    }

    fn read(&self, name: &str) -> Result<String, VaultError> {
        let map = self.inner.lock().map_err(|err| VaultError::Io {
            reason: format!("lock poisoned: {err}"),
        })?;
        map.get(name).cloned().ok_or_else(|| VaultError::NotFound {
            name: name.to_string(),
        })
    }
}
