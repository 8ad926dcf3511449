use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::fs::{read_json, write_json_atomic, FsError};

/// A registered user. Serialized field names match the on-disk layout.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "identity")]
    pub handle: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(rename = "name", default)]
    pub display_name: String,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("handle", &self.handle)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

/// handle -> identity
pub type Identities = BTreeMap<String, Identity>;

/// Identities persisted as one JSON file, rewritten whole on every change.
#[derive(Debug)]
pub struct IdentityStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl IdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every identity. A missing file is an error.
    pub fn load(&self) -> Result<Identities, AuthError> {
        read_json(&self.path)?.ok_or(AuthError::MissingIdentityFile)
    }

    /// Load every identity, treating a missing file as an empty set.
    pub fn load_or_default(&self) -> Result<Identities, AuthError> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    pub fn get(&self, handle: &str) -> Result<Option<Identity>, AuthError> {
        Ok(self.load()?.remove(handle))
    }

    pub fn is_empty(&self) -> Result<bool, AuthError> {
        Ok(self.load_or_default()?.is_empty())
    }

    /// Atomically replace the whole identity file.
    pub fn save(&self, identities: &Identities) -> Result<(), AuthError> {
        let _guard = self.lock.lock();
        self.write(identities)
    }

    /// Add `identity`, failing if its handle is already taken.
    pub fn insert(&self, identity: Identity) -> Result<(), AuthError> {
        let _guard = self.lock.lock();

        let mut identities = self.load_or_default()?;
        if identities.contains_key(&identity.handle) {
            return Err(AuthError::IdentityExists(identity.handle));
        }
        let handle = identity.handle.clone();
        identities.insert(handle.clone(), identity);
        self.write(&identities)?;

        tracing::info!(identity = %handle, "identity registered");
        Ok(())
    }

    fn write(&self, identities: &Identities) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(FsError::from)?;
        }
        write_json_atomic(&self.path, identities)?;
        Ok(())
    }
}
