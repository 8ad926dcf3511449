//! Filesystem-backed document store
//!
//! Layout under the storage root:
//!
//! ```text
//! <root>/
//!   <collection-id>/
//!     config.json        collection config (name, slug, timestamps, ...)
//!     <record-id>.json   one JSON object per record
//! ```
//!
//! Every operation is synchronous, blocking I/O. Structural changes to the
//! root (collection create, rename, delete) hold the layout lock exclusively;
//! everything else holds it shared, and writes inside a collection also hold
//! that collection's mutex. Readers never see a torn file because all writes
//! go through [`crate::fs::write_json_atomic`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::ErrorKind;
use crate::fs::FsError;

mod collection;
mod naming;
mod record;

pub use collection::CollectionInfo;
pub use naming::{slugify, validate_identifier};
pub use record::{Record, Records};

/// Name of the per-collection config document
pub const CONFIG_FILE: &str = "config.json";
/// Extension shared by record files and the config document
pub const JSON_EXTENSION: &str = "json";
/// chrono format of the `created` stamp, e.g. `24.12.2025 18:30`
pub const CREATED_FORMAT: &str = "%d.%m.%Y %H:%M";
/// chrono format of the `updated` stamp, e.g. `24.12.2025 18:30:05`
pub const UPDATED_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// A stored JSON object. Field order is not preserved.
pub type Document = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("collection not found: {0}")]
    CollectionNotFound(String),
    #[error("record not found: {0}")]
    RecordNotFound(String),
    #[error("collection already exists: {0}")]
    AlreadyExists(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("storage unavailable: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::CollectionNotFound(_) | StoreError::RecordNotFound(_) => {
                ErrorKind::NotFound
            }
            StoreError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            StoreError::InvalidFormat(_) => ErrorKind::InvalidFormat,
            StoreError::InvalidName(_) => ErrorKind::InvalidName,
            StoreError::Io(_) => ErrorKind::StorageUnavailable,
        }
    }
}

impl From<FsError> for StoreError {
    fn from(err: FsError) -> Self {
        match err {
            FsError::Io(e) => StoreError::Io(e),
            FsError::Json(e) => StoreError::InvalidFormat(e.to_string()),
        }
    }
}

/// Collections and records rooted at a single directory.
#[derive(Debug)]
pub struct DocumentStore {
    root: PathBuf,
    layout: RwLock<()>,
    collection_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DocumentStore {
    /// Open the store at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "document store opened");
        Ok(Self {
            root,
            layout: RwLock::new(()),
            collection_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf, StoreError> {
        validate_identifier(collection)?;
        Ok(self.root.join(collection))
    }

    /// Directory of a collection that must already exist. Anything at that
    /// path other than a directory counts as absent.
    fn existing_collection_dir(&self, collection: &str) -> Result<PathBuf, StoreError> {
        let dir = self.collection_dir(collection)?;
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(StoreError::CollectionNotFound(collection.to_string()))
        }
    }

    /// Create the directory of `collection` if needed. A non-directory
    /// already holding the name is a conflict.
    fn ensure_collection_dir(&self, collection: &str, dir: &Path) -> Result<(), StoreError> {
        match std::fs::metadata(dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StoreError::AlreadyExists(collection.to_string())),
            Err(_) => Ok(std::fs::create_dir_all(dir)?),
        }
    }

    fn collection_lock(&self, collection: &str) -> Arc<Mutex<()>> {
        self.collection_locks
            .lock()
            .entry(collection.to_string())
            .or_default()
            .clone()
    }

    /// Drop the mutex of a collection that no longer exists under that name.
    /// Only called with the layout lock held exclusively.
    fn forget_collection_lock(&self, collection: &str) {
        self.collection_locks.lock().remove(collection);
    }
}

pub(crate) fn timestamp(format: &str) -> String {
    chrono::Local::now().format(format).to_string()
}
