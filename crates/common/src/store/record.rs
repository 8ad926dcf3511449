use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::collection::is_record_file;
use super::naming::{new_id, validate_identifier};
use super::{Document, DocumentStore, StoreError, CONFIG_FILE, JSON_EXTENSION};
use crate::fs::{read_json, write_json_atomic};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub body: Document,
}

impl DocumentStore {
    /// Store `body` under a freshly generated id and return the id.
    ///
    /// The collection directory is created if it does not exist yet.
    pub fn create_record(&self, collection: &str, body: &Document) -> Result<String, StoreError> {
        let _layout = self.layout.read();
        let dir = self.collection_dir(collection)?;
        let lock = self.collection_lock(collection);
        let _guard = lock.lock();

        self.ensure_collection_dir(collection, &dir)?;
        let id = new_id();
        write_json_atomic(&record_file(&dir, &id), body)?;

        tracing::info!(collection, record = %id, "record created");
        Ok(id)
    }

    pub fn read_record(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        let _layout = self.layout.read();
        let path = self.record_path(collection, id)?;

        match read_json::<Value>(&path)? {
            Some(Value::Object(body)) => {
                tracing::debug!(collection, record = id, "record read");
                Ok(body)
            }
            Some(_) => Err(StoreError::InvalidFormat(format!(
                "record {id} is not a JSON object"
            ))),
            None => Err(StoreError::RecordNotFound(id.to_string())),
        }
    }

    /// Overwrite an existing record with `body`. No merging.
    pub fn update_record(
        &self,
        collection: &str,
        id: &str,
        body: &Document,
    ) -> Result<(), StoreError> {
        let _layout = self.layout.read();
        let path = self.record_path(collection, id)?;
        let lock = self.collection_lock(collection);
        let _guard = lock.lock();

        if !path.is_file() {
            return Err(StoreError::RecordNotFound(id.to_string()));
        }
        write_json_atomic(&path, body)?;

        tracing::info!(collection, record = id, "record updated");
        Ok(())
    }

    pub fn delete_record(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let _layout = self.layout.read();
        let path = self.record_path(collection, id)?;
        let lock = self.collection_lock(collection);
        let _guard = lock.lock();

        fs::remove_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::RecordNotFound(id.to_string()),
            _ => StoreError::Io(e),
        })?;

        tracing::info!(collection, record = id, "record deleted");
        Ok(())
    }

    /// Lazily iterate the records of a collection.
    ///
    /// Fails only if the collection directory itself cannot be read. Record
    /// files that vanish, cannot be opened, or do not hold a JSON object are
    /// skipped rather than failing the listing.
    pub fn list_records(&self, collection: &str) -> Result<Records, StoreError> {
        let _layout = self.layout.read();
        let dir = self.existing_collection_dir(collection)?;

        let entries = fs::read_dir(&dir).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::CollectionNotFound(collection.to_string()),
            _ => StoreError::Io(e),
        })?;

        Ok(Records {
            collection: collection.to_string(),
            entries,
        })
    }

    fn record_path(&self, collection: &str, id: &str) -> Result<PathBuf, StoreError> {
        let dir = self.collection_dir(collection)?;
        validate_identifier(id)?;
        if format!("{id}.{JSON_EXTENSION}") == CONFIG_FILE || !dir.is_dir() {
            return Err(StoreError::RecordNotFound(id.to_string()));
        }
        Ok(record_file(&dir, id))
    }
}

fn record_file(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.{JSON_EXTENSION}"))
}

/// Iterator over the parseable records of one collection.
#[derive(Debug)]
pub struct Records {
    collection: String,
    entries: fs::ReadDir,
}

impl Records {
    fn load(&self, entry: &fs::DirEntry) -> Option<Record> {
        match is_record_file(entry) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                tracing::warn!(collection = %self.collection, "skipping unreadable entry: {}", e);
                return None;
            }
        }

        let path = entry.path();
        let id = path.file_stem()?.to_str()?.to_string();

        match read_json::<Value>(&path) {
            Ok(Some(Value::Object(body))) => Some(Record { id, body }),
            Ok(Some(_)) => {
                tracing::warn!(collection = %self.collection, record = %id, "skipping non-object record");
                None
            }
            // removed between readdir and open
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(collection = %self.collection, record = %id, "skipping unreadable record: {}", e);
                None
            }
        }
    }
}

impl Iterator for Records {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(collection = %self.collection, "skipping directory entry: {}", e);
                    continue;
                }
            };
            if let Some(record) = self.load(&entry) {
                return Some(record);
            }
        }
    }
}
