use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::naming::{new_id, slugify, validate_identifier};
use super::{
    timestamp, Document, DocumentStore, StoreError, CONFIG_FILE, CREATED_FORMAT, JSON_EXTENSION,
    UPDATED_FORMAT,
};
use crate::fs::{read_json, write_json_atomic};

/// A collection's config together with a live count of its records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub id: String,
    pub config: Document,
    pub count: usize,
}

impl DocumentStore {
    /// Create a collection under a freshly generated id.
    ///
    /// The config document starts out as `{name, slug, created}`.
    pub fn create_collection(&self, name: &str) -> Result<CollectionInfo, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidFormat(
                "collection name cannot be empty".into(),
            ));
        }

        let id = new_id();
        let _layout = self.layout.write();
        let dir = self.collection_dir(&id)?;

        fs::create_dir(&dir).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => StoreError::AlreadyExists(id.clone()),
            _ => StoreError::Io(e),
        })?;

        let mut config = Document::new();
        config.insert("name".into(), Value::String(name.to_string()));
        config.insert("slug".into(), Value::String(slugify(name)));
        config.insert("created".into(), Value::String(timestamp(CREATED_FORMAT)));

        if let Err(e) = write_json_atomic(&dir.join(CONFIG_FILE), &config) {
            tracing::error!(collection = %id, "failed to write collection config: {}", e);
            // a directory without a config is not a collection
            let _ = fs::remove_dir_all(&dir);
            return Err(e.into());
        }

        tracing::info!(collection = %id, name, "collection created");
        Ok(CollectionInfo {
            id,
            config,
            count: 0,
        })
    }

    pub fn get_collection(&self, collection: &str) -> Result<CollectionInfo, StoreError> {
        let _layout = self.layout.read();
        let dir = self.existing_collection_dir(collection)?;

        let config = match read_json::<Value>(&dir.join(CONFIG_FILE))? {
            Some(Value::Object(config)) => config,
            Some(_) => {
                return Err(StoreError::InvalidFormat(format!(
                    "config of collection {collection} is not a JSON object"
                )))
            }
            None => return Err(StoreError::CollectionNotFound(collection.to_string())),
        };
        let count = count_records(&dir)?;

        tracing::debug!(collection, count, "collection read");
        Ok(CollectionInfo {
            id: collection.to_string(),
            config,
            count,
        })
    }

    /// Identifiers of every collection under the root, sorted.
    pub fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        let _layout = self.layout.read();

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if validate_identifier(&name).is_ok() {
                ids.push(name);
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Replace a collection's config with `body`, stamped with `updated`.
    ///
    /// Acts as an upsert: the collection directory is created if it does
    /// not exist. `created` is kept from the previous config unless `body`
    /// carries its own.
    pub fn update_collection(
        &self,
        collection: &str,
        body: Document,
    ) -> Result<Document, StoreError> {
        let _layout = self.layout.read();
        let dir = self.collection_dir(collection)?;
        let lock = self.collection_lock(collection);
        let _guard = lock.lock();

        self.ensure_collection_dir(collection, &dir)?;
        let config_path = dir.join(CONFIG_FILE);

        let now = timestamp(UPDATED_FORMAT);
        let mut config = body;
        if !config.contains_key("created") {
            // an unreadable previous config is about to be replaced anyway
            let created = match read_json::<Value>(&config_path) {
                Ok(Some(Value::Object(previous))) => previous.get("created").cloned(),
                _ => None,
            };
            config.insert(
                "created".into(),
                created.unwrap_or_else(|| Value::String(now.clone())),
            );
        }
        config.insert("updated".into(), Value::String(now));

        write_json_atomic(&config_path, &config)?;
        tracing::info!(collection, "collection config updated");
        Ok(config)
    }

    /// Move a collection to a new identifier.
    pub fn rename_collection(&self, from: &str, to: &str) -> Result<(), StoreError> {
        let _layout = self.layout.write();
        let source = self.collection_dir(from)?;
        let target = self.collection_dir(to)?;

        if !source.is_dir() {
            return Err(StoreError::CollectionNotFound(from.to_string()));
        }
        if fs::symlink_metadata(&target).is_ok() {
            return Err(StoreError::AlreadyExists(to.to_string()));
        }

        fs::rename(&source, &target)?;
        self.forget_collection_lock(from);

        tracing::info!(from, to, "collection renamed");
        Ok(())
    }

    /// Remove a collection and every record in it. Not reversible.
    pub fn delete_collection(&self, collection: &str) -> Result<(), StoreError> {
        let _layout = self.layout.write();
        let dir = self.collection_dir(collection)?;

        if !dir.is_dir() {
            return Err(StoreError::CollectionNotFound(collection.to_string()));
        }

        fs::remove_dir_all(&dir)?;
        self.forget_collection_lock(collection);

        tracing::info!(collection, "collection deleted");
        Ok(())
    }
}

/// `*.json` files in `dir` other than the config document.
fn count_records(dir: &Path) -> Result<usize, StoreError> {
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if is_record_file(&entry)? {
            count += 1;
        }
    }
    Ok(count)
}

pub(super) fn is_record_file(entry: &fs::DirEntry) -> io::Result<bool> {
    if !entry.file_type()?.is_file() {
        return Ok(false);
    }
    let path = entry.path();
    let is_json = path.extension().and_then(|e| e.to_str()) == Some(JSON_EXTENSION);
    Ok(is_json && entry.file_name() != CONFIG_FILE)
}
