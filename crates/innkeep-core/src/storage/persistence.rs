//! JSON file persistence
//!
//! Each collection is one pretty-printed JSON array in the data directory:
//!
//! - `hotels.json`
//! - `customers.json`
//! - `reservations.json`
//!
//! Writes are atomic (write to temp file, then rename) so a failed save
//! leaves the previous file intact.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::lock::{CollectionLock, LockFile, LockTable};
use super::RecordStore;
use crate::config::Config;

/// Record store keeping one JSON file per collection
#[derive(Debug)]
pub struct JsonFileStore {
    config: Config,
    locks: Arc<LockTable>,
}

impl JsonFileStore {
    /// Create a file store rooted at the configured data directory
    pub fn new(config: Config) -> Self {
        Self {
            config,
            locks: LockTable::new(),
        }
    }

    /// Path of the file backing `collection`
    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.config.collection_path(collection)
    }

    fn lock_path(&self, collection: &str) -> PathBuf {
        self.collection_path(collection).with_extension("json.lock")
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self, collection: &str) -> StorageResult<Vec<Value>> {
        let path = self.collection_path(collection);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(collection, path = %path.display(), "collection file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::from_read(e, path)),
        };

        let records: Vec<Value> =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::InvalidFormat {
                path: path.clone(),
                details: e.to_string(),
            })?;

        debug!(collection, count = records.len(), "loaded collection");
        Ok(records)
    }

    fn save(&self, collection: &str, records: &[Value]) -> StorageResult<()> {
        let path = self.collection_path(collection);
        let bytes = to_pretty_json(records).map_err(|source| StorageError::Encode {
            collection: collection.to_string(),
            source,
        })?;

        atomic_write(&path, &bytes)?;

        debug!(collection, count = records.len(), "saved collection");
        Ok(())
    }

    fn lock(&self, collection: &str) -> StorageResult<CollectionLock> {
        let guard = self.locks.acquire(collection);
        let file = LockFile::acquire(&self.lock_path(collection), self.config.lock_timeout())?;
        Ok(guard.with_file(file))
    }
}

/// Serialize with four-space indentation for hand inspection
fn to_pretty_json(records: &[Value]) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    records.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Temp file must share the target's directory for rename to be atomic
    let temp_path = path.with_extension("json.tmp");

    let result = write_synced(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
            from: temp_path.clone(),
            to: path.to_path_buf(),
            source,
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_synced(path: &Path, data: &[u8]) -> StorageResult<()> {
    let mut file = File::create(path).map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;
    Ok(())
}
