//! In-memory record store
//!
//! Same contract as the file store without touching disk. Useful for tests
//! and for callers that only need a scratch ledger.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::debug;

use super::error::StorageResult;
use super::lock::{CollectionLock, LockTable};
use super::RecordStore;

/// Record store backed by a process-local map
#[derive(Debug)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Value>>>,
    locks: Arc<LockTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            locks: LockTable::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, collection: &str) -> StorageResult<Vec<Value>> {
        let collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        let records = collections.get(collection).cloned().unwrap_or_default();
        debug!(collection, count = records.len(), "loaded collection from memory");
        Ok(records)
    }

    fn save(&self, collection: &str, records: &[Value]) -> StorageResult<()> {
        let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        collections.insert(collection.to_string(), records.to_vec());
        debug!(collection, count = records.len(), "saved collection to memory");
        Ok(())
    }

    fn lock(&self, collection: &str) -> StorageResult<CollectionLock> {
        Ok(self.locks.acquire(collection))
    }
}
