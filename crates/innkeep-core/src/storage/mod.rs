//! Storage layer
//!
//! Load-all/save-all persistence for named collections of JSON records.
//!
//! ## Architecture
//!
//! - [`RecordStore`]: the backend contract (raw JSON values per collection)
//! - [`Record`]: binds a typed record to its collection and validates it
//! - [`load_records`] / [`save_records`]: the typed boundary used by the
//!   entity handles
//!
//! A collection that has never been saved loads as empty.

pub mod error;
pub mod lock;
pub mod memory;
pub mod persistence;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use error::{StorageError, StorageResult};
pub use lock::{CollectionLock, LockTable};
pub use memory::MemoryStore;
pub use persistence::JsonFileStore;

/// Collection names, one per entity type
pub mod collections {
    pub const HOTELS: &str = "hotels";
    pub const CUSTOMERS: &str = "customers";
    pub const RESERVATIONS: &str = "reservations";
}

/// Backend contract for record collections
///
/// Implementations must treat a missing collection as empty and must replace
/// a collection wholesale on `save`.
pub trait RecordStore: Send + Sync {
    /// Read every record of `collection`
    fn load(&self, collection: &str) -> StorageResult<Vec<Value>>;

    /// Overwrite `collection` with exactly `records`
    fn save(&self, collection: &str, records: &[Value]) -> StorageResult<()>;

    /// Take exclusive access to `collection` until the guard drops
    fn lock(&self, collection: &str) -> StorageResult<CollectionLock>;
}

/// A typed record persisted in exactly one collection
pub trait Record: Serialize + DeserializeOwned {
    /// Collection this record type lives in
    const COLLECTION: &'static str;

    /// Field-level checks applied to every record at load time
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Load and validate every record of `T`'s collection
///
/// The first record that fails to decode or validate aborts the load. Skipping
/// it instead would drop it from disk on the next save.
pub fn load_records<T: Record>(store: &dyn RecordStore) -> StorageResult<Vec<T>> {
    store
        .load(T::COLLECTION)?
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let record: T =
                serde_json::from_value(value).map_err(|e| StorageError::InvalidRecord {
                    collection: T::COLLECTION.to_string(),
                    index,
                    details: e.to_string(),
                })?;
            record
                .validate()
                .map_err(|details| StorageError::InvalidRecord {
                    collection: T::COLLECTION.to_string(),
                    index,
                    details,
                })?;
            Ok(record)
        })
        .collect()
}

/// Replace `T`'s collection with `records`
pub fn save_records<T: Record>(store: &dyn RecordStore, records: &[T]) -> StorageResult<()> {
    let values = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| StorageError::Encode {
            collection: T::COLLECTION.to_string(),
            source,
        })?;
    store.save(T::COLLECTION, &values)
}
