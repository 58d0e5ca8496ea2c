//! Unified entry point
//!
//! The `Ledger` owns the record store and hands out stateless handles for
//! each entity type. All handles from one ledger share the store, and with
//! it the collection locks.
//!
//! ## Usage
//!
//! ```ignore
//! let ledger = Ledger::open()?;
//!
//! ledger.hotels().create(&HotelRecord::new("Test Hotel", "Test Location"))?;
//!
//! let intent = BookingIntent::new("John Doe", "Test Hotel", "Single", "2024-02-20", "2024-02-25");
//! match ledger.reservations().book(&intent)? {
//!     BookingOutcome::Booked => {}
//!     BookingOutcome::Conflict(existing) => { /* report */ }
//! }
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::Config;
use crate::customers::Customers;
use crate::hotels::Hotels;
use crate::reservations::Reservations;
use crate::storage::{JsonFileStore, MemoryStore, RecordStore};

/// Access to the hotels, customers and reservations collections
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn RecordStore>,
}

impl Ledger {
    /// Open the file-backed ledger from the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::open_with_config(config))
    }

    /// Open the file-backed ledger in the configured data directory
    pub fn open_with_config(config: Config) -> Self {
        debug!(data_dir = %config.data_dir.display(), "opening ledger");
        Self::with_store(Arc::new(JsonFileStore::new(config)))
    }

    /// A ledger that keeps everything in memory
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// A ledger over any record store
    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn hotels(&self) -> Hotels {
        Hotels::new(Arc::clone(&self.store))
    }

    pub fn customers(&self) -> Customers {
        Customers::new(Arc::clone(&self.store))
    }

    pub fn reservations(&self) -> Reservations {
        Reservations::new(Arc::clone(&self.store))
    }

    /// The underlying record store
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingIntent, CustomerRecord, HotelRecord, HotelUpdate};
    use crate::reservations::{BookingOutcome, CancelOutcome};
    use crate::storage::collections;
    use std::fs;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            log_file: None,
            lock_timeout_ms: 200,
        }
    }

    fn read_collection(config: &Config, collection: &str) -> Option<String> {
        fs::read_to_string(config.collection_path(collection)).ok()
    }

    #[test]
    fn test_fresh_ledger_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let ledger = Ledger::open_with_config(test_config(&temp_dir));

        assert!(ledger.hotels().list().unwrap().is_empty());
        assert!(ledger.customers().list().unwrap().is_empty());
        assert!(ledger.reservations().list().unwrap().is_empty());
    }

    #[test]
    fn test_hotel_create_then_modify_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let ledger = Ledger::open_with_config(config.clone());

        ledger
            .hotels()
            .create(&HotelRecord::new("Test Hotel", "Test Location"))
            .unwrap();

        let on_disk: serde_json::Value =
            serde_json::from_str(&read_collection(&config, collections::HOTELS).unwrap()).unwrap();
        assert_eq!(
            on_disk,
            serde_json::json!([{
                "name": "Test Hotel",
                "location": "Test Location",
                "rooms": [],
                "reservations": []
            }])
        );

        ledger
            .hotels()
            .modify(
                "Test Hotel",
                &HotelUpdate::rename("New Test Hotel", "New Test Location"),
            )
            .unwrap();

        let hotels = ledger.hotels().list().unwrap();
        assert_eq!(hotels.len(), 1);
        assert_eq!(hotels[0].name, "New Test Hotel");
        assert_eq!(hotels[0].location, "New Test Location");
    }

    #[test]
    fn test_cancel_missing_leaves_file_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let reservations = Ledger::open_with_config(config.clone()).reservations();

        reservations
            .book(&BookingIntent::new(
                "John Doe",
                "Test Hotel",
                "Single",
                "2024-02-20",
                "2024-02-25",
            ))
            .unwrap();
        let before = read_collection(&config, collections::RESERVATIONS).unwrap();

        let absent = BookingIntent::new("Jane Roe", "Test Hotel", "Single", "2024-02-20", "2024-02-25")
            .to_reservation()
            .unwrap();
        assert_eq!(reservations.cancel(&absent).unwrap(), CancelOutcome::NotFound);

        let after = read_collection(&config, collections::RESERVATIONS).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_cancel_on_missing_collection_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let reservations = Ledger::open_with_config(config.clone()).reservations();

        let absent = BookingIntent::new("Jane Roe", "Test Hotel", "Single", "2024-02-20", "2024-02-25")
            .to_reservation()
            .unwrap();
        assert_eq!(reservations.cancel(&absent).unwrap(), CancelOutcome::NotFound);

        assert!(read_collection(&config, collections::RESERVATIONS).is_none());
    }

    #[test]
    fn test_create_cancel_round_trip_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let reservations = Ledger::open_with_config(config.clone()).reservations();

        reservations
            .book(&BookingIntent::new("A", "Test Hotel", "Double", "2024-01-10", "2024-01-12"))
            .unwrap();
        let before = read_collection(&config, collections::RESERVATIONS).unwrap();

        let booking = BookingIntent::new("John Doe", "Test Hotel", "Single", "2024-02-20", "2024-02-25")
            .to_reservation()
            .unwrap();
        assert!(reservations.create(&booking).unwrap().is_booked());
        assert_eq!(reservations.cancel(&booking).unwrap(), CancelOutcome::Cancelled);

        assert_eq!(read_collection(&config, collections::RESERVATIONS).unwrap(), before);
    }

    #[test]
    fn test_conflict_persists_nothing_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let reservations = Ledger::open_with_config(config.clone()).reservations();

        reservations
            .book(&BookingIntent::new("John Doe", "Test Hotel", "101", "2024-02-20", "2024-02-25"))
            .unwrap();
        let before = read_collection(&config, collections::RESERVATIONS).unwrap();

        let outcome = reservations
            .book(&BookingIntent::new("Jane Roe", "Test Hotel", "101", "2024-02-22", "2024-02-24"))
            .unwrap();
        assert!(matches!(outcome, BookingOutcome::Conflict(ref r) if r.customer_name == "John Doe"));

        assert_eq!(read_collection(&config, collections::RESERVATIONS).unwrap(), before);
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let ledger = Ledger::open_with_config(config.clone());
            ledger
                .hotels()
                .create(&HotelRecord::new("Test Hotel", "Test Location"))
                .unwrap();
            ledger
                .customers()
                .create(&CustomerRecord::new("John Doe"))
                .unwrap();
            ledger
                .reservations()
                .book(&BookingIntent::new("John Doe", "Test Hotel", "Single", "2024-02-20", "2024-02-25"))
                .unwrap();
        }

        let ledger = Ledger::open_with_config(config);
        assert_eq!(ledger.hotels().list().unwrap().len(), 1);
        assert_eq!(ledger.customers().list().unwrap().len(), 1);
        assert_eq!(ledger.reservations().list().unwrap().len(), 1);
    }

    #[test]
    fn test_collections_are_separate_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let ledger = Ledger::open_with_config(config.clone());

        ledger
            .customers()
            .create(&CustomerRecord::new("John Doe"))
            .unwrap();

        assert!(read_collection(&config, collections::CUSTOMERS).is_some());
        assert!(read_collection(&config, collections::HOTELS).is_none());
        assert!(read_collection(&config, collections::RESERVATIONS).is_none());
    }

    #[test]
    fn test_corrupt_record_is_rejected_not_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let ledger = Ledger::open_with_config(config.clone());

        let corrupt = r#"[{"customer_name": "A", "hotel_name": "H", "room_type": "1", "check_in": "2024-02-30", "check_out": "2024-03-02"}]"#;
        fs::write(config.collection_path(collections::RESERVATIONS), corrupt).unwrap();

        let result = ledger.reservations().book(&BookingIntent::new(
            "John Doe",
            "H",
            "1",
            "2024-03-05",
            "2024-03-06",
        ));
        assert!(result.is_err());

        // File untouched
        assert_eq!(
            read_collection(&config, collections::RESERVATIONS).unwrap(),
            corrupt
        );
    }

    #[test]
    fn test_in_memory_ledger() {
        let ledger = Ledger::in_memory();

        ledger
            .hotels()
            .create(&HotelRecord::new("Test Hotel", "Test Location"))
            .unwrap();

        assert_eq!(ledger.store().load(collections::HOTELS).unwrap().len(), 1);
    }
}
