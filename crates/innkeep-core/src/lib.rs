//! innkeep Core Library
//!
//! This crate tracks hotels, customers and reservations as JSON record
//! collections, and refuses any reservation that would overlap an existing
//! booking for the same hotel and room type.
//!
//! # Architecture
//!
//! - **Record store**: load-all/save-all of a named collection. A missing
//!   collection is empty. Writes are atomic and run under a collection lock.
//! - **Entity handles**: stateless `Hotels`, `Customers`, `Reservations`,
//!   each reloading its collection on every call.
//!
//! # Quick Start
//!
//! ```text
//! let ledger = Ledger::open()?;
//!
//! ledger.hotels().create(&HotelRecord::new("Test Hotel", "Test Location"))?;
//!
//! let intent = BookingIntent::new("John Doe", "Test Hotel", "Single", "2024-02-20", "2024-02-25");
//! let outcome = ledger.reservations().book(&intent)?;
//! ```
//!
//! # Modules
//!
//! - `ledger`: Unified entry point (main entry point)
//! - `models`: Record types and date handling
//! - `availability`: Reservation overlap checks
//! - `hotels`, `customers`, `reservations`: Entity operations
//! - `storage`: Record store backends
//! - `config`: Application configuration

pub mod availability;
pub mod config;
pub mod customers;
pub mod error;
pub mod hotels;
pub mod ledger;
pub mod models;
pub mod reservations;
pub mod storage;

pub use config::Config;
pub use customers::Customers;
pub use error::{LedgerError, LedgerResult};
pub use hotels::Hotels;
pub use ledger::Ledger;
pub use models::{BookingIntent, CustomerRecord, HotelRecord, HotelUpdate, Reservation, Stay};
pub use reservations::{BookingOutcome, CancelOutcome, Reservations};
pub use storage::{JsonFileStore, MemoryStore, RecordStore, StorageError};
