//! Hotel operations
//!
//! Every call reloads the `hotels` collection, so a `Hotels` handle carries
//! no state of its own. Deleting or modifying a hotel that does not exist
//! is a successful no-op and leaves the collection untouched.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{require, LedgerResult};
use crate::models::{HotelRecord, HotelUpdate};
use crate::storage::{collections, load_records, save_records, RecordStore};

/// Handle for the hotels collection
#[derive(Clone)]
pub struct Hotels {
    store: Arc<dyn RecordStore>,
}

impl Hotels {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Append a hotel
    ///
    /// Names are not checked for uniqueness; lookups use the first match.
    pub fn create(&self, hotel: &HotelRecord) -> LedgerResult<()> {
        require("name", &hotel.name)?;

        let _lock = self.store.lock(collections::HOTELS)?;
        let mut hotels: Vec<HotelRecord> = load_records(&*self.store)?;

        if hotels.iter().any(|h| h.name == hotel.name) {
            warn!(name = %hotel.name, "hotel name already present; lookups will return the first");
        }

        hotels.push(hotel.clone());
        save_records(&*self.store, &hotels)?;

        info!(name = %hotel.name, location = %hotel.location, "created hotel");
        Ok(())
    }

    /// Remove every hotel named `name`, returning how many were removed
    pub fn delete(&self, name: &str) -> LedgerResult<usize> {
        let _lock = self.store.lock(collections::HOTELS)?;
        let mut hotels: Vec<HotelRecord> = load_records(&*self.store)?;

        let before = hotels.len();
        hotels.retain(|h| h.name != name);
        let removed = before - hotels.len();

        if removed == 0 {
            debug!(name, "no hotel to delete");
            return Ok(0);
        }

        save_records(&*self.store, &hotels)?;
        info!(name, removed, "deleted hotel");
        Ok(removed)
    }

    /// Apply `update` to the first hotel named `name`
    ///
    /// Returns `false` when no hotel matched.
    pub fn modify(&self, name: &str, update: &HotelUpdate) -> LedgerResult<bool> {
        if let Some(ref new_name) = update.name {
            require("name", new_name)?;
        }

        let _lock = self.store.lock(collections::HOTELS)?;
        let mut hotels: Vec<HotelRecord> = load_records(&*self.store)?;

        let Some(hotel) = hotels.iter_mut().find(|h| h.name == name) else {
            debug!(name, "no hotel to modify");
            return Ok(false);
        };
        update.apply(hotel);

        save_records(&*self.store, &hotels)?;
        info!(name, ?update, "modified hotel");
        Ok(true)
    }

    /// Get the first hotel named `name`
    pub fn find(&self, name: &str) -> LedgerResult<Option<HotelRecord>> {
        let hotels: Vec<HotelRecord> = load_records(&*self.store)?;
        Ok(hotels.into_iter().find(|h| h.name == name))
    }

    /// Get all hotels in stored order
    pub fn list(&self) -> LedgerResult<Vec<HotelRecord>> {
        Ok(load_records(&*self.store)?)
    }
}
