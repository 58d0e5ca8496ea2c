//! Customer operations
//!
//! Customers are name-only records. Booking details that arrive with a
//! customer (hotel, room, dates) belong to [`BookingIntent`] and are never
//! stored here.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{require, LedgerResult};
use crate::models::{BookingIntent, CustomerRecord};
use crate::storage::{collections, load_records, save_records, RecordStore};

/// Handle for the customers collection
#[derive(Clone)]
pub struct Customers {
    store: Arc<dyn RecordStore>,
}

impl Customers {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Append a customer
    pub fn create(&self, customer: &CustomerRecord) -> LedgerResult<()> {
        require("name", &customer.name)?;

        let _lock = self.store.lock(collections::CUSTOMERS)?;
        let mut customers: Vec<CustomerRecord> = load_records(&*self.store)?;
        customers.push(customer.clone());
        save_records(&*self.store, &customers)?;

        info!(name = %customer.name, "created customer");
        Ok(())
    }

    /// Register the customer named by a booking intent
    pub fn create_from_intent(&self, intent: &BookingIntent) -> LedgerResult<()> {
        self.create(&intent.customer())
    }

    /// Remove every customer named `name`, returning how many were removed
    pub fn delete(&self, name: &str) -> LedgerResult<usize> {
        let _lock = self.store.lock(collections::CUSTOMERS)?;
        let mut customers: Vec<CustomerRecord> = load_records(&*self.store)?;

        let before = customers.len();
        customers.retain(|c| c.name != name);
        let removed = before - customers.len();

        if removed == 0 {
            debug!(name, "no customer to delete");
            return Ok(0);
        }

        save_records(&*self.store, &customers)?;
        info!(name, removed, "deleted customer");
        Ok(removed)
    }

    /// Rename the first customer named `name`
    ///
    /// Returns `false` when no customer matched.
    pub fn modify(&self, name: &str, new_name: &str) -> LedgerResult<bool> {
        require("name", new_name)?;

        let _lock = self.store.lock(collections::CUSTOMERS)?;
        let mut customers: Vec<CustomerRecord> = load_records(&*self.store)?;

        let Some(customer) = customers.iter_mut().find(|c| c.name == name) else {
            debug!(name, "no customer to modify");
            return Ok(false);
        };
        customer.name = new_name.to_string();

        save_records(&*self.store, &customers)?;
        info!(name, new_name, "renamed customer");
        Ok(true)
    }

    /// Get the first customer named `name`
    pub fn find(&self, name: &str) -> LedgerResult<Option<CustomerRecord>> {
        let customers: Vec<CustomerRecord> = load_records(&*self.store)?;
        Ok(customers.into_iter().find(|c| c.name == name))
    }

    pub fn list(&self) -> LedgerResult<Vec<CustomerRecord>> {
        Ok(load_records(&*self.store)?)
    }
}
