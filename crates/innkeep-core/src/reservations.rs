//! Reservation operations
//!
//! Creating a reservation checks availability and appends in one locked
//! read-modify-write cycle, so two writers sharing a store cannot both
//! pass the check against the same snapshot.
//!
//! A reservation moves from absent to booked on `create` and back on
//! `cancel`. Changing dates is a cancel followed by a create and is not
//! atomic.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::availability::find_conflict;
use crate::error::LedgerResult;
use crate::models::{BookingIntent, Reservation};
use crate::storage::{collections, load_records, save_records, RecordStore};

/// Result of a booking attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    /// The reservation was stored
    Booked,
    /// Nothing was stored; this existing reservation overlaps the request
    Conflict(Reservation),
}

impl BookingOutcome {
    pub fn is_booked(&self) -> bool {
        matches!(self, BookingOutcome::Booked)
    }
}

/// Result of a cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// One matching reservation was removed
    Cancelled,
    /// No reservation matched; nothing was written
    NotFound,
}

/// Handle for the reservations collection
#[derive(Clone)]
pub struct Reservations {
    store: Arc<dyn RecordStore>,
}

impl Reservations {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Book `reservation` if its room is free for the whole stay
    ///
    /// An invalid reservation fails before the store is touched.
    pub fn create(&self, reservation: &Reservation) -> LedgerResult<BookingOutcome> {
        reservation.check_fields()?;

        let _lock = self.store.lock(collections::RESERVATIONS)?;
        let mut reservations: Vec<Reservation> = load_records(&*self.store)?;

        if let Some(existing) = find_conflict(reservation, &reservations) {
            warn!(
                hotel = %reservation.hotel_name,
                room_type = %reservation.room_type,
                check_in = %reservation.check_in,
                check_out = %reservation.check_out,
                held_by = %existing.customer_name,
                "room not available for requested stay"
            );
            return Ok(BookingOutcome::Conflict(existing.clone()));
        }

        reservations.push(reservation.clone());
        save_records(&*self.store, &reservations)?;

        info!(
            customer = %reservation.customer_name,
            hotel = %reservation.hotel_name,
            room_type = %reservation.room_type,
            nights = reservation.nights(),
            "reservation created"
        );
        Ok(BookingOutcome::Booked)
    }

    /// Parse a booking intent and book it
    ///
    /// A malformed date fails the call before the store is touched.
    pub fn book(&self, intent: &BookingIntent) -> LedgerResult<BookingOutcome> {
        let reservation = intent.to_reservation()?;
        self.create(&reservation)
    }

    /// Remove the first reservation equal to `reservation` in all five fields
    pub fn cancel(&self, reservation: &Reservation) -> LedgerResult<CancelOutcome> {
        let _lock = self.store.lock(collections::RESERVATIONS)?;
        let mut reservations: Vec<Reservation> = load_records(&*self.store)?;

        let Some(index) = reservations.iter().position(|r| r == reservation) else {
            debug!(
                customer = %reservation.customer_name,
                hotel = %reservation.hotel_name,
                "no matching reservation to cancel"
            );
            return Ok(CancelOutcome::NotFound);
        };

        reservations.remove(index);
        save_records(&*self.store, &reservations)?;

        info!(
            customer = %reservation.customer_name,
            hotel = %reservation.hotel_name,
            room_type = %reservation.room_type,
            "reservation cancelled"
        );
        Ok(CancelOutcome::Cancelled)
    }

    /// Existing reservation that would block `reservation`, without booking
    pub fn check(&self, reservation: &Reservation) -> LedgerResult<Option<Reservation>> {
        reservation.check_fields()?;
        let reservations: Vec<Reservation> = load_records(&*self.store)?;
        Ok(find_conflict(reservation, &reservations).cloned())
    }

    /// All reservations in stored order
    pub fn list(&self) -> LedgerResult<Vec<Reservation>> {
        Ok(load_records(&*self.store)?)
    }

    /// Reservations at one hotel, in stored order
    pub fn for_hotel(&self, hotel_name: &str) -> LedgerResult<Vec<Reservation>> {
        let mut reservations = self.list()?;
        reservations.retain(|r| r.hotel_name == hotel_name);
        Ok(reservations)
    }
}
