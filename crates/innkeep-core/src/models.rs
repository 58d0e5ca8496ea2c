//! Data models for innkeep
//!
//! Persisted records: [`HotelRecord`], [`CustomerRecord`], [`Reservation`].
//! Transient input: [`BookingIntent`], the raw fields of a booking request.
//!
//! Field order of each struct is the field order written to disk.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{require, LedgerError, LedgerResult};
use crate::storage::{collections, Record};

/// Calendar date format used on disk and on input
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date
///
/// Only the exact ten-character form is accepted: `2024-2-5` and
/// `2024-02-05T00:00` are rejected even though chrono would read them.
pub fn parse_date(value: &str) -> LedgerResult<NaiveDate> {
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });

    let malformed = || LedgerError::MalformedDate {
        value: value.to_string(),
    };
    if !well_formed {
        return Err(malformed());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| malformed())
}

/// Serde adapter writing dates as `YYYY-MM-DD`
mod date_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{parse_date, DATE_FORMAT};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse_date(&value).map_err(de::Error::custom)
    }
}

/// A hotel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HotelRecord {
    /// Hotel name, the lookup key
    pub name: String,
    /// Free-form location
    pub location: String,
    /// Room inventory (not tracked yet, always empty)
    #[serde(default)]
    pub rooms: Vec<String>,
    /// Embedded reservations (not tracked yet, always empty)
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

impl HotelRecord {
    /// Create a hotel with no rooms or reservations
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            rooms: Vec::new(),
            reservations: Vec::new(),
        }
    }
}

impl Record for HotelRecord {
    const COLLECTION: &'static str = collections::HOTELS;

    fn validate(&self) -> Result<(), String> {
        require("name", &self.name).map_err(|e| e.to_string())
    }
}

/// Field changes applied by a hotel modify
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
}

impl HotelUpdate {
    /// Change both name and location
    pub fn rename(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            location: Some(location.into()),
        }
    }

    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none()
    }

    pub(crate) fn apply(&self, hotel: &mut HotelRecord) {
        if let Some(ref name) = self.name {
            hotel.name = name.clone();
        }
        if let Some(ref location) = self.location {
            hotel.location = location.clone();
        }
    }
}

/// A customer; only the name is persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerRecord {
    pub name: String,
}

impl CustomerRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Record for CustomerRecord {
    const COLLECTION: &'static str = collections::CUSTOMERS;

    fn validate(&self) -> Result<(), String> {
        require("name", &self.name).map_err(|e| e.to_string())
    }
}

impl From<&BookingIntent> for CustomerRecord {
    fn from(intent: &BookingIntent) -> Self {
        Self::new(intent.customer_name.clone())
    }
}

/// A half-open stay `[check_in, check_out)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stay {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl Stay {
    /// Create a stay of at least one night
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> LedgerResult<Self> {
        if check_out <= check_in {
            return Err(LedgerError::EmptyStay {
                check_in,
                check_out,
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Parse both ends from `YYYY-MM-DD` strings
    pub fn parse(check_in: &str, check_out: &str) -> LedgerResult<Self> {
        Self::new(parse_date(check_in)?, parse_date(check_out)?)
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights in the stay
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Whether two stays share at least one night
    ///
    /// A stay ending on the day another begins does not overlap it.
    pub fn overlaps(&self, other: &Stay) -> bool {
        self.check_in < other.check_out && self.check_out > other.check_in
    }
}

/// A booked room for a date range
///
/// Has no identifier: two reservations are the same booking iff all five
/// fields are equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reservation {
    pub customer_name: String,
    pub hotel_name: String,
    /// Free-form room type; compared case-sensitively
    pub room_type: String,
    #[serde(with = "date_format")]
    pub check_in: NaiveDate,
    #[serde(with = "date_format")]
    pub check_out: NaiveDate,
}

impl Reservation {
    /// Create a reservation for a validated stay
    pub fn new(
        customer_name: impl Into<String>,
        hotel_name: impl Into<String>,
        room_type: impl Into<String>,
        stay: Stay,
    ) -> LedgerResult<Self> {
        let reservation = Self {
            customer_name: customer_name.into(),
            hotel_name: hotel_name.into(),
            room_type: room_type.into(),
            check_in: stay.check_in(),
            check_out: stay.check_out(),
        };
        reservation.check_fields()?;
        Ok(reservation)
    }

    /// The stay covered by this reservation
    pub fn stay(&self) -> Stay {
        Stay {
            check_in: self.check_in,
            check_out: self.check_out,
        }
    }

    /// Number of nights booked
    pub fn nights(&self) -> i64 {
        self.stay().nights()
    }

    /// Whether both reservations draw on the same hotel and room type
    pub fn same_room_pool(&self, other: &Reservation) -> bool {
        self.hotel_name == other.hotel_name && self.room_type == other.room_type
    }

    /// Reject blank names and stays that are empty or inverted
    pub(crate) fn check_fields(&self) -> LedgerResult<()> {
        require("customer_name", &self.customer_name)?;
        require("hotel_name", &self.hotel_name)?;
        require("room_type", &self.room_type)?;
        Stay::new(self.check_in, self.check_out)?;
        Ok(())
    }
}

impl Record for Reservation {
    const COLLECTION: &'static str = collections::RESERVATIONS;

    fn validate(&self) -> Result<(), String> {
        self.check_fields().map_err(|e| e.to_string())
    }
}

/// The raw fields of a booking request
///
/// Dates are kept as text until [`BookingIntent::to_reservation`] parses
/// them; nothing about an intent is persisted directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingIntent {
    pub customer_name: String,
    pub hotel_name: String,
    pub room_type: String,
    pub check_in: String,
    pub check_out: String,
}

impl BookingIntent {
    pub fn new(
        customer_name: impl Into<String>,
        hotel_name: impl Into<String>,
        room_type: impl Into<String>,
        check_in: impl Into<String>,
        check_out: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            hotel_name: hotel_name.into(),
            room_type: room_type.into(),
            check_in: check_in.into(),
            check_out: check_out.into(),
        }
    }

    /// Parse the dates and build the reservation this intent describes
    pub fn to_reservation(&self) -> LedgerResult<Reservation> {
        let stay = Stay::parse(&self.check_in, &self.check_out)?;
        Reservation::new(
            self.customer_name.clone(),
            self.hotel_name.clone(),
            self.room_type.clone(),
            stay,
        )
    }

    /// The customer record this intent implies
    pub fn customer(&self) -> CustomerRecord {
        CustomerRecord::from(self)
    }
}
