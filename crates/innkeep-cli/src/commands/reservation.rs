//! Reservation command handlers

use anyhow::{Context, Result};

use innkeep_core::{BookingIntent, BookingOutcome, CancelOutcome, Ledger, Reservation, Stay};

use crate::output::{reservation_line, Output};

/// Book a room, optionally registering the customer once booked
pub fn create(
    ledger: &Ledger,
    intent: BookingIntent,
    register_customer: bool,
    output: &Output,
) -> Result<()> {
    let reservation = intent.to_reservation()?;

    match book(ledger, &intent, &reservation, register_customer)? {
        BookingOutcome::Booked => {
            output.success("Reservation created successfully.");
            output.print_reservation(&reservation);
        }
        BookingOutcome::Conflict(existing) => {
            output.advisory(
                "conflict",
                &format!(
                    "Room is not available for the specified period. Conflicts with: {}",
                    reservation_line(&existing)
                ),
            );
        }
    }
    Ok(())
}

/// Create the reservation, then register the customer if it was booked
fn book(
    ledger: &Ledger,
    intent: &BookingIntent,
    reservation: &Reservation,
    register_customer: bool,
) -> Result<BookingOutcome> {
    let outcome = ledger
        .reservations()
        .create(reservation)
        .context("Failed to create reservation")?;

    if register_customer && outcome.is_booked() {
        let customers = ledger.customers();
        if customers.find(&intent.customer_name)?.is_none() {
            customers
                .create_from_intent(intent)
                .context("Failed to register customer")?;
        }
    }
    Ok(outcome)
}

/// Cancel the reservation matching all five fields
pub fn cancel(ledger: &Ledger, intent: BookingIntent, output: &Output) -> Result<()> {
    let reservation = intent.to_reservation()?;

    match ledger
        .reservations()
        .cancel(&reservation)
        .context("Failed to cancel reservation")?
    {
        CancelOutcome::Cancelled => output.success("Reservation canceled successfully."),
        CancelOutcome::NotFound => output.advisory("not_found", "Reservation not found."),
    }
    Ok(())
}

/// Report whether a room is free for a stay without booking it
pub fn check(
    ledger: &Ledger,
    hotel: String,
    room_type: String,
    check_in: String,
    check_out: String,
    output: &Output,
) -> Result<()> {
    let stay = Stay::parse(&check_in, &check_out)?;
    // Customer name plays no part in availability
    let candidate = Reservation::new("-", hotel, room_type, stay)?;

    match ledger.reservations().check(&candidate)? {
        None => output.success(&format!(
            "{} {} is available from {} to {}.",
            candidate.hotel_name, candidate.room_type, candidate.check_in, candidate.check_out
        )),
        Some(existing) => output.advisory(
            "conflict",
            &format!("Not available. Conflicts with: {}", reservation_line(&existing)),
        ),
    }
    Ok(())
}

/// List reservations, optionally for one hotel
pub fn list(ledger: &Ledger, hotel: Option<String>, output: &Output) -> Result<()> {
    let reservations = match hotel {
        Some(ref name) => ledger.reservations().for_hotel(name)?,
        None => ledger.reservations().list()?,
    };
    output.print_reservations(&reservations);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(customer: &str, check_in: &str, check_out: &str) -> BookingIntent {
        BookingIntent::new(customer, "Test Hotel", "Single", check_in, check_out)
    }

    fn book_intent(ledger: &Ledger, intent: &BookingIntent) -> BookingOutcome {
        let reservation = intent.to_reservation().unwrap();
        book(ledger, intent, &reservation, true).unwrap()
    }

    #[test]
    fn test_booking_registers_customer_once() {
        let ledger = Ledger::in_memory();

        assert!(book_intent(&ledger, &intent("John Doe", "2024-02-20", "2024-02-25")).is_booked());
        assert!(book_intent(&ledger, &intent("John Doe", "2024-03-01", "2024-03-02")).is_booked());

        let customers = ledger.customers().list().unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name, "John Doe");
    }

    #[test]
    fn test_conflicting_booking_registers_nobody() {
        let ledger = Ledger::in_memory();
        book_intent(&ledger, &intent("John Doe", "2024-02-20", "2024-02-25"));

        let outcome = book_intent(&ledger, &intent("Jane Roe", "2024-02-22", "2024-02-24"));

        assert!(!outcome.is_booked());
        assert!(ledger.customers().find("Jane Roe").unwrap().is_none());
        assert_eq!(ledger.customers().list().unwrap().len(), 1);
    }
}
