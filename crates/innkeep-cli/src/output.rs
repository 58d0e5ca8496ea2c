//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use innkeep_core::{CustomerRecord, HotelRecord, Reservation};
use serde::Serialize;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single hotel summary
    pub fn print_hotel(&self, hotel: &HotelRecord) {
        match self.format {
            OutputFormat::Human => println!("{}", hotel_summary(hotel)),
            OutputFormat::Json => print_json(hotel),
            OutputFormat::Quiet => println!("{}", hotel.name),
        }
    }

    /// Print a list of hotels
    pub fn print_hotels(&self, hotels: &[HotelRecord]) {
        match self.format {
            OutputFormat::Human => {
                if hotels.is_empty() {
                    println!("No hotels found.");
                    return;
                }
                for hotel in hotels {
                    println!("{} | {}", truncate(&hotel.name, 35), truncate(&hotel.location, 40));
                }
                println!("\n{} hotel(s)", hotels.len());
            }
            OutputFormat::Json => print_json(hotels),
            OutputFormat::Quiet => {
                for hotel in hotels {
                    println!("{}", hotel.name);
                }
            }
        }
    }

    /// Print a single customer
    pub fn print_customer(&self, customer: &CustomerRecord) {
        match self.format {
            OutputFormat::Human => println!("Customer Name: {}", customer.name),
            OutputFormat::Json => print_json(customer),
            OutputFormat::Quiet => println!("{}", customer.name),
        }
    }

    /// Print a list of customers
    pub fn print_customers(&self, customers: &[CustomerRecord]) {
        match self.format {
            OutputFormat::Human => {
                if customers.is_empty() {
                    println!("No customers found.");
                    return;
                }
                for customer in customers {
                    println!("{}", customer.name);
                }
                println!("\n{} customer(s)", customers.len());
            }
            OutputFormat::Json => print_json(customers),
            OutputFormat::Quiet => {
                for customer in customers {
                    println!("{}", customer.name);
                }
            }
        }
    }

    /// Print a single reservation
    pub fn print_reservation(&self, reservation: &Reservation) {
        match self.format {
            OutputFormat::Human => println!("{}", reservation_line(reservation)),
            OutputFormat::Json => print_json(reservation),
            OutputFormat::Quiet => {}
        }
    }

    /// Print a list of reservations
    pub fn print_reservations(&self, reservations: &[Reservation]) {
        match self.format {
            OutputFormat::Human => {
                if reservations.is_empty() {
                    println!("No reservations found.");
                    return;
                }
                for reservation in reservations {
                    println!("{}", reservation_line(reservation));
                }
                println!("\n{} reservation(s)", reservations.len());
            }
            OutputFormat::Json => print_json(reservations),
            OutputFormat::Quiet => {
                for reservation in reservations {
                    println!(
                        "{}\t{}\t{}\t{}\t{}",
                        reservation.customer_name,
                        reservation.hotel_name,
                        reservation.room_type,
                        reservation.check_in,
                        reservation.check_out
                    );
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an advisory for an operation that was refused or found nothing
    ///
    /// `status` is the machine-readable outcome in JSON mode.
    pub fn advisory(&self, status: &str, message: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", message),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"status": status, "message": message}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Human summary of a hotel
pub fn hotel_summary(hotel: &HotelRecord) -> String {
    let rooms = if hotel.rooms.is_empty() {
        "Rooms: None".to_string()
    } else {
        format!("Rooms: {}", hotel.rooms.join(", "))
    };
    format!(
        "Hotel Name: {}\nLocation: {}\n{}\nReservations: {}",
        hotel.name,
        hotel.location,
        rooms,
        hotel.reservations.len()
    )
}

/// One-line description of a reservation
pub fn reservation_line(reservation: &Reservation) -> String {
    format!(
        "{} | {} | {} | {} → {} ({} night(s))",
        truncate(&reservation.customer_name, 25),
        truncate(&reservation.hotel_name, 25),
        reservation.room_type,
        reservation.check_in,
        reservation.check_out,
        reservation.nights()
    )
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to encode JSON output: {}", e),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
