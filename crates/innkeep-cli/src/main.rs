//! innkeep CLI
//!
//! Command-line interface for innkeep - hotels, customers and reservations.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use innkeep_core::{BookingIntent, Config, Ledger, LedgerError, StorageError};

mod commands;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "innkeep")]
#[command(about = "innkeep - Hotel, customer and reservation records")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage hotels
    Hotel {
        #[command(subcommand)]
        command: HotelCommands,
    },
    /// Manage customers
    Customer {
        #[command(subcommand)]
        command: CustomerCommands,
    },
    /// Manage reservations
    Reservation {
        #[command(subcommand)]
        command: ReservationCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum HotelCommands {
    /// Create a new hotel
    #[command(alias = "add")]
    Create {
        /// Hotel name
        name: String,
        /// Hotel location
        location: String,
    },
    /// Delete every hotel with this name
    #[command(alias = "rm")]
    Delete {
        /// Hotel name
        name: String,
    },
    /// Change a hotel's name or location
    Modify {
        /// Current hotel name
        name: String,
        /// New name
        #[arg(long = "name", value_name = "NEW_NAME")]
        new_name: Option<String>,
        /// New location
        #[arg(long = "location", value_name = "NEW_LOCATION")]
        new_location: Option<String>,
    },
    /// Show hotel details
    Show {
        /// Hotel name
        name: String,
    },
    /// List all hotels
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand)]
enum CustomerCommands {
    /// Create a new customer
    #[command(alias = "add")]
    Create {
        /// Customer name
        name: String,
    },
    /// Delete every customer with this name
    #[command(alias = "rm")]
    Delete {
        /// Customer name
        name: String,
    },
    /// Rename a customer
    Modify {
        /// Current customer name
        name: String,
        /// New customer name
        new_name: String,
    },
    /// Show customer details
    Show {
        /// Customer name
        name: String,
    },
    /// List all customers
    #[command(alias = "ls")]
    List,
}

/// The five fields identifying a reservation
#[derive(clap::Args)]
struct BookingArgs {
    /// Customer name
    customer: String,
    /// Hotel name
    hotel: String,
    /// Room type (case-sensitive)
    room_type: String,
    /// Check-in date (YYYY-MM-DD)
    check_in: String,
    /// Check-out date (YYYY-MM-DD), exclusive
    check_out: String,
}

impl From<BookingArgs> for BookingIntent {
    fn from(args: BookingArgs) -> Self {
        BookingIntent::new(
            args.customer,
            args.hotel,
            args.room_type,
            args.check_in,
            args.check_out,
        )
    }
}

#[derive(Subcommand)]
enum ReservationCommands {
    /// Book a room if it is free for the whole stay
    #[command(alias = "book")]
    Create {
        #[command(flatten)]
        booking: BookingArgs,
        /// Also add the customer to the customers list if missing, once booked
        #[arg(long)]
        register_customer: bool,
    },
    /// Cancel the reservation matching all five fields
    Cancel {
        #[command(flatten)]
        booking: BookingArgs,
    },
    /// Check availability without booking
    Check {
        /// Hotel name
        hotel: String,
        /// Room type (case-sensitive)
        room_type: String,
        /// Check-in date (YYYY-MM-DD)
        check_in: String,
        /// Check-out date (YYYY-MM-DD), exclusive
        check_out: String,
    },
    /// List reservations
    #[command(alias = "ls")]
    List {
        /// Only reservations at this hotel
        #[arg(long)]
        hotel: Option<String>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file, lock_timeout_ms)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Exit status for malformed input such as a bad date
const EXIT_INPUT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if let Some(hint) = recovery_hint(&err) {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::from(exit_status(&err))
        }
    }
}

/// Recovery suggestion for the storage failure behind `err`, if any
fn recovery_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<LedgerError>() {
            e.recovery_suggestion()
        } else {
            cause
                .downcast_ref::<StorageError>()
                .and_then(StorageError::recovery_suggestion)
        }
    })
}

fn exit_status(err: &anyhow::Error) -> u8 {
    let input_error = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<LedgerError>())
        .any(LedgerError::is_input_error);
    if input_error {
        EXIT_INPUT
    } else {
        1
    }
}

fn run(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work even when the config file is broken
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init(&config, cli.verbose);
    tracing::debug!(data_dir = %config.data_dir.display(), "configuration loaded");

    let ledger = Ledger::open_with_config(config);

    match cli.command {
        Commands::Hotel { command } => handle_hotel_command(command, &ledger, &output),
        Commands::Customer { command } => handle_customer_command(command, &ledger, &output),
        Commands::Reservation { command } => {
            handle_reservation_command(command, &ledger, &output)
        }
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_hotel_command(command: HotelCommands, ledger: &Ledger, output: &Output) -> Result<()> {
    match command {
        HotelCommands::Create { name, location } => {
            commands::hotel::create(ledger, name, location, output)
        }
        HotelCommands::Delete { name } => commands::hotel::delete(ledger, name, output),
        HotelCommands::Modify {
            name,
            new_name,
            new_location,
        } => commands::hotel::modify(ledger, name, new_name, new_location, output),
        HotelCommands::Show { name } => commands::hotel::show(ledger, name, output),
        HotelCommands::List => commands::hotel::list(ledger, output),
    }
}

fn handle_customer_command(
    command: CustomerCommands,
    ledger: &Ledger,
    output: &Output,
) -> Result<()> {
    match command {
        CustomerCommands::Create { name } => commands::customer::create(ledger, name, output),
        CustomerCommands::Delete { name } => commands::customer::delete(ledger, name, output),
        CustomerCommands::Modify { name, new_name } => {
            commands::customer::modify(ledger, name, new_name, output)
        }
        CustomerCommands::Show { name } => commands::customer::show(ledger, name, output),
        CustomerCommands::List => commands::customer::list(ledger, output),
    }
}

fn handle_reservation_command(
    command: ReservationCommands,
    ledger: &Ledger,
    output: &Output,
) -> Result<()> {
    match command {
        ReservationCommands::Create {
            booking,
            register_customer,
        } => commands::reservation::create(ledger, booking.into(), register_customer, output),
        ReservationCommands::Cancel { booking } => {
            commands::reservation::cancel(ledger, booking.into(), output)
        }
        ReservationCommands::Check {
            hotel,
            room_type,
            check_in,
            check_out,
        } => commands::reservation::check(ledger, hotel, room_type, check_in, check_out, output),
        ReservationCommands::List { hotel } => commands::reservation::list(ledger, hotel, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
