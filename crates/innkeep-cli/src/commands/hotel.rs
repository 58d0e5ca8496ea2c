//! Hotel command handlers

use anyhow::{bail, Context, Result};

use innkeep_core::{HotelRecord, HotelUpdate, Ledger};

use crate::output::Output;

/// Create a new hotel
pub fn create(ledger: &Ledger, name: String, location: String, output: &Output) -> Result<()> {
    let hotel = HotelRecord::new(name, location);
    ledger
        .hotels()
        .create(&hotel)
        .context("Failed to create hotel")?;

    output.success(&format!("Created hotel: {}", hotel.name));
    Ok(())
}

/// Delete every hotel with the given name
pub fn delete(ledger: &Ledger, name: String, output: &Output) -> Result<()> {
    let removed = ledger
        .hotels()
        .delete(&name)
        .context("Failed to delete hotel")?;

    if removed == 0 {
        output.advisory("not_found", "Hotel not found.");
    } else {
        output.success(&format!("Deleted hotel: {}", name));
    }
    Ok(())
}

/// Change a hotel's name and/or location
pub fn modify(
    ledger: &Ledger,
    name: String,
    new_name: Option<String>,
    new_location: Option<String>,
    output: &Output,
) -> Result<()> {
    let update = HotelUpdate {
        name: new_name,
        location: new_location,
    };
    if update.is_empty() {
        bail!("Nothing to change. Pass --name and/or --location.");
    }

    let found = ledger
        .hotels()
        .modify(&name, &update)
        .context("Failed to modify hotel")?;

    if found {
        output.success(&format!("Updated hotel: {}", name));
    } else {
        output.advisory("not_found", "Hotel not found.");
    }
    Ok(())
}

/// Show a single hotel
pub fn show(ledger: &Ledger, name: String, output: &Output) -> Result<()> {
    match ledger.hotels().find(&name)? {
        Some(hotel) => output.print_hotel(&hotel),
        None => output.advisory("not_found", "Hotel not found."),
    }
    Ok(())
}

/// List all hotels
pub fn list(ledger: &Ledger, output: &Output) -> Result<()> {
    let hotels = ledger.hotels().list()?;
    output.print_hotels(&hotels);
    Ok(())
}
