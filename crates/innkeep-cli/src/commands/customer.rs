//! Customer command handlers

use anyhow::{Context, Result};

use innkeep_core::{CustomerRecord, Ledger};

use crate::output::Output;

/// Create a new customer
pub fn create(ledger: &Ledger, name: String, output: &Output) -> Result<()> {
    ledger
        .customers()
        .create(&CustomerRecord::new(name.clone()))
        .context("Failed to create customer")?;

    output.success(&format!("Created customer: {}", name));
    Ok(())
}

/// Delete every customer with the given name
pub fn delete(ledger: &Ledger, name: String, output: &Output) -> Result<()> {
    let removed = ledger
        .customers()
        .delete(&name)
        .context("Failed to delete customer")?;

    if removed == 0 {
        output.advisory("not_found", "Customer not found.");
    } else {
        output.success(&format!("Deleted customer: {}", name));
    }
    Ok(())
}

/// Rename a customer
pub fn modify(ledger: &Ledger, name: String, new_name: String, output: &Output) -> Result<()> {
    let found = ledger
        .customers()
        .modify(&name, &new_name)
        .context("Failed to modify customer")?;

    if found {
        output.success(&format!("Renamed customer: {} -> {}", name, new_name));
    } else {
        output.advisory("not_found", "Customer not found.");
    }
    Ok(())
}

/// Show a single customer
pub fn show(ledger: &Ledger, name: String, output: &Output) -> Result<()> {
    match ledger.customers().find(&name)? {
        Some(customer) => output.print_customer(&customer),
        None => output.advisory("not_found", "Customer not found."),
    }
    Ok(())
}

/// List all customers
pub fn list(ledger: &Ledger, output: &Output) -> Result<()> {
    let customers = ledger.customers().list()?;
    output.print_customers(&customers);
    Ok(())
}
