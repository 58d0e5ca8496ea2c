//! Ledger error handling
//!
//! Absence and booking conflicts are ordinary outcomes and never appear here.
//! Only malformed input and storage failures are errors.

use chrono::NaiveDate;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by hotel, customer and reservation operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A date was not in `YYYY-MM-DD` form or named no calendar day
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    MalformedDate { value: String },

    /// Check-out does not fall after check-in
    #[error("Check-out {check_out} must be after check-in {check_in}")]
    EmptyStay {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    /// A required text field was blank
    #[error("Field '{field}' must not be empty")]
    EmptyField { field: &'static str },

    /// Reading or writing a collection failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LedgerError {
    /// Whether the error was caused by caller input rather than storage
    pub fn is_input_error(&self) -> bool {
        !matches!(self, LedgerError::Storage(_))
    }

    /// What the user can do about a storage failure, if anything
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            LedgerError::Storage(e) => e.recovery_suggestion(),
            _ => None,
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Reject blank values for a named field
pub(crate) fn require(field: &'static str, value: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::EmptyField { field });
    }
    Ok(())
}
