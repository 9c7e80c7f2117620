//! Validation helper functions for configuration types.

use crate::core::errors::{ClarifyError, Result};

/// Validate that a usize value is greater than zero.
pub fn validate_positive_usize(value: usize, field: &str) -> Result<()> {
    if value == 0 {
        return Err(ClarifyError::validation_field(
            format!("{} must be greater than 0", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that a u64 value is greater than zero.
pub fn validate_positive_u64(value: u64, field: &str) -> Result<()> {
    if value == 0 {
        return Err(ClarifyError::validation_field(
            format!("{} must be greater than 0", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that a list setting has at least one entry.
pub fn validate_non_empty<T>(values: &[T], field: &str) -> Result<()> {
    if values.is_empty() {
        return Err(ClarifyError::validation_field(
            format!("{} must not be empty", field),
            field,
        ));
    }
    Ok(())
}
