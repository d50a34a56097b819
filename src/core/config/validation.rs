//! Validation helper functions for configuration types.

use crate::core::errors::{McdmError, Result};

/// Validate that a usize value is at least `min`.
pub fn validate_min_usize(value: usize, min: usize, field: &str) -> Result<()> {
    if value < min {
        return Err(McdmError::config_field(
            format!("{field} must be at least {min}, got {value}"),
            field,
        ));
    }
    Ok(())
}

/// Validate that an f64 value is finite and greater than zero.
pub fn validate_positive_f64(value: f64, field: &str) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(McdmError::config_field(
            format!("{field} must be greater than 0.0, got {value}"),
            field,
        ));
    }
    Ok(())
}

/// Validate that an f64 value is in the unit range [0.0, 1.0].
pub fn validate_unit_range(value: f64, field: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(McdmError::config_field(
            format!("{field} must be between 0.0 and 1.0, got {value}"),
            field,
        ));
    }
    Ok(())
}

/// Validate that an f64 value lies strictly inside (0.0, 1.0).
pub fn validate_open_unit_range(value: f64, field: &str) -> Result<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(McdmError::config_field(
            format!("{field} must be strictly between 0.0 and 1.0, got {value}"),
            field,
        ));
    }
    Ok(())
}

/// Validate that `lower < upper`.
pub fn validate_ordered(lower: f64, upper: f64, field: &str) -> Result<()> {
    if lower >= upper {
        return Err(McdmError::config_field(
            format!("{field}: lower bound {lower} must be below upper bound {upper}"),
            field,
        ));
    }
    Ok(())
}
