use crate::utils::error::{ProfitError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_positive_amount(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ProfitError::invalid_input(field_name, value, "Value must be a finite number"));
    }
    if value <= 0.0 {
        return Err(ProfitError::invalid_input(field_name, value, "Value must be greater than 0"));
    }
    Ok(())
}

pub fn validate_non_negative_amount(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ProfitError::invalid_input(field_name, value, "Value must be a finite number"));
    }
    if value < 0.0 {
        return Err(ProfitError::invalid_input(field_name, value, "Value cannot be negative"));
    }
    Ok(())
}

pub fn validate_positive_quantity(field_name: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(ProfitError::invalid_input(field_name, value, "Value must be at least 1"));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProfitError::invalid_input(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// Identifiers are matched verbatim, so only the empty string is rejected.
pub fn validate_non_empty_identifier(field_name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ProfitError::invalid_input(field_name, value, "Identifier cannot be empty"));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ProfitError::invalid_input(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(ProfitError::invalid_input(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}
