use crate::utils::error::{Result, TrackingError};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: &str) -> TrackingError {
    TrackingError::ValidationError {
        message: format!("{} = '{}': {}", field_name, value, reason),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// UN/LOCODE: two-letter country code followed by three alphanumerics.
pub fn validate_unlocode(field_name: &str, code: &str) -> Result<()> {
    if code.len() != 5 || !code.is_ascii() {
        return Err(invalid(field_name, code, "UN/LOCODE must be 5 ASCII characters"));
    }

    let (country, place) = code.split_at(2);
    if !country.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid(
            field_name,
            code,
            "UN/LOCODE must start with a two-letter country code",
        ));
    }
    if !place.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid(
            field_name,
            code,
            "UN/LOCODE place code must be alphanumeric",
        ));
    }

    Ok(())
}

pub fn validate_unique<'a, I>(field_name: &str, values: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(invalid(field_name, value, "Duplicate value"));
        }
    }
    Ok(())
}
