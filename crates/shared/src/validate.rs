//! Validation of the numeric location fields (postcode, house number).
//!
//! The same contract is used by the lookup form before a request is issued
//! and by the lookup endpoint when it receives one.

use thiserror::Error;

pub const POSTCODE_MIN_LENGTH: usize = 4;

pub const LOOKUP_FIELDS_MANDATORY: &str = "Postcode and house number fields are mandatory!";
pub const QUERY_FIELDS_MANDATORY: &str = "Postcode and street number fields mandatory!";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0}")]
    Mandatory(&'static str),
    #[error("{field} must be all digits and non negative!")]
    Format { field: String },
    #[error("{field} must be at least {min_length} digits!")]
    Length { field: String, min_length: usize },
}

/// Checks `value` for digits only, then for `min_length` when given.
pub fn validate(
    value: &str,
    field_name: &str,
    min_length: Option<usize>,
) -> Result<(), ValidationError> {
    check_digits(value, field_name)?;
    if let Some(min_length) = min_length {
        check_min_length(value, field_name, min_length)?;
    }
    Ok(())
}

/// Rejects empty strings, signs, decimals and anything else outside `0-9`.
pub fn check_digits(value: &str, field_name: &str) -> Result<(), ValidationError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::Format {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn check_min_length(
    value: &str,
    field_name: &str,
    min_length: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() < min_length {
        return Err(ValidationError::Length {
            field: field_name.to_string(),
            min_length,
        });
    }
    Ok(())
}
