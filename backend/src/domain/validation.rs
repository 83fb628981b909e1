use thiserror::Error;

/// Input errors surfaced to the user, typically as a toast on the form
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} is too long ({len} characters, maximum is {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Amount must not be negative")]
    NegativeAmount,
    #[error("Amount must be greater than 0")]
    AmountNotPositive,
    #[error("Amount has too many decimal places. Use at most 2 decimal places.")]
    AmountPrecisionTooHigh,
    #[error("Date range ends before it starts")]
    InvalidDateRange,
    #[error("Minimum amount is greater than maximum amount")]
    InvalidAmountRange,
    #[error("Invalid month: {0}. Must be between 1 and 12")]
    InvalidMonth(u32),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("A {0} with this name already exists")]
    DuplicateName(&'static str),
    #[error("Unknown {kind} '{id}'")]
    UnknownReference { kind: &'static str, id: String },
    #[error("{kind} '{id}' is still referenced by {count} job(s)")]
    StillReferenced {
        kind: &'static str,
        id: String,
        count: usize,
    },
}

/// Trim a required text field and check it against the length limit
pub fn require_text(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    let len = trimmed.chars().count();
    if len > max {
        return Err(ValidationError::TooLong { field, len, max });
    }
    Ok(trimmed.to_string())
}

/// Normalize an optional text field: blank becomes `None`
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

/// Check that an amount has at most two decimal places
pub fn has_valid_precision(amount: f64) -> bool {
    let cents = amount * 100.0;
    (cents - cents.round()).abs() < 1e-6
}
