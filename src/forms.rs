//! Turns raw form fields into typed values before anything reaches storage.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, AppResult};

/// A present, non-blank text field, trimmed.
pub fn required_text(field: &str, value: Option<&str>) -> AppResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::validation(format!("{field} is required"))),
    }
}

/// Largest accepted quantity. Keeps per-user `SUM()` totals well inside i64.
pub const MAX_QUANTITY: i64 = i32::MAX as i64;

/// A present whole number between zero and [`MAX_QUANTITY`].
pub fn non_negative(field: &str, value: Option<&str>) -> AppResult<i64> {
    let raw = required_text(field, value)?;
    match raw.parse::<i64>() {
        Ok(n) if n > MAX_QUANTITY => Err(AppError::validation(format!("{field} is too large"))),
        Ok(n) if n >= 0 => Ok(n),
        Ok(_) => Err(AppError::validation(format!("{field} cannot be negative"))),
        Err(_) => Err(AppError::validation(format!("{field} must be a whole number"))),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trimmed, lower-cased email that passes [`is_valid_email`].
pub fn email(field: &str, value: Option<&str>) -> AppResult<String> {
    let email = required_text(field, value)?.to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid email"));
    }
    Ok(email)
}
