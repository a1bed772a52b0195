use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, AppResult};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("valid email regex")
});

pub fn validate_email(email: &str) -> AppResult<()> {
    if !EMAIL.is_match(email) {
        return Err(AppError::ValidationError("Enter a valid email address".to_string()));
    }
    Ok(())
}

/// Checks a text field's length in characters against an inclusive range.
pub fn validate_length(field: &str, value: &str, min: usize, max: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::ValidationError(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

pub fn validate_price(field: &str, price: rust_decimal::Decimal) -> AppResult<()> {
    if price.is_sign_negative() {
        return Err(AppError::ValidationError(format!("{field} must not be negative")));
    }
    if price.scale() > 2 {
        return Err(AppError::ValidationError(format!(
            "{field} must have at most 2 decimal places"
        )));
    }
    Ok(())
}
