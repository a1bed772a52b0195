use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, AppResult};

static STORED_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("valid phone regex"));

static TYPED_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+)?[\d\s\-()]{7,20}$").expect("valid phone regex"));

/// Format accepted for a phone number stored on an account.
pub fn validate_phone(phone: &str) -> AppResult<()> {
    if !STORED_PHONE.is_match(phone) {
        return Err(AppError::ValidationError(
            "Phone number must be entered in the format: '+999999999'. Up to 15 digits allowed."
                .to_string(),
        ));
    }
    Ok(())
}

/// Loose check for free text a user typed into the chat instead of sharing a contact.
pub fn looks_like_phone(text: &str) -> bool {
    TYPED_PHONE.is_match(text.trim())
}

/// Reduces a phone number to `+` followed by digits.
///
/// Eleven-digit numbers with a trunk prefix of `8` are rewritten to the
/// international `7` prefix.
pub fn normalize_phone_number(phone: &str) -> String {
    let mut digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 11 && digits.starts_with('8') {
        digits.replace_range(0..1, "7");
    }

    format!("+{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+79991234567").is_ok());
        assert!(validate_phone("999123456").is_ok());
        assert!(validate_phone("+1234").is_err());
        assert!(validate_phone("+7 999 123 45 67").is_err());
    }

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("8 (999) 123-45-67"), "+79991234567");
        assert_eq!(normalize_phone_number("+7 999 123 45 67"), "+79991234567");
        assert_eq!(normalize_phone_number("79991234567"), "+79991234567");
        assert_eq!(normalize_phone_number("+12025550123"), "+12025550123");
    }

    #[test]
    fn test_looks_like_phone() {
        assert!(looks_like_phone("+7 (999) 123-45-67"));
        assert!(looks_like_phone("89991234567"));
        assert!(!looks_like_phone("hello there"));
        assert!(!looks_like_phone("123"));
    }
}
