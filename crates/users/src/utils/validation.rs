//! Input validation utilities.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::RegisterInput;

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const DEFAULT_CITY: &str = "Bangalore";

// Both patterns are literals; `None` only if they stop compiling.
static EMAIL_REGEX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

static PHONE_STRIP: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[^+\d\-()\s]").ok());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

/// Every problem with a registration form, in display order.
pub fn validate_registration(input: &RegisterInput) -> Vec<String> {
    let mut errors = Vec::new();

    if !is_valid_email(&input.email) {
        errors.push("Invalid email address".to_string());
    }

    if input.password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.push(format!(
            "Password must be at least {PASSWORD_MIN_LENGTH} characters"
        ));
    }

    if input.full_name.chars().count() < 2 {
        errors.push("Full name must be at least 2 characters".to_string());
    }

    if input.phone.is_empty() {
        errors.push("Phone number is required".to_string());
    } else if input.phone.chars().count() < 7
        || input.phone.chars().filter(char::is_ascii_digit).count() < 7
    {
        errors.push("Phone number looks incorrect".to_string());
    }

    if let Some(city) = input.city.as_deref().filter(|city| !city.is_empty()) {
        if city.chars().count() < 2 {
            errors.push("City must be at least 2 characters".to_string());
        }
    }

    if let Some(region) = input.region.as_deref().filter(|region| !region.is_empty()) {
        if region.chars().count() < 2 {
            errors.push("Region must be at least 2 characters".to_string());
        }
    }

    errors
}

/// Keep digits, `+`, `-`, parentheses and whitespace.
pub fn clean_phone(phone: &str) -> String {
    match PHONE_STRIP.as_ref() {
        Some(pattern) => pattern.replace_all(phone, "").into_owned(),
        None => phone.to_string(),
    }
}
