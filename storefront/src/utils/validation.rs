//! Validation utilities for user input

use crate::core::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }

    /// Convert into a `Result`, so checks chain with `?`.
    pub fn into_result(self) -> Result<(), AppError> {
        match self.error {
            Some(message) if !self.is_valid => Err(AppError::Validation(message)),
            _ => Ok(()),
        }
    }
}

/// Non-blank check for a named field.
pub fn validate_required(field: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return ValidationResult::err(format!("{} is required", field));
    }
    ValidationResult::ok()
}

/// Validate email format
pub fn validate_email(email: &str) -> ValidationResult {
    let email = email.trim();
    if email.is_empty() {
        return ValidationResult::err("Email is required");
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return ValidationResult::err("Invalid email format");
    }

    if parts[0].is_empty() {
        return ValidationResult::err("Email username cannot be empty");
    }

    if parts[1].is_empty() || !parts[1].contains('.') || parts[1].ends_with('.') {
        return ValidationResult::err("Invalid email domain");
    }

    ValidationResult::ok()
}

/// Validate a phone number: 10 to 15 digits, optional leading `+`.
pub fn validate_phone(phone: &str) -> ValidationResult {
    let phone = phone.trim();
    if phone.is_empty() {
        return ValidationResult::err("Phone number is required");
    }

    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return ValidationResult::err("Phone number can only contain digits");
    }

    if !(10..=15).contains(&digits.len()) {
        return ValidationResult::err("Phone number must be 10 to 15 digits");
    }

    ValidationResult::ok()
}

/// Validate a new password. The backend only enforces a minimum length.
pub fn validate_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return ValidationResult::err("Password is required");
    }

    if password.chars().count() < 6 {
        return ValidationResult::err("Password must be at least 6 characters");
    }

    ValidationResult::ok()
}

/// Indian postal code: exactly six digits.
pub fn validate_pincode(pincode: &str) -> ValidationResult {
    let pincode = pincode.trim();
    if pincode.len() != 6 || !pincode.chars().all(|c| c.is_ascii_digit()) {
        return ValidationResult::err("Please enter a valid 6-digit pincode");
    }
    ValidationResult::ok()
}

pub fn validate_rating(rating: u8) -> ValidationResult {
    if rating == 0 {
        return ValidationResult::err("Please select a star rating");
    }
    if rating > 5 {
        return ValidationResult::err("Rating must be between 1 and 5");
    }
    ValidationResult::ok()
}

/// Parse a price typed into a form.
pub fn parse_price(raw: &str) -> Result<f64, AppError> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Price must be a number".to_string()))?;
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Validation("Price cannot be negative".to_string()));
    }
    Ok(price)
}

/// Parse a stock quantity typed into a form.
pub fn parse_quantity(raw: &str) -> Result<u32, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation("Quantity must be a whole number".to_string()))
}
