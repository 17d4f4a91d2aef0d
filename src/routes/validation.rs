use axum::extract::{FromRequest, FromRequestParts};

use crate::constants::{ERR_INVALID_EMAIL, ERR_WEAK_PASSWORD, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, Result};
use crate::models::account::{normalize_email, validate_email};

/// JSON body extractor whose rejections become [`AppError::InvalidInput`] (400)
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameter extractor; an unparsable id is a structured 404
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// A required, non-blank text field, trimmed
pub fn required_text(field: &str, value: Option<String>, max_len: usize) -> Result<String> {
    match value {
        Some(value) => non_blank_text(field, value, max_len),
        None => Err(AppError::InvalidInput(format!("{field} is required"))),
    }
}

/// A text field that may be present but must not be blank when it is
pub fn updated_text(field: &str, value: Option<String>, max_len: usize) -> Result<Option<String>> {
    value
        .map(|value| non_blank_text(field, value, max_len))
        .transpose()
}

/// An optional text field where blank means "empty", trimmed
pub fn optional_text(field: &str, value: Option<String>, max_len: usize) -> Result<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };

    let trimmed = value.trim();
    check_length(field, trimmed, max_len)?;
    Ok(Some(trimmed.to_string()))
}

fn non_blank_text(field: &str, value: String, max_len: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{field} may not be blank")));
    }
    check_length(field, trimmed, max_len)?;
    Ok(trimmed.to_string())
}

fn check_length(field: &str, value: &str, max_len: usize) -> Result<()> {
    if value.chars().count() > max_len {
        return Err(AppError::InvalidInput(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}

/// Validate and normalize an email address for registration
pub fn email_address(value: Option<String>) -> Result<String> {
    let raw = value.ok_or_else(|| AppError::InvalidInput("email is required".to_string()))?;
    let email = normalize_email(&raw);

    if !validate_email(&email) {
        tracing::warn!("Rejected malformed email address");
        return Err(AppError::InvalidInput(ERR_INVALID_EMAIL.to_string()));
    }
    Ok(email)
}

/// Password complexity rules for new passwords
///
/// - 8 to 128 characters
/// - at least one letter and one digit
pub fn validate_password(password: &str) -> Result<()> {
    let length = password.chars().count();
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) || !has_letter || !has_digit
    {
        return Err(AppError::InvalidInput(ERR_WEAK_PASSWORD.to_string()));
    }
    Ok(())
}

/// A password that must be present but is not checked for complexity (login, confirmations)
///
/// Anything longer than a registrable password is rejected before hashing.
pub fn password_input(value: Option<String>) -> Result<String> {
    match value {
        Some(password) if password.chars().count() > MAX_PASSWORD_LENGTH => {
            Err(AppError::InvalidInput(format!(
                "password must be at most {MAX_PASSWORD_LENGTH} characters"
            )))
        }
        Some(password) if !password.trim().is_empty() => Ok(password),
        _ => Err(AppError::InvalidInput("password is required".to_string())),
    }
}
