//! Input validation for the public endpoints.
//!
//! Runs at the boundary, before any store query. Contracts follow the
//! original service: identifier is an email or a phone number (digits,
//! at least 10), password is at least 6 characters.

use crate::error::AppError;

/// Minimum password length.
const MIN_PASSWORD_LEN: usize = 6;

/// Minimum digits in a phone identifier.
const MIN_PHONE_DIGITS: usize = 10;

/// Validate a signup/signin body. Returns the trimmed identifier and
/// password on success.
pub fn validate_credentials<'a>(
    id: &'a str,
    password: &'a str,
) -> Result<(&'a str, &'a str), AppError> {
    let id = id.trim();
    let password = password.trim();

    if id.is_empty() {
        return Err(AppError::Validation("Identifier is required".into()));
    }
    if !is_valid_email(id) && !is_valid_phone(id) {
        return Err(AppError::Validation(
            "Identifier must be a valid email address or phone number".into(),
        ));
    }
    if password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }
    Ok((id, password))
}

/// Validate a refresh body.
pub fn validate_refresh_token(token: &str) -> Result<&str, AppError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Validation("Refresh token is required".into()));
    }
    Ok(token)
}

/// Resolve pagination query parameters: defaults 10/1, non-positive
/// values fall back to the defaults (the original clamps, it does not
/// reject). Returns (list_size, page).
pub fn page_params(list_size: Option<i64>, page: Option<i64>) -> (i64, i64) {
    let list_size = match list_size {
        Some(n) if n >= 1 => n,
        _ => 10,
    };
    let page = match page {
        Some(n) if n >= 1 => n,
        _ => 1,
    };
    (list_size, page)
}

/// `local@domain.tld` with the original's character classes.
fn is_valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'))
    {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if host.is_empty()
        || !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'))
    {
        return false;
    }
    tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Digits only, at least 10 of them.
fn is_valid_phone(s: &str) -> bool {
    s.len() >= MIN_PHONE_DIGITS && s.chars().all(|c| c.is_ascii_digit())
}
