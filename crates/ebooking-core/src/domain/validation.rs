//! Pre-submit validation of login and register forms.
//!
//! These rules run *before* any network exchange: an obviously invalid form
//! never costs a round trip.  Rules are checked in a fixed order and the
//! first failure wins — emptiness in field-declaration order first, then
//! format checks.  The error messages here are user-facing and must stay
//! word-for-word stable.
//!
//! Format is otherwise the server's concern: login performs no checks
//! beyond non-emptiness.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum username length for registration.
const MIN_USERNAME_LEN: usize = 5;
/// Minimum password length for registration.
const MIN_PASSWORD_LEN: usize = 3;
/// Exact card number length, all decimal digits.
const CARD_NUMBER_LEN: usize = 10;

/// A validation rule failure, carrying the exact message shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was left blank.  The payload is the display name of
    /// the field ("Username", "Password", "Card number").
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("Username is too short (min. 5)")]
    UsernameTooShort,

    /// Username contains a non-alphanumeric character.
    #[error("Invalid username")]
    InvalidUsername,

    #[error("Password is too short (min. 3)")]
    PasswordTooShort,

    /// Card number is not exactly ten decimal digits.
    #[error("Invalid card number")]
    InvalidCardNumber,
}

/// User-entered login credentials, pending validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// User-entered registration details, pending validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub card_number: String,
}

/// Validates a login form: both fields non-empty, nothing more.
///
/// # Errors
///
/// Returns the first failing rule as a [`ValidationError`].
pub fn validate_login(form: &LoginForm) -> Result<(), ValidationError> {
    require_non_empty(&[("Username", &form.username), ("Password", &form.password)])
}

/// Validates a registration form.
///
/// Order: emptiness (Username, Password, Card number), then username length,
/// username alphanumeric, password length, card number format.
///
/// # Errors
///
/// Returns the first failing rule as a [`ValidationError`].
pub fn validate_register(form: &RegisterForm) -> Result<(), ValidationError> {
    require_non_empty(&[
        ("Username", &form.username),
        ("Password", &form.password),
        ("Card number", &form.card_number),
    ])?;

    // Lengths count characters, not bytes, so multibyte input is measured
    // the way the user sees it.
    if form.username.chars().count() < MIN_USERNAME_LEN {
        return Err(ValidationError::UsernameTooShort);
    }
    if !form.username.chars().all(char::is_alphanumeric) {
        return Err(ValidationError::InvalidUsername);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    // ASCII `0-9` only.  The legacy client accepted any Unicode decimal
    // digit here; card numbers are deliberately held to the stricter rule.
    if form.card_number.chars().count() != CARD_NUMBER_LEN
        || !form.card_number.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidCardNumber);
    }

    Ok(())
}

fn require_non_empty(fields: &[(&'static str, &str)]) -> Result<(), ValidationError> {
    for (name, value) in fields {
        if value.is_empty() {
            return Err(ValidationError::EmptyField(name));
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
