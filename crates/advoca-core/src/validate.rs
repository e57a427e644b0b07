//! Client-side form validation.
//!
//! These checks run before any network call; a failure here is local and
//! terminal, with the user-visible message carried verbatim in
//! [`AdvocaError::Validation`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AdvocaError, Result};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Checks the login form fields.
pub fn login_fields(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(AdvocaError::validation("Please enter your email address"));
    }
    if password.is_empty() {
        return Err(AdvocaError::validation("Please enter your password"));
    }
    email_shape(email)
}

/// Checks the signup form fields. Confirmation matching is a separate
/// check ([`password_confirmation`]) because it only exists in the form,
/// not in the signup operation itself.
pub fn signup_fields(name: &str, email: &str, password: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AdvocaError::validation("Please enter your full name"));
    }
    if email.trim().is_empty() {
        return Err(AdvocaError::validation("Please enter your email address"));
    }
    email_shape(email)?;
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AdvocaError::validation(
            "Password must be at least 6 characters long",
        ));
    }
    Ok(())
}

/// Checks that an email has a plausible shape.
pub fn email_shape(email: &str) -> Result<()> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(AdvocaError::validation("Please enter a valid email address"));
    }
    Ok(())
}

/// Checks that the two password fields of the signup form agree.
pub fn password_confirmation(password: &str, confirmation: &str) -> Result<()> {
    if password != confirmation {
        return Err(AdvocaError::validation("Passwords do not match"));
    }
    Ok(())
}

/// Checks a free-form analysis query.
pub fn query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(AdvocaError::validation("Please enter a query"));
    }
    Ok(())
}

/// Checks the case text submitted for judgment prediction.
pub fn case_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(AdvocaError::validation("Please enter case text"));
    }
    Ok(())
}
