//! Username validation for the name registry.
//!
//! The registry is password-less, so the only rule that matters is the name
//! shape: lowercase latin letters, digits and underscores, 3 to 15 characters.
//! Names are case-normalized to lowercase before the check so `Neo` and `neo`
//! are the same identity.

/// Minimum username length in characters.
pub const USERNAME_MIN: usize = 3;
/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 15;

/// Username validation errors with user-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum UsernameError {
    #[error("username is too short (minimum {USERNAME_MIN} characters)")]
    TooShort,

    #[error("username is too long (maximum {USERNAME_MAX} characters)")]
    TooLong,

    #[error("username may only contain latin letters, digits and underscores")]
    InvalidCharacters,
}

/// Validate a raw username and return its canonical lowercase form.
///
/// The accepted shape is `[a-z0-9_]{3,15}` after lowercasing.
pub fn validate_username(raw: &str) -> Result<String, UsernameError> {
    let name = raw.trim().to_lowercase();
    let len = name.chars().count();
    if len < USERNAME_MIN {
        return Err(UsernameError::TooShort);
    }
    if len > USERNAME_MAX {
        return Err(UsernameError::TooLong);
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(UsernameError::InvalidCharacters);
    }
    Ok(name)
}
