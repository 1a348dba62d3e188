//! Authentication input validation
//!
//! Rejects malformed identifiers and passwords before any hashing happens.

use crate::error::AuthError;

/// Length limits applied to identifiers and passwords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLimits {
    pub max_identifier_length: usize,
    pub max_password_length: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_identifier_length: 254,
            max_password_length: 512,
        }
    }
}

/// Performs basic input sanitation to check for malicious or malformed input.
fn is_valid_input(input: &str, max_length: usize) -> bool {
    !input.is_empty() && input.len() <= max_length && !input.contains(['\r', '\n', '\0'])
}

/// Validates an identifier. Identifiers are otherwise opaque and compared exactly.
pub fn validate_identifier(identifier: &str, limits: &InputLimits) -> Result<(), AuthError> {
    if identifier.trim().is_empty() || !is_valid_input(identifier, limits.max_identifier_length) {
        return Err(AuthError::MalformedInput("Invalid identifier format".into()));
    }
    Ok(())
}

/// Validates a plaintext password's shape (never its strength).
///
/// Any non-empty password is accepted, including one made only of spaces.
pub fn validate_password(password: &str, limits: &InputLimits) -> Result<(), AuthError> {
    if !is_valid_input(password, limits.max_password_length) {
        return Err(AuthError::MalformedInput("Invalid password format".into()));
    }
    Ok(())
}
