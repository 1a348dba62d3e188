//! Error handlers
//!
//! Maps errors to protocol reply codes and logs internal failures.

use crate::error::types::{AuthError, HashError, StoreError};
use crate::protocol::responses;
use log::error;

/// Log a store failure and collapse it to the opaque internal error
pub fn store_failure(context: &str, err: StoreError) -> AuthError {
    error!("Credential store failure during {}: {}", context, err);
    AuthError::Internal
}

/// Log a hashing failure and collapse it to the opaque internal error
pub fn hash_failure(context: &str, err: HashError) -> AuthError {
    error!("Password hashing failure during {}: {}", context, err);
    AuthError::Internal
}

/// Convert an auth error to its reply code
pub fn error_to_reply_code(err: &AuthError) -> u16 {
    match err {
        AuthError::AlreadyRegistered => responses::ALREADY_REGISTERED,
        AuthError::InvalidCredentials => responses::AUTH_FAILED,
        AuthError::MalformedInput(_) => responses::SYNTAX_ERROR,
        AuthError::Internal => responses::INTERNAL_ERROR,
    }
}
