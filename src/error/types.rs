//! Error types
//!
//! Defines domain-specific error types for each module of the auth server.

use std::io;
use thiserror::Error;

/// Errors returned by the authentication operations.
///
/// `InvalidCredentials` covers both an unknown identifier and a wrong
/// password so callers cannot tell which identifiers exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("This user already exists, please log in.")]
    AlreadyRegistered,

    #[error("User email or password is incorrect.")]
    InvalidCredentials,

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Store or hashing failure; the detail is logged, never returned.
    #[error("Internal server error")]
    Internal,
}

/// Credential store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential already exists: {0}")]
    AlreadyExists(String),

    #[error("credential not found: {0}")]
    NotFound(String),

    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum HashError {
    #[error("failed to hash password: {0}")]
    Hashing(String),

    #[error("stored hash is not a valid PHC string: {0}")]
    InvalidHash(String),

    #[error("hashing worker failed: {0}")]
    Worker(String),
}

/// Errors that stop the server from starting or serving
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("password hasher setup failed: {0}")]
    Hasher(#[from] HashError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "User email or password is incorrect."
        );
    }

    #[test]
    fn test_internal_hides_detail() {
        assert_eq!(AuthError::Internal.to_string(), "Internal server error");
    }

    #[test]
    fn test_server_error_from_io() {
        let err: ServerError = io::Error::new(io::ErrorKind::AddrInUse, "busy").into();
        assert_eq!(err.to_string(), "I/O error: busy");
    }
}
