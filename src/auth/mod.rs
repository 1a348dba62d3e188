//! Authentication system
//!
//! Credential storage, password hashing, input validation and the session
//! state transitions built on top of them.

pub mod credentials;
pub mod hasher;
pub mod manager;
pub mod validator;

pub use credentials::{Credential, CredentialStore, MemoryCredentialStore};
pub use hasher::{HashParams, PasswordHasher};
pub use manager::{AuthSession, AuthSessionManager};
pub use validator::InputLimits;
