//! Authentication session manager
//!
//! Implements register, authenticate and end-session on top of an injected
//! credential store. Sessions are owned by the transport and passed in
//! explicitly on every call.

use log::{info, warn};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use super::credentials::CredentialStore;
use super::hasher::PasswordHasher;
use super::validator::{InputLimits, validate_identifier, validate_password};
use crate::error::handlers::{hash_failure, store_failure};
use crate::error::{AuthError, StoreError};

/// What the manager needs from a transport-owned session.
pub trait AuthSession {
    /// Current authentication flag (false once expired)
    fn is_authenticated(&self) -> bool;

    /// Set the authentication flag
    fn set_authenticated(&mut self, authenticated: bool);

    /// Invalidate the session; afterwards it reads as a fresh anonymous session
    fn destroy(&mut self);
}

/// Credential registration and verification plus the Anonymous/Authenticated
/// session transitions.
pub struct AuthSessionManager {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    limits: InputLimits,
}

impl AuthSessionManager {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: PasswordHasher, limits: InputLimits) -> Self {
        Self {
            store,
            hasher,
            limits,
        }
    }

    /// Registers a new identifier. Does not log the caller in.
    ///
    /// The existence check short-circuits before the expensive hash; the store's
    /// insert-if-absent `put` is what makes concurrent registrations safe.
    pub async fn register(&self, identifier: &str, password: SecretString) -> Result<bool, AuthError> {
        validate_identifier(identifier, &self.limits)?;
        validate_password(password.expose_secret(), &self.limits)?;

        let exists = self
            .store
            .exists(identifier)
            .await
            .map_err(|e| store_failure("register", e))?;
        if exists {
            info!("Registration rejected, identifier already present: {}", identifier);
            return Err(AuthError::AlreadyRegistered);
        }

        let password_hash = self
            .hasher
            .hash(password)
            .await
            .map_err(|e| hash_failure("register", e))?;

        match self.store.put(identifier, password_hash).await {
            Ok(()) => {
                info!("Registered {}", identifier);
                Ok(true)
            }
            Err(StoreError::AlreadyExists(_)) => {
                info!("Registration lost race for {}", identifier);
                Err(AuthError::AlreadyRegistered)
            }
            Err(e) => Err(store_failure("register", e)),
        }
    }

    /// Verifies credentials and marks the session authenticated on success.
    ///
    /// Unknown identifiers, wrong passwords and malformed input all yield
    /// `AuthError::InvalidCredentials`, and the session is left untouched.
    pub async fn authenticate<S>(
        &self,
        identifier: &str,
        password: SecretString,
        session: &mut S,
    ) -> Result<bool, AuthError>
    where
        S: AuthSession + Send + ?Sized,
    {
        if validate_identifier(identifier, &self.limits).is_err()
            || validate_password(password.expose_secret(), &self.limits).is_err()
        {
            return Err(AuthError::InvalidCredentials);
        }

        let credential = match self.store.get(identifier).await {
            Ok(credential) => credential,
            Err(StoreError::NotFound(_)) => {
                self.hasher
                    .verify_dummy(password)
                    .await
                    .map_err(|e| hash_failure("authenticate", e))?;
                warn!("Login failed for {}", identifier);
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(store_failure("authenticate", e)),
        };

        let verified = self
            .hasher
            .verify(password, credential.password_hash)
            .await
            .map_err(|e| hash_failure("authenticate", e))?;

        if !verified {
            warn!("Login failed for {}", identifier);
            return Err(AuthError::InvalidCredentials);
        }

        session.set_authenticated(true);
        info!("Login successful for {}", identifier);
        Ok(true)
    }

    /// Destroys the session. Idempotent.
    pub fn end_session<S: AuthSession + ?Sized>(&self, session: &mut S) -> bool {
        session.destroy();
        true
    }

    /// Reads the session's flag; a missing session is anonymous.
    pub fn is_authenticated<S: AuthSession + ?Sized>(&self, session: Option<&S>) -> bool {
        session.is_some_and(|s| s.is_authenticated())
    }
}
