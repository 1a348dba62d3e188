//! Module `session`
//!
//! Defines the `Session` struct owned by each connection: a stable identity
//! plus the authentication flag the auth manager reads and sets.

use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::auth::AuthSession;

/// Represents the session of a connected client.
///
/// Starts anonymous. Authentication lasts until `destroy` or until `max_age`
/// has passed since login, whichever comes first.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    authenticated_at: Option<Instant>,
    max_age: Duration,
}

impl Session {
    /// Creates a fresh anonymous session.
    pub fn new(max_age: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            authenticated_at: None,
            max_age,
        }
    }

    /// Returns the session's current identity.
    ///
    /// Changes whenever the session is destroyed.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Sets the authentication lifetime, used when runtime config changes.
    pub fn set_max_age(&mut self, max_age: Duration) {
        self.max_age = max_age;
    }
}

impl AuthSession for Session {
    fn is_authenticated(&self) -> bool {
        self.authenticated_at
            .is_some_and(|at| at.elapsed() < self.max_age)
    }

    fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated_at = authenticated.then(Instant::now);
    }

    /// Drops the old identity and starts over anonymous.
    fn destroy(&mut self) {
        self.id = Uuid::new_v4();
        self.authenticated_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_anonymous() {
        let session = Session::new(Duration::from_secs(60));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_set_authenticated() {
        let mut session = Session::new(Duration::from_secs(60));
        session.set_authenticated(true);
        assert!(session.is_authenticated());
        session.set_authenticated(false);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_destroy_rotates_identity() {
        let mut session = Session::new(Duration::from_secs(60));
        session.set_authenticated(true);
        let old_id = session.id();

        session.destroy();

        assert!(!session.is_authenticated());
        assert_ne!(session.id(), old_id);
    }

    #[test]
    fn test_authentication_expires() {
        let mut session = Session::new(Duration::from_millis(20));
        session.set_authenticated(true);
        std::thread::sleep(Duration::from_millis(40));
        assert!(!session.is_authenticated());
    }
}
