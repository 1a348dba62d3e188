//! Session registry
//!
//! Tracks live connections and the session identity each one currently holds.

use std::collections::HashMap;
use std::net::SocketAddr;
use uuid::Uuid;

/// Registry for tracking active connections
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SocketAddr, Uuid>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, addr: SocketAddr, session_id: Uuid) {
        self.sessions.insert(addr, session_id);
    }

    /// Records a new identity for an existing connection (after logout).
    pub fn update(&mut self, addr: &SocketAddr, session_id: Uuid) -> bool {
        match self.sessions.get_mut(addr) {
            Some(current) => {
                *current = session_id;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, addr: &SocketAddr) -> Option<Uuid> {
        self.sessions.remove(addr)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn test_insert_update_remove() {
        let mut registry = SessionRegistry::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        registry.insert(addr(5000), first);
        assert_eq!(registry.len(), 1);

        assert!(registry.update(&addr(5000), second));
        assert!(!registry.update(&addr(5001), first));
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.remove(&addr(5000)), Some(second));
        assert_eq!(registry.remove(&addr(5000)), None);
        assert_eq!(registry.len(), 0);
    }
}
