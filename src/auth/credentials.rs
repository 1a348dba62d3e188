//! Credential storage and management
//!
//! Maps user identifiers to salted password hashes. The store is created by
//! the process entry point and injected wherever it is needed.

use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// A registered user's identifier and password hash (PHC string).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub identifier: String,
    pub password_hash: String,
}

/// Storage contract for credentials.
///
/// `put` must be an atomic insert-if-absent: it never overwrites an existing
/// identifier and reports `StoreError::AlreadyExists` instead.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Whether a credential exists for the identifier
    async fn exists(&self, identifier: &str) -> Result<bool, StoreError>;

    /// Insert a new credential
    async fn put(&self, identifier: &str, password_hash: String) -> Result<(), StoreError>;

    /// Fetch the credential for the identifier
    async fn get(&self, identifier: &str) -> Result<Credential, StoreError>;
}

/// In-memory credential store, lives for the process lifetime
#[derive(Default)]
pub struct MemoryCredentialStore {
    credentials: RwLock<HashMap<String, Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credentials
    pub async fn len(&self) -> usize {
        self.credentials.read().await.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn exists(&self, identifier: &str) -> Result<bool, StoreError> {
        Ok(self.credentials.read().await.contains_key(identifier))
    }

    async fn put(&self, identifier: &str, password_hash: String) -> Result<(), StoreError> {
        let mut credentials = self.credentials.write().await;
        match credentials.entry(identifier.to_string()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(identifier.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(Credential {
                    identifier: identifier.to_string(),
                    password_hash,
                });
                Ok(())
            }
        }
    }

    async fn get(&self, identifier: &str) -> Result<Credential, StoreError> {
        self.credentials
            .read()
            .await
            .get(identifier)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(identifier.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_store_is_object_safe() {
        fn _takes_boxed(_: Box<dyn CredentialStore>) {}
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryCredentialStore::new();
        assert!(!store.exists("alice").await.unwrap());

        store.put("alice", "$argon2id$hash".into()).await.unwrap();

        assert!(store.exists("alice").await.unwrap());
        let credential = store.get("alice").await.unwrap();
        assert_eq!(credential.identifier, "alice");
        assert_eq!(credential.password_hash, "$argon2id$hash");
    }

    #[tokio::test]
    async fn test_put_never_overwrites() {
        let store = MemoryCredentialStore::new();
        store.put("alice", "first".into()).await.unwrap();

        let err = store.put("alice", "second".into()).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(ref id) if id == "alice"));
        assert_eq!(store.get("alice").await.unwrap().password_hash, "first");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryCredentialStore::new();
        assert!(matches!(
            store.get("nobody").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_identifiers_are_case_sensitive() {
        let store = MemoryCredentialStore::new();
        store.put("Alice@Example.com", "h".into()).await.unwrap();
        assert!(!store.exists("alice@example.com").await.unwrap());
    }
}
