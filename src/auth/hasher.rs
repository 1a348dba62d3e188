//! Password hashing
//!
//! Argon2id with configurable cost. Hashing and verification are CPU-bound and
//! deliberately slow, so both run on tokio's blocking pool and never stall the
//! connection tasks.

use argon2::password_hash::{self, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version};
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};

use crate::error::HashError;

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// Hashes and verifies passwords with Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    /// Hash of a throwaway password, verified against for unknown identifiers
    dummy_hash: String,
}

impl PasswordHasher {
    /// Build a hasher with the given cost. Computes one hash up front.
    pub fn new(cost: HashParams) -> Result<Self, HashError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| HashError::Hashing(e.to_string()))?;
        let dummy_hash = hash_blocking(&params, "rax-auth-server-dummy-password")?;
        Ok(Self { params, dummy_hash })
    }

    /// Same as `new`, with the up-front hash run on the blocking pool.
    pub async fn build(cost: HashParams) -> Result<Self, HashError> {
        tokio::task::spawn_blocking(move || Self::new(cost))
            .await
            .map_err(|e| HashError::Worker(e.to_string()))?
    }

    /// Hash a plaintext password into a PHC string with a fresh random salt
    pub async fn hash(&self, password: SecretString) -> Result<String, HashError> {
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || hash_blocking(&params, password.expose_secret()))
            .await
            .map_err(|e| HashError::Worker(e.to_string()))?
    }

    /// Check a plaintext password against a stored PHC string
    pub async fn verify(&self, password: SecretString, phc: String) -> Result<bool, HashError> {
        tokio::task::spawn_blocking(move || verify_blocking(password.expose_secret(), &phc))
            .await
            .map_err(|e| HashError::Worker(e.to_string()))?
    }

    /// Spend the same work as a real verification, for identifiers with no credential
    pub async fn verify_dummy(&self, password: SecretString) -> Result<(), HashError> {
        self.verify(password, self.dummy_hash.clone()).await.map(|_| ())
    }
}

fn hash_blocking(params: &Params, password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone())
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError::Hashing(e.to_string()))
}

fn verify_blocking(password: &str, phc: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(phc).map_err(|e| HashError::InvalidHash(e.to_string()))?;
    // Cost is read back from the PHC string, not from this instance
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(HashError::InvalidHash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordHasher {
        PasswordHasher::new(HashParams {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn test_hash_is_not_plaintext() {
        let hasher = cheap();
        let hash = hasher.hash(secret("Secr3t!")).await.unwrap();

        assert!(hash.starts_with("$argon2id$v=19$m=8,t=1,p=1$"));
        assert!(!hash.contains("Secr3t!"));
    }

    #[tokio::test]
    async fn test_hash_is_salted() {
        let hasher = cheap();
        let a = hasher.hash(secret("same")).await.unwrap();
        let b = hasher.hash(secret("same")).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_verify() {
        let hasher = cheap();
        let hash = hasher.hash(secret("correct horse")).await.unwrap();

        assert!(hasher.verify(secret("correct horse"), hash.clone()).await.unwrap());
        assert!(!hasher.verify(secret("correct hors"), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_rejects_garbage_hash() {
        let hasher = cheap();
        let result = hasher.verify(secret("pw"), "not-a-phc-string".into()).await;
        assert!(matches!(result, Err(HashError::InvalidHash(_))));
    }

    #[tokio::test]
    async fn test_verify_dummy_succeeds() {
        assert!(cheap().verify_dummy(secret("anything")).await.is_ok());
    }

    #[tokio::test]
    async fn test_build_off_runtime() {
        let hasher = PasswordHasher::build(HashParams {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .await
        .unwrap();
        let hash = hasher.hash(secret("pw")).await.unwrap();
        assert!(hasher.verify(secret("pw"), hash).await.unwrap());

        let invalid = PasswordHasher::build(HashParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        })
        .await;
        assert!(matches!(invalid, Err(HashError::Hashing(_))));
    }

    #[test]
    fn test_rejects_invalid_params() {
        let result = PasswordHasher::new(HashParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(HashError::Hashing(_))));
    }
}
