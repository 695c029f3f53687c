//! Password hashing
//!
//! New hashes use the configured algorithm (bcrypt by default, cost 10).
//! Verification recognises both bcrypt and argon2 hashes, so changing the
//! algorithm does not lock out users whose hash predates the change.
//!
//! Both algorithms are intentionally CPU-intensive; the async variants run
//! on the blocking thread pool.

use crate::config::{PasswordAlgorithm, PasswordConfig};
use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Password hashing service
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    algorithm: PasswordAlgorithm,
    bcrypt_cost: u32,
}

impl PasswordService {
    pub fn new(algorithm: PasswordAlgorithm, bcrypt_cost: u32) -> Self {
        Self {
            algorithm,
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &PasswordConfig) -> Self {
        Self::new(config.algorithm, config.bcrypt_cost)
    }

    /// Hash a password (blocking operation)
    pub fn hash(&self, password: &str) -> Result<String> {
        match self.algorithm {
            PasswordAlgorithm::Bcrypt => bcrypt::hash(password, self.bcrypt_cost)
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e)),
            PasswordAlgorithm::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
                Ok(hash.to_string())
            }
        }
    }

    /// Hash a password without blocking the async runtime
    pub async fn hash_async(self, password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || self.hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// The hash format decides the algorithm, not the current configuration.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        if hash.starts_with("$argon2") {
            let parsed_hash = PasswordHash::new(hash)
                .map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
            return Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok());
        }

        bcrypt::verify(password, hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))
    }

    /// Verify a password without blocking the async runtime
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests fast
    fn bcrypt_service() -> PasswordService {
        PasswordService::new(PasswordAlgorithm::Bcrypt, 4)
    }

    #[test]
    fn test_bcrypt_hash_and_verify() {
        let hash = bcrypt_service().hash("pw123").unwrap();

        assert!(hash.starts_with("$2"));
        assert!(PasswordService::verify("pw123", &hash).unwrap());
        assert!(!PasswordService::verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_argon2_hash_and_verify() {
        let service = PasswordService::new(PasswordAlgorithm::Argon2, 4);
        let hash = service.hash("secure_password_123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify("secure_password_123", &hash).unwrap());
        assert!(!PasswordService::verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let service = bcrypt_service();
        let hash1 = service.hash("test_password").unwrap();
        let hash2 = service.hash("test_password").unwrap();

        // Hashes should be different due to random salt
        assert_ne!(hash1, hash2);
        assert!(PasswordService::verify("test_password", &hash1).unwrap());
        assert!(PasswordService::verify("test_password", &hash2).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        assert!(PasswordService::verify("pw", "not-a-hash").is_err());
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let hash = bcrypt_service()
            .hash_async("async_test_password".to_string())
            .await
            .unwrap();

        assert!(
            PasswordService::verify_async("async_test_password".to_string(), hash.clone())
                .await
                .unwrap()
        );
        assert!(!PasswordService::verify_async("wrong".to_string(), hash)
            .await
            .unwrap());
    }
}
