//! Credential hashing contract
//!
//! The auth core treats the hash algorithm as a pluggable primitive with the
//! contract "one-way, salted, verifiable". The default implementation is
//! bcrypt; deployments with different requirements swap the trait object at
//! construction.

use bcrypt::DEFAULT_COST;

/// One-way credential hashing primitive
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext credential for storage
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError>;

    /// Verify a plaintext credential against a stored hash
    fn verify(&self, plaintext: &str, credential_hash: &str) -> Result<bool, CredentialError>;
}

/// Credential hashing errors
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential hashing failed: {0}")]
    Hash(String),
}

/// Bcrypt-backed credential hasher
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a hasher with the bcrypt default cost
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Create a hasher with an explicit cost factor
    ///
    /// Lower costs are only appropriate for tests.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| CredentialError::Hash(e.to_string()))
    }

    fn verify(&self, plaintext: &str, credential_hash: &str) -> Result<bool, CredentialError> {
        bcrypt::verify(plaintext, credential_hash)
            .map_err(|e| CredentialError::Hash(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify_roundtrip() {
        let hasher = BcryptHasher::with_cost(4);
        let hash = hasher.hash("correct horse").unwrap();

        assert_ne!(hash, "correct horse");
        assert!(hasher.verify("correct horse", &hash).unwrap());
        assert!(!hasher.verify("battery staple", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = BcryptHasher::with_cost(4);
        let a = hasher.hash("same input").unwrap();
        let b = hasher.hash("same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_errors() {
        let hasher = BcryptHasher::with_cost(4);
        assert!(hasher.verify("anything", "not-a-bcrypt-hash").is_err());
    }
}
