//! Cryptographic primitives for the token codec
//!
//! Signature computation and comparison live here so the codec itself stays
//! free of timing-sensitive code.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

/// Pre-validated signing key for token signatures.
///
/// Length is checked once at construction; signing afterwards cannot fail,
/// and the key clones cheaply into every component that signs or verifies.
#[derive(Clone)]
pub struct SigningKey {
    secret: Arc<[u8]>,
}

impl SigningKey {
    /// Minimum allowed secret length in bytes (256 bits)
    pub const MIN_SECRET_LEN: usize = 32;

    /// Create a signing key from secret bytes.
    ///
    /// # Errors
    /// Returns an error if the secret is shorter than 32 bytes.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, SigningKeyError> {
        let secret = secret.as_ref();
        if secret.len() < Self::MIN_SECRET_LEN {
            return Err(SigningKeyError::SecretTooShort {
                actual: secret.len(),
                minimum: Self::MIN_SECRET_LEN,
            });
        }
        Ok(Self {
            secret: Arc::from(secret),
        })
    }

    /// Compute the HMAC-SHA256 signature of `data`
    pub fn sign(&self, data: &[u8]) -> [u8; 32] {
        // Length was validated in new(), so key construction cannot fail
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.secret)
            .expect("signing key length already validated");
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    /// Verify a signature over `data` in constant time
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        constant_time_eq(&self.sign(data), signature)
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("secret_len", &self.secret.len())
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when creating a signing key
#[derive(Debug, Clone, thiserror::Error)]
pub enum SigningKeyError {
    #[error("signing secret too short: got {actual} bytes, need at least {minimum}")]
    SecretTooShort { actual: usize, minimum: usize },
}

/// Constant-time byte slice comparison.
///
/// Comparison time depends only on the slice length, never on where the
/// first difference occurs. Length itself is not treated as secret.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    // XOR accumulator: zero iff every byte pair matches
    let diff = a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}
