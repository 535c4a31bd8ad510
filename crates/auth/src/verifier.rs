//! Password hashing and verification.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use rand::RngCore;

use crate::{AuthError, AuthResult};

/// Capability for comparing a plaintext secret against a stored hash.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns `Ok(true)` iff the plaintext matches the stored hash.
    ///
    /// A mismatch is `Ok(false)`; only a malformed hash or an internal
    /// failure produces an error.
    async fn verify(&self, password: &str, stored_hash: &str) -> AuthResult<bool>;
}

/// Argon2id credential verifier.
///
/// Argon2id is a salted adaptive hash; default parameters follow the
/// `argon2` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Verifier;

impl Argon2Verifier {
    /// Creates a new verifier.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// Used for out-of-band account provisioning and tests; the persistence
    /// core itself only verifies.
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        let mut salt_bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut salt_bytes);
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Hash(e.to_string()))?;

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hash(e.to_string()))
    }
}

#[async_trait]
impl CredentialVerifier for Argon2Verifier {
    async fn verify(&self, password: &str, stored_hash: &str) -> AuthResult<bool> {
        let parsed =
            PasswordHash::new(stored_hash).map_err(|e| AuthError::InvalidHash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Verification(e.to_string())),
        }
    }
}
