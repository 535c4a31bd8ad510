//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during credential operations.
///
/// A password mismatch is not an error; it is reported as `Ok(false)` by
/// [`crate::CredentialVerifier::verify`] so that callers cannot tell a
/// mismatch apart from an unknown user.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// The stored hash could not be parsed.
    #[error("malformed password hash: {0}")]
    InvalidHash(String),

    /// Verification failed for a reason other than a mismatch.
    #[error("password verification failed: {0}")]
    Verification(String),
}

/// Result type for credential operations.
pub type AuthResult<T> = Result<T, AuthError>;
