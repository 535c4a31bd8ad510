//! Todo store error types.

use thiserror::Error;

/// Hard failures surfaced by store operations.
///
/// Expected conditions never appear here: an absent list or todo, a
/// duplicate title, and a failed sign-in are all reported through
/// [`crate::StoreOutcome`] or plain return values. Errors of this type
/// cross the store boundary unchanged and are never retried or swallowed.
#[derive(Debug, Error)]
pub enum TodoStoreError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Credential verifier error.
    #[error("Credential error: {0}")]
    Credential(#[from] auth::AuthError),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Result type for todo store operations.
pub type TodoStoreResult<T> = Result<T, TodoStoreError>;
