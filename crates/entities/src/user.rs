//! User entity definitions.

use serde::{Deserialize, Serialize};

/// A registered user. Accounts are provisioned out-of-band; this core never
/// creates, mutates, or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique, case-sensitive username.
    pub username: String,
    /// Salted adaptive hash of the user's password.
    pub password_hash: String,
}

impl User {
    /// Creates a new user record.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}
