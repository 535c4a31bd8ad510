//! Credential verification for the todo-list manager.
//!
//! This crate provides:
//! - The [`CredentialVerifier`] capability consumed by the persistence layer
//! - An Argon2id implementation backed by the `argon2` crate
//!
//! The persistence layer treats verification as opaque: it hands over a
//! plaintext secret and a stored hash and receives a match/no-match answer.
//! Plaintext is never stored.

mod error;
mod verifier;

pub use error::*;
pub use verifier::*;
