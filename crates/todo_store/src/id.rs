//! Identifier allocation for the in-memory backend.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Monotonic identifier source shared by lists and todos.
///
/// Clones share the underlying counter, so every store built from the same
/// generator allocates from one sequence and collisions are structurally
/// impossible within the process. The relational backend does not use this;
/// it delegates identity to the storage engine's key generation.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: Arc<AtomicI64>,
}

impl IdGenerator {
    /// Creates a generator starting at 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates a generator whose first issued identifier is `first`.
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: Arc::new(AtomicI64::new(first)),
        }
    }

    /// Returns the next identifier. Never repeats for this counter.
    pub fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
