//! Todo store trait definitions.

use async_trait::async_trait;
use entities::{Todo, TodoList};

use crate::TodoStoreResult;

/// Outcome of a write operation.
///
/// Absence and duplicate titles are expected, non-exceptional outcomes that
/// the caller must check and react to; infrastructure failures travel
/// through [`crate::TodoStoreError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The write was applied.
    Applied,
    /// The target list or todo does not exist under this user.
    NotFound,
    /// The write would give two of the user's lists the same title,
    /// compared case-insensitively.
    DuplicateTitle,
}

impl StoreOutcome {
    /// Whether the write took effect.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Trait for todo-list storage operations.
///
/// A store is constructed per request for one authenticated user, and every
/// operation is implicitly scoped to that user: rows or subtrees belonging
/// to anyone else are invisible, even by guessed identifier. The done
/// predicates of the data model live on [`TodoList`] itself and are uniform
/// across backends by construction.
#[async_trait]
pub trait TodoStore: Send + Sync {
    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns all of the user's lists with items attached, both levels in
    /// display order (undone first, then case-insensitive title).
    async fn sorted_todo_lists(&self) -> TodoStoreResult<Vec<TodoList>>;

    /// Loads one list with its items attached and pre-sorted.
    async fn load_todo_list(&self, list_id: i64) -> TodoStoreResult<Option<TodoList>>;

    /// Loads a single todo.
    async fn load_todo(&self, list_id: i64, todo_id: i64) -> TodoStoreResult<Option<Todo>>;

    /// Whether the user already has a list with this title, compared
    /// case-insensitively.
    async fn todo_list_title_exists(&self, title: &str) -> TodoStoreResult<bool>;

    // =========================================================================
    // List mutations
    // =========================================================================

    /// Creates a new empty list. `DuplicateTitle` means the caller should
    /// re-prompt for a different title.
    async fn new_todo_list(&self, title: &str) -> TodoStoreResult<StoreOutcome>;

    /// Deletes a list and, with it, all of its todos.
    async fn delete_todo_list(&self, list_id: i64) -> TodoStoreResult<StoreOutcome>;

    /// Renames a list, subject to the same title uniqueness rule as
    /// creation.
    async fn set_title(&self, list_id: i64, title: &str) -> TodoStoreResult<StoreOutcome>;

    /// Marks every todo in the list done. A list whose todos are already
    /// all done (or that has none) still reports `Applied`.
    async fn mark_all_done(&self, list_id: i64) -> TodoStoreResult<StoreOutcome>;

    // =========================================================================
    // Todo mutations
    // =========================================================================

    /// Appends a new undone todo to the list.
    async fn add_todo(&self, list_id: i64, title: &str) -> TodoStoreResult<StoreOutcome>;

    /// Flips one todo's done state.
    async fn toggle_done_todo(&self, list_id: i64, todo_id: i64) -> TodoStoreResult<StoreOutcome>;

    /// Deletes a single todo.
    async fn delete_todo(&self, list_id: i64, todo_id: i64) -> TodoStoreResult<StoreOutcome>;

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Checks a username/password pair against the stored credential hash.
    /// Unknown user and wrong password are both `false`, indistinguishably.
    async fn sign_in_user(&self, username: &str, password: &str) -> TodoStoreResult<bool>;
}
