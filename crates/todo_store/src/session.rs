//! In-memory, session-scoped todo store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auth::{Argon2Verifier, CredentialVerifier};
use entities::{Todo, TodoList, User};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{seed, sort, IdGenerator, StoreOutcome, TodoStore, TodoStoreResult};

/// Reserved session key under which the todo-list tree is stored.
const TODO_LISTS_KEY: &str = "todo_lists";

/// An opaque per-session key-value bag supplied by the transport layer.
///
/// The store owns exactly one reserved key; every other key belongs to
/// other collaborators and is left untouched.
#[derive(Debug, Clone, Default)]
pub struct Session {
    values: serde_json::Map<String, Value>,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Writes a value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Removes a value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }
}

/// Shared handle to a session. The transport layer and the store hold the
/// same allocation, so a mutation on either side is visible to the other.
pub type SharedSession = Arc<RwLock<Session>>;

/// Creates a fresh shared session.
pub fn shared_session() -> SharedSession {
    Arc::new(RwLock::new(Session::new()))
}

/// Todo store persisted only within one session.
///
/// Every read hands back a deep copy of the matched subtree, so callers
/// cannot reach internal state through a returned value; every write
/// mutates the session tree in place. One session belongs to one browser
/// session in practice; concurrent requests racing on the same tree are a
/// known hazard, not a supported pattern.
pub struct SessionTodoStore {
    session: SharedSession,
    ids: IdGenerator,
    /// Out-of-band username -> password hash table used by sign-in.
    users: Arc<HashMap<String, String>>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl SessionTodoStore {
    /// Creates a store over the given session, seeding the example lists
    /// if the session holds none. Sign-in fails closed until a user table
    /// is supplied via [`SessionTodoStore::with_users`].
    pub async fn new(session: SharedSession, ids: IdGenerator) -> TodoStoreResult<Self> {
        Self::with_users(session, ids, Vec::new(), Arc::new(Argon2Verifier::new())).await
    }

    /// Creates a store with out-of-band provisioned accounts and a verifier.
    pub async fn with_users(
        session: SharedSession,
        ids: IdGenerator,
        users: Vec<User>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> TodoStoreResult<Self> {
        let users = users
            .into_iter()
            .map(|user| (user.username, user.password_hash))
            .collect();
        let store = Self {
            session,
            ids,
            users: Arc::new(users),
            verifier,
        };
        store.seed_if_empty().await?;
        Ok(store)
    }

    async fn seed_if_empty(&self) -> TodoStoreResult<()> {
        let mut session = self.session.write().await;
        if session.get(TODO_LISTS_KEY).is_none() {
            let lists = seed::seed_todo_lists(&self.ids);
            session.insert(TODO_LISTS_KEY, serde_json::to_value(&lists)?);
        }
        Ok(())
    }

    /// Deserializes the session tree. The returned lists are already a
    /// deep copy of the stored state.
    async fn read_lists(&self) -> TodoStoreResult<Vec<TodoList>> {
        let session = self.session.read().await;
        match session.get(TODO_LISTS_KEY) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(Vec::new()),
        }
    }

    /// Applies one write to the session tree under the write lock. The
    /// tree is written back only when the mutation reports `Applied`.
    async fn mutate<F>(&self, mutation: F) -> TodoStoreResult<StoreOutcome>
    where
        F: FnOnce(&mut Vec<TodoList>) -> StoreOutcome,
    {
        let mut session = self.session.write().await;
        let mut lists: Vec<TodoList> = match session.get(TODO_LISTS_KEY) {
            Some(value) => serde_json::from_value(value.clone())?,
            None => Vec::new(),
        };
        let outcome = mutation(&mut lists);
        if outcome.is_applied() {
            session.insert(TODO_LISTS_KEY, serde_json::to_value(&lists)?);
        }
        Ok(outcome)
    }
}

#[async_trait]
impl TodoStore for SessionTodoStore {
    async fn sorted_todo_lists(&self) -> TodoStoreResult<Vec<TodoList>> {
        let mut lists = self.read_lists().await?;
        for list in &mut lists {
            sort::sort_todos(&mut list.todos);
        }
        sort::sort_todo_lists(&mut lists);
        Ok(lists)
    }

    async fn load_todo_list(&self, list_id: i64) -> TodoStoreResult<Option<TodoList>> {
        let lists = self.read_lists().await?;
        Ok(lists
            .into_iter()
            .find(|list| list.id == list_id)
            .map(|mut list| {
                sort::sort_todos(&mut list.todos);
                list
            }))
    }

    async fn load_todo(&self, list_id: i64, todo_id: i64) -> TodoStoreResult<Option<Todo>> {
        let lists = self.read_lists().await?;
        Ok(lists
            .iter()
            .find(|list| list.id == list_id)
            .and_then(|list| list.find_todo(todo_id))
            .cloned())
    }

    async fn todo_list_title_exists(&self, title: &str) -> TodoStoreResult<bool> {
        let needle = title.to_lowercase();
        let lists = self.read_lists().await?;
        Ok(lists.iter().any(|list| list.title.to_lowercase() == needle))
    }

    async fn new_todo_list(&self, title: &str) -> TodoStoreResult<StoreOutcome> {
        let needle = title.to_lowercase();
        self.mutate(|lists| {
            if lists.iter().any(|list| list.title.to_lowercase() == needle) {
                return StoreOutcome::DuplicateTitle;
            }
            lists.push(TodoList::new(self.ids.next_id(), title));
            StoreOutcome::Applied
        })
        .await
    }

    async fn delete_todo_list(&self, list_id: i64) -> TodoStoreResult<StoreOutcome> {
        self.mutate(|lists| {
            match lists.iter().position(|list| list.id == list_id) {
                Some(index) => {
                    // Removing the list drops its todos with it.
                    lists.remove(index);
                    StoreOutcome::Applied
                }
                None => StoreOutcome::NotFound,
            }
        })
        .await
    }

    async fn set_title(&self, list_id: i64, title: &str) -> TodoStoreResult<StoreOutcome> {
        let needle = title.to_lowercase();
        self.mutate(|lists| {
            let taken = lists
                .iter()
                .any(|list| list.id != list_id && list.title.to_lowercase() == needle);
            if taken {
                return StoreOutcome::DuplicateTitle;
            }
            match lists.iter_mut().find(|list| list.id == list_id) {
                Some(list) => {
                    list.title = title.to_string();
                    StoreOutcome::Applied
                }
                None => StoreOutcome::NotFound,
            }
        })
        .await
    }

    async fn mark_all_done(&self, list_id: i64) -> TodoStoreResult<StoreOutcome> {
        let Some(list) = self.load_todo_list(list_id).await? else {
            return Ok(StoreOutcome::NotFound);
        };
        // Mark-all-done is defined as toggling each currently-undone item.
        for todo in list.todos.iter().filter(|todo| !todo.done) {
            self.toggle_done_todo(list_id, todo.id).await?;
        }
        Ok(StoreOutcome::Applied)
    }

    async fn add_todo(&self, list_id: i64, title: &str) -> TodoStoreResult<StoreOutcome> {
        self.mutate(|lists| match lists.iter_mut().find(|list| list.id == list_id) {
            Some(list) => {
                list.todos.push(Todo::new(self.ids.next_id(), title));
                StoreOutcome::Applied
            }
            None => StoreOutcome::NotFound,
        })
        .await
    }

    async fn toggle_done_todo(&self, list_id: i64, todo_id: i64) -> TodoStoreResult<StoreOutcome> {
        self.mutate(|lists| {
            let todo = lists
                .iter_mut()
                .find(|list| list.id == list_id)
                .and_then(|list| list.find_todo_mut(todo_id));
            match todo {
                Some(todo) => {
                    todo.done = !todo.done;
                    StoreOutcome::Applied
                }
                None => StoreOutcome::NotFound,
            }
        })
        .await
    }

    async fn delete_todo(&self, list_id: i64, todo_id: i64) -> TodoStoreResult<StoreOutcome> {
        self.mutate(|lists| {
            let Some(list) = lists.iter_mut().find(|list| list.id == list_id) else {
                return StoreOutcome::NotFound;
            };
            match list.todos.iter().position(|todo| todo.id == todo_id) {
                Some(index) => {
                    list.todos.remove(index);
                    StoreOutcome::Applied
                }
                None => StoreOutcome::NotFound,
            }
        })
        .await
    }

    async fn sign_in_user(&self, username: &str, password: &str) -> TodoStoreResult<bool> {
        // Unknown user short-circuits before the verifier runs.
        let Some(stored_hash) = self.users.get(username) else {
            return Ok(false);
        };
        Ok(self.verifier.verify(password, stored_hash).await?)
    }
}
