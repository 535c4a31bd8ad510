//! Todo list and todo item entity definitions.

use serde::{Deserialize, Serialize};

/// A single todo item belonging to exactly one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier within the backend instance.
    pub id: i64,
    /// Item title, 1-100 characters.
    pub title: String,
    /// Whether the item has been completed.
    #[serde(default)]
    pub done: bool,
}

impl Todo {
    /// Creates a new undone todo.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
        }
    }
}

/// A named, user-owned collection of todo items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    /// Unique identifier within the backend instance.
    pub id: i64,
    /// List title, 1-100 characters, case-insensitive-unique per user.
    pub title: String,
    /// The items in this list. Display order is derived, not stored.
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl TodoList {
    /// Creates a new empty list.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            todos: Vec::new(),
        }
    }

    /// A list is done iff it has at least one todo and every todo is done.
    /// An empty list is never done.
    pub fn is_done(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|todo| todo.done)
    }

    /// Whether the list has at least one undone todo.
    pub fn has_undone_todos(&self) -> bool {
        self.todos.iter().any(|todo| !todo.done)
    }

    /// Number of done todos in this list.
    pub fn done_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.done).count()
    }

    /// Finds a todo by id.
    pub fn find_todo(&self, todo_id: i64) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == todo_id)
    }

    /// Finds a todo by id, mutably.
    pub fn find_todo_mut(&mut self, todo_id: i64) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == todo_id)
    }
}
