//! Relational schema and row types for the PostgreSQL backend.

use entities::{Todo, TodoList};
use sqlx::{FromRow, PgPool};

use crate::TodoStoreResult;

/// SQL schema definition
///
/// The composite foreign key on `todos` pins every todo to a list owned by
/// the same user, so a scoped insert can never attach an item to another
/// user's list.
pub const SCHEMA_SQL: &str = r#"
-- Users table; accounts are provisioned out-of-band
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    password_hash TEXT NOT NULL
);

-- Todo lists table
CREATE TABLE IF NOT EXISTS todolists (
    list_id BIGSERIAL PRIMARY KEY,
    username TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
    title TEXT NOT NULL CHECK (char_length(title) BETWEEN 1 AND 100),
    UNIQUE (list_id, username)
);

-- Per-user, case-insensitive title uniqueness
CREATE UNIQUE INDEX IF NOT EXISTS todolists_username_lower_title_idx
    ON todolists (username, lower(title));

-- Todos table
CREATE TABLE IF NOT EXISTS todos (
    todo_id BIGSERIAL PRIMARY KEY,
    list_id BIGINT NOT NULL,
    username TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
    title TEXT NOT NULL CHECK (char_length(title) BETWEEN 1 AND 100),
    done BOOLEAN NOT NULL DEFAULT FALSE,
    FOREIGN KEY (list_id, username)
        REFERENCES todolists(list_id, username) ON DELETE CASCADE
);
"#;

/// Creates the todo tables if they do not exist.
pub async fn init_schema(pool: &PgPool) -> TodoStoreResult<()> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

/// Database row for TodoList; todos are attached separately.
#[derive(Debug, FromRow)]
pub(crate) struct TodoListRow {
    pub list_id: i64,
    pub title: String,
}

impl TodoListRow {
    pub fn into_todo_list(self, todos: Vec<Todo>) -> TodoList {
        TodoList {
            id: self.list_id,
            title: self.title,
            todos,
        }
    }
}

/// Database row for Todo
#[derive(Debug, FromRow)]
pub(crate) struct TodoRow {
    pub todo_id: i64,
    pub list_id: i64,
    pub title: String,
    pub done: bool,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: row.todo_id,
            title: row.title,
            done: row.done,
        }
    }
}
