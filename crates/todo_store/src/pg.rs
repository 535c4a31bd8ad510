//! PostgreSQL-backed todo store.

use std::sync::Arc;

use async_trait::async_trait;
use auth::CredentialVerifier;
use entities::{Todo, TodoList};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::debug;

use crate::schema::{self, TodoListRow, TodoRow};
use crate::{sort, StoreOutcome, TodoStore, TodoStoreResult};

/// Structured detection of a unique-constraint violation. Detection lives
/// in one place so the strategy stays swappable.
fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

/// Structured detection of a foreign-key violation.
fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
}

fn log_statement(statement: &str) {
    debug!(statement, "executing statement");
}

/// Todo store backed by PostgreSQL.
///
/// One instance is constructed per request for the authenticated user; the
/// connection pool is shared across instances. No operation spans a
/// transaction, so a caller's read-modify sequence is not atomic under
/// concurrent writes.
pub struct PgTodoStore {
    pool: PgPool,
    username: String,
    verifier: Arc<dyn CredentialVerifier>,
}

impl PgTodoStore {
    /// Creates a store scoped to `username` over a shared pool.
    pub fn new(
        pool: PgPool,
        username: impl Into<String>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            pool,
            username: username.into(),
            verifier,
        }
    }

    /// Connects a new pool and ensures the schema exists.
    pub async fn connect(database_url: &str) -> TodoStoreResult<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        schema::init_schema(&pool).await?;
        Ok(pool)
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn sorted_todo_lists(&self) -> TodoStoreResult<Vec<TodoList>> {
        const ALL_TODOLISTS: &str = "SELECT list_id, title FROM todolists WHERE username = $1";
        const ALL_TODOS: &str =
            "SELECT todo_id, list_id, title, done FROM todos WHERE username = $1";

        log_statement(ALL_TODOLISTS);
        log_statement(ALL_TODOS);
        let list_rows = sqlx::query_as::<_, TodoListRow>(ALL_TODOLISTS)
            .bind(&self.username)
            .fetch_all(&self.pool);
        let todo_rows = sqlx::query_as::<_, TodoRow>(ALL_TODOS)
            .bind(&self.username)
            .fetch_all(&self.pool);
        let (list_rows, todo_rows) = tokio::try_join!(list_rows, todo_rows)?;

        let mut lists: Vec<TodoList> = list_rows
            .into_iter()
            .map(|row| row.into_todo_list(Vec::new()))
            .collect();
        // In-memory join. The two queries are separate snapshots; a todo
        // whose list row is absent from the first result set is dropped.
        for row in todo_rows {
            if let Some(list) = lists.iter_mut().find(|list| list.id == row.list_id) {
                list.todos.push(row.into());
            }
        }

        for list in &mut lists {
            sort::sort_todos(&mut list.todos);
        }
        sort::sort_todo_lists(&mut lists);
        Ok(lists)
    }

    async fn load_todo_list(&self, list_id: i64) -> TodoStoreResult<Option<TodoList>> {
        const FIND_TODO_LIST: &str =
            "SELECT list_id, title FROM todolists WHERE list_id = $1 AND username = $2";
        const FIND_TODOS: &str =
            "SELECT todo_id, list_id, title, done FROM todos WHERE list_id = $1 AND username = $2";

        log_statement(FIND_TODO_LIST);
        let row = sqlx::query_as::<_, TodoListRow>(FIND_TODO_LIST)
            .bind(list_id)
            .bind(&self.username)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        log_statement(FIND_TODOS);
        let todo_rows = sqlx::query_as::<_, TodoRow>(FIND_TODOS)
            .bind(list_id)
            .bind(&self.username)
            .fetch_all(&self.pool)
            .await?;

        let mut list = row.into_todo_list(todo_rows.into_iter().map(Todo::from).collect());
        sort::sort_todos(&mut list.todos);
        Ok(Some(list))
    }

    async fn load_todo(&self, list_id: i64, todo_id: i64) -> TodoStoreResult<Option<Todo>> {
        const FIND_TODO: &str = "SELECT todo_id, list_id, title, done FROM todos \
             WHERE list_id = $1 AND todo_id = $2 AND username = $3";

        log_statement(FIND_TODO);
        let row = sqlx::query_as::<_, TodoRow>(FIND_TODO)
            .bind(list_id)
            .bind(todo_id)
            .bind(&self.username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Todo::from))
    }

    async fn todo_list_title_exists(&self, title: &str) -> TodoStoreResult<bool> {
        const CHECK_TITLE_EXISTS: &str =
            "SELECT count(*) FROM todolists WHERE username = $1 AND lower(title) = lower($2)";

        log_statement(CHECK_TITLE_EXISTS);
        let count: i64 = sqlx::query_scalar(CHECK_TITLE_EXISTS)
            .bind(&self.username)
            .bind(title)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn new_todo_list(&self, title: &str) -> TodoStoreResult<StoreOutcome> {
        const NEW_TODOLIST: &str = "INSERT INTO todolists (username, title) VALUES ($1, $2)";

        log_statement(NEW_TODOLIST);
        match sqlx::query(NEW_TODOLIST)
            .bind(&self.username)
            .bind(title)
            .execute(&self.pool)
            .await
        {
            Ok(_) => Ok(StoreOutcome::Applied),
            Err(error) if is_unique_violation(&error) => Ok(StoreOutcome::DuplicateTitle),
            Err(error) => Err(error.into()),
        }
    }

    async fn delete_todo_list(&self, list_id: i64) -> TodoStoreResult<StoreOutcome> {
        const DELETE_LIST: &str = "DELETE FROM todolists WHERE list_id = $1 AND username = $2";

        log_statement(DELETE_LIST);
        let result = sqlx::query(DELETE_LIST)
            .bind(list_id)
            .bind(&self.username)
            .execute(&self.pool)
            .await?;
        // Todos go with the list via the cascading foreign key.
        Ok(if result.rows_affected() > 0 {
            StoreOutcome::Applied
        } else {
            StoreOutcome::NotFound
        })
    }

    async fn set_title(&self, list_id: i64, title: &str) -> TodoStoreResult<StoreOutcome> {
        const SET_TITLE: &str =
            "UPDATE todolists SET title = $1 WHERE list_id = $2 AND username = $3";

        log_statement(SET_TITLE);
        match sqlx::query(SET_TITLE)
            .bind(title)
            .bind(list_id)
            .bind(&self.username)
            .execute(&self.pool)
            .await
        {
            Ok(result) if result.rows_affected() > 0 => Ok(StoreOutcome::Applied),
            Ok(_) => Ok(StoreOutcome::NotFound),
            Err(error) if is_unique_violation(&error) => Ok(StoreOutcome::DuplicateTitle),
            Err(error) => Err(error.into()),
        }
    }

    async fn mark_all_done(&self, list_id: i64) -> TodoStoreResult<StoreOutcome> {
        const MARK_ALL_DONE: &str =
            "UPDATE todos SET done = TRUE WHERE list_id = $1 AND username = $2 AND NOT done";
        const LIST_EXISTS: &str =
            "SELECT count(*) FROM todolists WHERE list_id = $1 AND username = $2";

        log_statement(MARK_ALL_DONE);
        let result = sqlx::query(MARK_ALL_DONE)
            .bind(list_id)
            .bind(&self.username)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            return Ok(StoreOutcome::Applied);
        }

        // Zero updated rows is ambiguous: the list may be absent, or it may
        // simply have nothing left to mark.
        log_statement(LIST_EXISTS);
        let count: i64 = sqlx::query_scalar(LIST_EXISTS)
            .bind(list_id)
            .bind(&self.username)
            .fetch_one(&self.pool)
            .await?;
        Ok(if count > 0 {
            StoreOutcome::Applied
        } else {
            StoreOutcome::NotFound
        })
    }

    async fn add_todo(&self, list_id: i64, title: &str) -> TodoStoreResult<StoreOutcome> {
        const INSERT_TODO: &str = "INSERT INTO todos (list_id, username, title) VALUES ($1, $2, $3)";

        log_statement(INSERT_TODO);
        match sqlx::query(INSERT_TODO)
            .bind(list_id)
            .bind(&self.username)
            .bind(title)
            .execute(&self.pool)
            .await
        {
            Ok(_) => Ok(StoreOutcome::Applied),
            // The composite foreign key rejects a list the user does not
            // own just like one that does not exist.
            Err(error) if is_foreign_key_violation(&error) => Ok(StoreOutcome::NotFound),
            Err(error) => Err(error.into()),
        }
    }

    async fn toggle_done_todo(&self, list_id: i64, todo_id: i64) -> TodoStoreResult<StoreOutcome> {
        const TOGGLE_DONE: &str = "UPDATE todos SET done = NOT done \
             WHERE list_id = $1 AND todo_id = $2 AND username = $3";

        log_statement(TOGGLE_DONE);
        let result = sqlx::query(TOGGLE_DONE)
            .bind(list_id)
            .bind(todo_id)
            .bind(&self.username)
            .execute(&self.pool)
            .await?;
        Ok(if result.rows_affected() > 0 {
            StoreOutcome::Applied
        } else {
            StoreOutcome::NotFound
        })
    }

    async fn delete_todo(&self, list_id: i64, todo_id: i64) -> TodoStoreResult<StoreOutcome> {
        const DELETE_TODO: &str =
            "DELETE FROM todos WHERE list_id = $1 AND todo_id = $2 AND username = $3";

        log_statement(DELETE_TODO);
        let result = sqlx::query(DELETE_TODO)
            .bind(list_id)
            .bind(todo_id)
            .bind(&self.username)
            .execute(&self.pool)
            .await?;
        Ok(if result.rows_affected() > 0 {
            StoreOutcome::Applied
        } else {
            StoreOutcome::NotFound
        })
    }

    async fn sign_in_user(&self, username: &str, password: &str) -> TodoStoreResult<bool> {
        const SIGN_IN: &str = "SELECT password_hash FROM users WHERE username = $1";

        log_statement(SIGN_IN);
        let stored: Option<String> = sqlx::query_scalar(SIGN_IN)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        // Unknown user short-circuits before the verifier runs.
        let Some(stored_hash) = stored else {
            return Ok(false);
        };
        Ok(self.verifier.verify(password, &stored_hash).await?)
    }
}
