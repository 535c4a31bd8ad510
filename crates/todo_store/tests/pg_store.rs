//! Integration tests for PgTodoStore.
//!
//! These tests require a running PostgreSQL database. Set DATABASE_URL and
//! run them explicitly:
//!
//! ```bash
//! export DATABASE_URL="postgresql://localhost/todos_test"
//! cargo test --package todo_store -- --ignored
//! ```

use std::sync::Arc;

use auth::Argon2Verifier;
use entities::User;
use sqlx::PgPool;
use todo_store::{PgTodoStore, StoreOutcome, TodoStore};

fn database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://localhost/todos_test".to_string())
}

/// Connects, ensures the schema exists, and resets every row belonging to
/// `username` (cascades through lists and todos).
async fn setup_user(username: &str, password: &str) -> (PgPool, PgTodoStore) {
    let pool = PgTodoStore::connect(&database_url()).await.expect(
        "Failed to connect to test database. Make sure PostgreSQL is running \
         and DATABASE_URL is set correctly.",
    );

    sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(&pool)
        .await
        .unwrap();

    let user = User::new(username, Argon2Verifier::new().hash(password).unwrap());
    sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2)")
        .bind(&user.username)
        .bind(&user.password_hash)
        .execute(&pool)
        .await
        .unwrap();

    let store = PgTodoStore::new(pool.clone(), username, Arc::new(Argon2Verifier::new()));
    (pool, store)
}

async fn created_list_id(store: &PgTodoStore, title: &str) -> i64 {
    store
        .sorted_todo_lists()
        .await
        .unwrap()
        .iter()
        .find(|list| list.title == title)
        .map(|list| list.id)
        .unwrap()
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_create_load_toggle_delete_scenario() {
    let (_pool, store) = setup_user("pg_bob", "hunter2").await;

    assert!(!store.todo_list_title_exists("Work").await.unwrap());
    assert!(store.new_todo_list("Work").await.unwrap().is_applied());
    assert!(store.todo_list_title_exists("work").await.unwrap());
    assert_eq!(
        store.new_todo_list("work").await.unwrap(),
        StoreOutcome::DuplicateTitle
    );
    assert_eq!(store.sorted_todo_lists().await.unwrap().len(), 1);

    let list_id = created_list_id(&store, "Work").await;
    assert!(store.add_todo(list_id, "Buy milk").await.unwrap().is_applied());

    let list = store.load_todo_list(list_id).await.unwrap().unwrap();
    assert_eq!(list.todos.len(), 1);
    assert!(list.has_undone_todos());

    let todo_id = list.todos[0].id;
    assert!(store
        .toggle_done_todo(list_id, todo_id)
        .await
        .unwrap()
        .is_applied());
    assert!(store.load_todo_list(list_id).await.unwrap().unwrap().is_done());

    assert!(store.delete_todo_list(list_id).await.unwrap().is_applied());
    assert!(store.load_todo_list(list_id).await.unwrap().is_none());
    // The cascade removed the list's todos with it.
    assert!(store.load_todo(list_id, todo_id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_cross_tenant_rows_are_invisible() {
    let (_pool, alice) = setup_user("pg_alice", "alice-pass").await;
    alice.new_todo_list("Private").await.unwrap();
    let alice_list = created_list_id(&alice, "Private").await;
    alice.add_todo(alice_list, "secret").await.unwrap();
    let alice_todo = alice
        .load_todo_list(alice_list)
        .await
        .unwrap()
        .unwrap()
        .todos[0]
        .id;

    let (_, bob) = setup_user("pg_bob2", "bob-pass").await;

    // Bob cannot see, load, or mutate Alice's list, even by its id.
    assert!(bob
        .sorted_todo_lists()
        .await
        .unwrap()
        .iter()
        .all(|list| list.id != alice_list));
    assert!(bob.load_todo_list(alice_list).await.unwrap().is_none());
    assert!(bob.load_todo(alice_list, alice_todo).await.unwrap().is_none());
    assert_eq!(
        bob.set_title(alice_list, "Stolen").await.unwrap(),
        StoreOutcome::NotFound
    );
    assert_eq!(
        bob.toggle_done_todo(alice_list, alice_todo).await.unwrap(),
        StoreOutcome::NotFound
    );
    assert_eq!(
        bob.add_todo(alice_list, "graffiti").await.unwrap(),
        StoreOutcome::NotFound
    );
    assert_eq!(
        bob.delete_todo_list(alice_list).await.unwrap(),
        StoreOutcome::NotFound
    );

    // Alice's list is untouched.
    let list = alice.load_todo_list(alice_list).await.unwrap().unwrap();
    assert_eq!(list.title, "Private");
    assert_eq!(list.todos.len(), 1);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_mark_all_done_variants() {
    let (_pool, store) = setup_user("pg_carol", "carol-pass").await;

    store.new_todo_list("Chores").await.unwrap();
    let list_id = created_list_id(&store, "Chores").await;
    store.add_todo(list_id, "sweep").await.unwrap();
    store.add_todo(list_id, "mop").await.unwrap();

    assert!(store.mark_all_done(list_id).await.unwrap().is_applied());
    assert!(store.load_todo_list(list_id).await.unwrap().unwrap().is_done());

    // Re-running against an already-done list is a no-op, not a failure.
    assert!(store.mark_all_done(list_id).await.unwrap().is_applied());

    store.new_todo_list("Empty").await.unwrap();
    let empty_id = created_list_id(&store, "Empty").await;
    assert!(store.mark_all_done(empty_id).await.unwrap().is_applied());

    assert_eq!(
        store.mark_all_done(empty_id + 99999).await.unwrap(),
        StoreOutcome::NotFound
    );
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_set_title_uniqueness_and_not_found() {
    let (_pool, store) = setup_user("pg_dave", "dave-pass").await;

    store.new_todo_list("Work").await.unwrap();
    store.new_todo_list("Home").await.unwrap();
    let work_id = created_list_id(&store, "Work").await;

    assert_eq!(
        store.set_title(work_id, "home").await.unwrap(),
        StoreOutcome::DuplicateTitle
    );
    assert!(store.set_title(work_id, "Errands").await.unwrap().is_applied());
    assert_eq!(
        store.set_title(work_id + 99999, "x").await.unwrap(),
        StoreOutcome::NotFound
    );
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_sign_in_outcomes() {
    let (_pool, store) = setup_user("pg_erin", "correct-password").await;

    assert!(store.sign_in_user("pg_erin", "correct-password").await.unwrap());
    assert!(!store.sign_in_user("pg_erin", "wrong").await.unwrap());
    // Unknown user is indistinguishable from a wrong password.
    assert!(!store
        .sign_in_user("pg_nobody", "correct-password")
        .await
        .unwrap());
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_sorted_todo_lists_display_order() {
    let (_pool, store) = setup_user("pg_frank", "frank-pass").await;

    store.new_todo_list("beta").await.unwrap();
    store.new_todo_list("Alpha").await.unwrap();
    store.new_todo_list("done list").await.unwrap();
    let done_id = created_list_id(&store, "done list").await;
    store.add_todo(done_id, "only").await.unwrap();
    store.mark_all_done(done_id).await.unwrap();

    let titles: Vec<String> = store
        .sorted_todo_lists()
        .await
        .unwrap()
        .into_iter()
        .map(|list| list.title)
        .collect();
    assert_eq!(titles, vec!["Alpha", "beta", "done list"]);
}
