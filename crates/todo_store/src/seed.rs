//! Seed data for brand-new sessions.

use entities::{Todo, TodoList};

use crate::IdGenerator;

/// Builds the example lists used to bootstrap a session that has none yet.
///
/// The template is rebuilt on every call with freshly allocated
/// identifiers, so no caller ever holds a reference into shared seed state.
pub fn seed_todo_lists(ids: &IdGenerator) -> Vec<TodoList> {
    let mut work = TodoList::new(ids.next_id(), "Work Todos");
    work.todos = vec![
        done(ids, "Get coffee"),
        done(ids, "Go to work"),
        undone(ids, "File the quarterly report"),
    ];

    let mut home = TodoList::new(ids.next_id(), "Home Todos");
    home.todos = vec![
        done(ids, "Feed the cats"),
        undone(ids, "Buy milk"),
        undone(ids, "Water the plants"),
        undone(ids, "Go to bed early"),
    ];

    let additional = TodoList::new(ids.next_id(), "Additional Todos");

    let mut social = TodoList::new(ids.next_id(), "social todos");
    social.todos = vec![undone(ids, "Plan the birthday party")];

    vec![work, home, additional, social]
}

fn undone(ids: &IdGenerator, title: &str) -> Todo {
    Todo::new(ids.next_id(), title)
}

fn done(ids: &IdGenerator, title: &str) -> Todo {
    let mut todo = Todo::new(ids.next_id(), title);
    todo.done = true;
    todo
}
