//! Display ordering shared by both backends.
//!
//! Lists and the todos inside them render in the same two-level order:
//! undone entries before done entries, then case-insensitive title
//! ascending, with ties keeping their original relative order. The policy
//! runs in process rather than in SQL so both backends produce identical
//! output regardless of database collation.

use entities::{Todo, TodoList};

/// Stable partition-then-sort on `(done, lowercased title)`.
fn partition_sort<T>(items: &mut [T], is_done: impl Fn(&T) -> bool, title: impl Fn(&T) -> &str) {
    items.sort_by_cached_key(|item| (is_done(item), title(item).to_lowercase()));
}

/// Sorts lists into display order. A list with no todos counts as undone.
pub fn sort_todo_lists(lists: &mut [TodoList]) {
    partition_sort(lists, TodoList::is_done, |list| list.title.as_str());
}

/// Sorts the todos of one list into display order.
pub fn sort_todos(todos: &mut [Todo]) {
    partition_sort(todos, |todo| todo.done, |todo| todo.title.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: i64, title: &str, done: bool) -> Todo {
        let mut todo = Todo::new(id, title);
        todo.done = done;
        todo
    }

    fn list(id: i64, title: &str, todos: Vec<Todo>) -> TodoList {
        let mut list = TodoList::new(id, title);
        list.todos = todos;
        list
    }

    #[test]
    fn test_undone_todos_precede_done() {
        let mut todos = vec![
            todo(1, "alpha", true),
            todo(2, "beta", false),
            todo(3, "gamma", true),
        ];
        sort_todos(&mut todos);

        let ids: Vec<i64> = todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_titles_compare_case_insensitively() {
        let mut todos = vec![
            todo(1, "banana", false),
            todo(2, "Apple", false),
            todo(3, "cherry", false),
        ];
        sort_todos(&mut todos);

        let titles: Vec<&str> = todos.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_equal_keys_keep_original_order() {
        let mut todos = vec![todo(1, "Same", false), todo(2, "same", false)];
        sort_todos(&mut todos);

        let ids: Vec<i64> = todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_done_lists_sink_below_undone_and_empty() {
        let mut lists = vec![
            list(1, "all done", vec![todo(10, "x", true)]),
            list(2, "empty", Vec::new()),
            list(3, "in progress", vec![todo(11, "y", false), todo(12, "z", true)]),
        ];
        sort_todo_lists(&mut lists);

        let ids: Vec<i64> = lists.iter().map(|l| l.id).collect();
        // The empty list is never done, so it stays in the undone partition.
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_partitions_are_each_title_sorted() {
        let mut lists = vec![
            list(1, "Zeta", vec![todo(10, "x", true)]),
            list(2, "alpha", vec![todo(11, "x", true)]),
            list(3, "Beta", vec![todo(12, "x", false)]),
            list(4, "aardvark", vec![todo(13, "x", false)]),
        ];
        sort_todo_lists(&mut lists);

        let ids: Vec<i64> = lists.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }
}
