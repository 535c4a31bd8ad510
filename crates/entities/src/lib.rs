//! Core entity definitions for the todo-list manager.
//!
//! This crate defines the data types shared by every persistence backend:
//! users, todo lists, and the todo items they contain. Done-status is a
//! computed view over the items, never a stored field.

mod todo;
mod user;

pub use todo::*;
pub use user::*;
