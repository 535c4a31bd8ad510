//! Persistence layer for the todo-list manager.
//!
//! One contract, two interchangeable backends:
//! - [`PgTodoStore`] persists durably in PostgreSQL
//! - [`SessionTodoStore`] persists within a single session's key-value bag
//!
//! Both satisfy the same [`TodoStore`] trait: every operation is scoped to
//! the user the store was constructed for, absence and duplicate titles are
//! reported as [`StoreOutcome`] values rather than errors, and display order
//! comes from one shared sorting policy. Which backend a deployment uses is
//! decided at construction time; callers hold a `dyn TodoStore` and never
//! branch on the concrete type.

mod error;
mod id;
mod pg;
mod schema;
mod seed;
mod session;
mod sort;
mod traits;

pub use error::*;
pub use id::*;
pub use pg::*;
pub use schema::*;
pub use seed::*;
pub use session::*;
pub use sort::*;
pub use traits::*;
