//! Core entity definitions for todo.
//!
//! Lists group tasks; every task belongs to exactly one list through its
//! `list_id`.

mod list;
mod task;

pub use list::*;
pub use task::*;
