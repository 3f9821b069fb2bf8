//! List and task storage for todo
//!
//! This crate provides the [`ListStore`] and [`TaskStore`] abstractions with
//! three interchangeable backends: in-memory, JSON files, and SQLite. The
//! [`Storage`] service sits on top and is what callers normally use.

mod config;
mod error;
mod file;
mod memory;
mod service;
mod sql;
mod traits;

pub use config::*;
pub use error::*;
pub use file::*;
pub use memory::*;
pub use service::*;
pub use sql::*;
pub use traits::*;
