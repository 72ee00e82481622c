//! SQLite backend for the Brigade school store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. Every multi-row write executes
//! inside one rusqlite transaction; the schema's UNIQUE constraints are the
//! commit-time backstop behind the services' uniqueness pre-checks.

mod encode;
mod predicate;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
