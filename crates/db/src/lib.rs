//! SQLite persistence for the library service.
//!
//! The crate owns connection setup and schema migrations. Table definitions
//! and queries live with the application modules that own each table; they
//! run against the pool exposed by [`Database`] or a transaction started from
//! it.

pub mod error;
pub mod migrate;
pub mod pool;

pub use error::{DbError, DbResult};
pub use migrate::Migration;
pub use pool::Database;

/// Re-exported so callers can name executors and transactions without a
/// direct `sqlx` dependency.
pub use sqlx::{Sqlite, SqliteExecutor, Transaction};
