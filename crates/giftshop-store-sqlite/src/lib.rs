//! SQLite backend for the Giftshop citizen store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. That thread owns the only connection,
//! so writes are applied one at a time, each inside its own transaction.

mod encode;
mod graph;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
