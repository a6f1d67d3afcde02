//! SQLite backend for the Weft node store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. The single serialized
//! connection also makes each guarded commit atomic with respect to
//! concurrent messages for the same guid.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
