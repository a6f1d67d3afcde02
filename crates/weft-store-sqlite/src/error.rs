//! Error type for `weft-store-sqlite`.

use thiserror::Error;
use weft_core::object::ObjectType;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] weft_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to commit a retraction or request to the object store.
  #[error("{0} objects are never persisted")]
  NotPersistable(ObjectType),

  /// Attempted to record a handle that is already known.
  #[error("person already recorded: {0}")]
  PersonExists(String),

  #[error("contact already recorded: {recipient} -> {person}")]
  ContactExists { recipient: String, person: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
