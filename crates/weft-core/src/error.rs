//! Error types for `weft-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed handle: {0:?}")]
  MalformedHandle(String),

  #[error("unknown object type discriminant: {0:?}")]
  UnknownObjectType(String),

  /// An object failed its own structural validation.
  #[error("invalid object: {0}")]
  InvalidObject(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
