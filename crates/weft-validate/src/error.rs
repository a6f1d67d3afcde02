//! The rejection taxonomy — why an inbound message was refused.

use thiserror::Error;

/// A typed validation failure.
///
/// Exactly one rejection is surfaced per message: the pipeline
/// short-circuits at the first failing phase of the fixed check order
/// (signature, self-validity, known party, authorization, parent).
/// A rejected message leaves no trace in the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
  /// The parsed object failed its own structural validation.
  #[error("invalid object: {0}")]
  InvalidObject(String),

  /// The authenticated sender and the payload's declared author do not
  /// resolve to the same known party — or a retraction's author is not
  /// the recorded author of its target.
  #[error("author does not match a known party: {0}")]
  AuthorMismatch(String),

  /// A non-request object arrived from a sender the recipient has no
  /// contact relationship with.
  #[error("contact required: {0}")]
  ContactRequired(String),

  /// A relayable object references a parent that is not known locally.
  #[error("relayable object has no known parent: {0}")]
  NoKnownParent(String),
}

/// Failure modes of [`crate::Validator::process`].
///
/// `Rejected` is the expected outcome for hostile or malformed remote
/// messages; `Store` is an infrastructure fault in the persistence gateway.
#[derive(Debug, Error)]
pub enum ProcessError {
  #[error(transparent)]
  Rejected(#[from] Rejection),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ProcessError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  /// The rejection carried by this error, if it is one.
  pub fn rejection(&self) -> Option<&Rejection> {
    match self {
      Self::Rejected(r) => Some(r),
      Self::Store(_) => None,
    }
  }
}
