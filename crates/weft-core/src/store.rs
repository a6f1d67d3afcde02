//! The `NodeStore` trait — the persistence gateway consumed by the
//! validation pipeline.
//!
//! The trait is implemented by storage backends (e.g. `weft-store-sqlite`).
//! The pipeline depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  contact::Contact,
  identity::{Handle, Person},
  object::{FederatedObject, ObjectType},
};

// ─── Gateway result types ────────────────────────────────────────────────────

/// A federated object as recorded by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedObject {
  pub object:      FederatedObject,
  /// Server-assigned timestamp; set by the store on every write.
  pub recorded_at: DateTime<Utc>,
}

/// The outcome of a guarded [`NodeStore::commit`].
///
/// The author-equality condition is enforced inside the write itself so the
/// existence check and the write cannot race across concurrent messages.
#[derive(Debug, Clone)]
pub enum CommitOutcome {
  /// No object with this guid existed; the object was created.
  Created(PersistedObject),
  /// An object with this guid existed under the same author and was
  /// replaced by the incoming payload.
  Replaced(PersistedObject),
  /// An object with this guid exists under a different author. The write
  /// was refused and the stored object left untouched.
  Skipped { existing_author: Handle },
}

impl CommitOutcome {
  /// The persisted object, when the commit took effect.
  pub fn into_persisted(self) -> Option<PersistedObject> {
    match self {
      Self::Created(p) | Self::Replaced(p) => Some(p),
      Self::Skipped { .. } => None,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Weft node's persistent state: the object store, the
/// locally known people, and the contact graph.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait NodeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Objects ───────────────────────────────────────────────────────────

  /// Commit a persistable object through the anti-overwrite guard.
  ///
  /// The write is atomic with respect to the guard condition: create when
  /// the guid is free, replace only when the stored author equals the
  /// incoming author, otherwise skip without touching anything. Callers
  /// must not pass retractions or requests (see
  /// [`ObjectType::is_persistable`]); backends reject them with an error.
  fn commit(
    &self,
    object: FederatedObject,
  ) -> impl Future<Output = Result<CommitOutcome, Self::Error>> + Send + '_;

  /// Retrieve a persisted object by guid. When `object_type` is `None`,
  /// any type matches (guids are globally unique).
  fn lookup_by_guid<'a>(
    &'a self,
    guid: &'a str,
    object_type: Option<ObjectType>,
  ) -> impl Future<Output = Result<Option<PersistedObject>, Self::Error>>
  + Send
  + 'a;

  /// Remove a persisted object. Returns `false` when no such object was
  /// recorded — retracting an already-gone target is not an error.
  fn remove_object<'a>(
    &'a self,
    guid: &'a str,
    object_type: ObjectType,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Count persisted objects, optionally restricted to one type.
  fn count_objects(
    &self,
    object_type: Option<ObjectType>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── People ────────────────────────────────────────────────────────────

  /// Record a remote identity as locally known. Returns an error if the
  /// handle is already recorded.
  fn add_person<'a>(
    &'a self,
    handle: &'a Handle,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + 'a;

  /// Resolve a handle to its local identity record, if any.
  fn lookup_person<'a>(
    &'a self,
    handle: &'a Handle,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  // ── Contacts ──────────────────────────────────────────────────────────

  /// Record that `recipient` accepts private messages from `person`.
  fn add_contact<'a>(
    &'a self,
    recipient: &'a Handle,
    person: &'a Handle,
    aspect: Option<String>,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + 'a;

  /// Whether a contact from `recipient` to `person` exists — the
  /// authorization predicate for non-request objects.
  fn lookup_contact<'a>(
    &'a self,
    recipient: &'a Handle,
    person: &'a Handle,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Count contacts recorded for `recipient`.
  fn count_contacts<'a>(
    &'a self,
    recipient: &'a Handle,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// List all contacts recorded for `recipient`.
  fn list_contacts<'a>(
    &'a self,
    recipient: &'a Handle,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;
}
