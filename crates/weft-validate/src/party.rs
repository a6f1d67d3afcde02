//! Known-party resolution — the sender/author consistency check.
//!
//! The authenticated sender of the envelope and the author declared inside
//! the payload must be the same party, and that party must be locally
//! known. This holds independently of authorization state: a mismatch is
//! always a hard rejection, even from a sender with a contact.

use weft_core::{
  identity::{Handle, Person},
  store::NodeStore,
};

/// Whether the authenticated sender and the declared payload author refer
/// to the same party. Exact handle equality; no fuzzy matching.
pub fn consistent_party(sender: &Handle, declared: &Handle) -> bool {
  sender == declared
}

/// Resolve a handle to its locally known identity record.
pub async fn resolve<S: NodeStore>(
  store: &S,
  handle: &Handle,
) -> Result<Option<Person>, S::Error> {
  store.lookup_person(handle).await
}
