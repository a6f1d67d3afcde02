//! Contact-required authorization.

use weft_core::{identity::Handle, object::FederatedObject, store::NodeStore};

/// Whether `recipient` has a qualifying relationship with `sender` for this
/// object.
///
/// Request objects are exempt: they are precisely the mechanism for
/// establishing a contact, so they cannot require one. Every other variant
/// requires an existing contact from recipient to sender. This check runs
/// before any persistence call, so an unauthorized sender causes no side
/// effect at all.
pub async fn authorized<S: NodeStore>(
  store: &S,
  recipient: &Handle,
  sender: &Handle,
  object: &FederatedObject,
) -> Result<bool, S::Error> {
  if object.is_request() {
    return Ok(true);
  }
  store.lookup_contact(recipient, sender).await
}
