//! Object integrity — self-validity, relayable parents, and retraction
//! ownership.

use weft_core::{
  object::{FederatedObject, Retraction},
  store::NodeStore,
};

use crate::error::{ProcessError, Rejection};

/// Delegate to the object's own structural validation.
pub fn self_valid(object: &FederatedObject) -> Result<(), Rejection> {
  object
    .check()
    .map_err(|e| Rejection::InvalidObject(e.to_string()))
}

/// For relayable objects, the declared parent must already be persisted
/// locally. Variants with no parent concept pass trivially.
pub async fn parent_known<S: NodeStore>(
  store: &S,
  object: &FederatedObject,
) -> Result<bool, S::Error> {
  match object.parent_guid() {
    Some(parent) => Ok(store.lookup_by_guid(parent, None).await?.is_some()),
    None => Ok(true),
  }
}

/// Apply a validated retraction.
///
/// A missing target is a silent no-op — the target may already be gone,
/// and re-sent retractions must not fail. A target recorded under a
/// different author is a hard rejection and nothing is deleted. The two
/// outcomes are deliberately distinct.
pub async fn apply_retraction<S: NodeStore>(
  store: &S,
  retraction: &Retraction,
) -> Result<(), ProcessError> {
  let target = store
    .lookup_by_guid(&retraction.target_guid, Some(retraction.target_type))
    .await
    .map_err(ProcessError::store)?;

  match target {
    None => {
      tracing::debug!(
        target_guid = %retraction.target_guid,
        "retraction target not found; nothing to do"
      );
      Ok(())
    }
    Some(persisted) if persisted.object.author() != &retraction.author => {
      Err(
        Rejection::AuthorMismatch(format!(
          "retraction by {} does not own target {}",
          retraction.author, retraction.target_guid,
        ))
        .into(),
      )
    }
    Some(_) => {
      store
        .remove_object(&retraction.target_guid, retraction.target_type)
        .await
        .map_err(ProcessError::store)?;
      Ok(())
    }
  }
}
