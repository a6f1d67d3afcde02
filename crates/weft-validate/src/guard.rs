//! The mutation guard — anti-overwrite protection for persisted objects.
//!
//! An attacker who re-sends someone else's object under its original guid,
//! or replays an old guid under a new author, must not be able to overwrite
//! stored content. The store's commit enforces the author-equality
//! condition atomically with the write; this module interprets the outcome.

use weft_core::{
  object::FederatedObject,
  store::{CommitOutcome, NodeStore, PersistedObject},
};

use crate::error::ProcessError;

/// Commit `object` through the store's guarded write.
///
/// A conflicting guid under a different author is discarded silently: the
/// stored object wins and the operation is a no-op success, never an
/// error.
pub async fn guarded_commit<S: NodeStore>(
  store: &S,
  object: FederatedObject,
) -> Result<Option<PersistedObject>, ProcessError> {
  let guid = object.guid().to_owned();

  match store.commit(object).await.map_err(ProcessError::store)? {
    CommitOutcome::Created(persisted) | CommitOutcome::Replaced(persisted) => {
      Ok(Some(persisted))
    }
    CommitOutcome::Skipped { existing_author } => {
      tracing::debug!(
        %guid,
        %existing_author,
        "guid already recorded under another author; discarding"
      );
      Ok(None)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use weft_core::{identity::Handle, object::StatusMessage};
  use weft_store_sqlite::SqliteStore;

  fn status(guid: &str, author: &str, text: &str) -> FederatedObject {
    FederatedObject::StatusMessage(StatusMessage {
      guid:   guid.to_owned(),
      author: Handle::parse(author).unwrap(),
      text:   text.to_owned(),
    })
  }

  #[tokio::test]
  async fn fresh_guid_is_created() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let persisted =
      guarded_commit(&store, status("g1", "eve@pod.example", "hi"))
        .await
        .unwrap();
    assert!(persisted.is_some());
  }

  #[tokio::test]
  async fn same_author_may_overwrite() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    guarded_commit(&store, status("g1", "eve@pod.example", "first"))
      .await
      .unwrap();
    let persisted =
      guarded_commit(&store, status("g1", "eve@pod.example", "second"))
        .await
        .unwrap();
    assert!(persisted.is_some());
  }

  #[tokio::test]
  async fn other_author_is_discarded_silently() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    guarded_commit(&store, status("g1", "eve@pod.example", "store this!"))
      .await
      .unwrap();

    let persisted =
      guarded_commit(&store, status("g1", "alice@pod.example", "BAD!!!"))
        .await
        .unwrap();
    assert!(persisted.is_none());

    let stored = store.lookup_by_guid("g1", None).await.unwrap().unwrap();
    let FederatedObject::StatusMessage(sm) = stored.object else {
      panic!("expected status message");
    };
    assert_eq!(sm.text, "store this!");
  }
}
