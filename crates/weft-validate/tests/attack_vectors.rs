//! Attack-vector tests: hostile messages must be refused without side
//! effects on the object store.
//!
//! Each scenario drives the full pipeline the way a receiver would: an
//! unwrapped envelope for the local recipient, processed against a fresh
//! store.

use weft_core::{
  envelope::UnwrappedEnvelope,
  identity::Handle,
  object::{
    Comment, FederatedObject, ObjectType, Profile, Request, Retraction,
    StatusMessage,
  },
  store::NodeStore,
};
use weft_store_sqlite::SqliteStore;
use weft_validate::{Rejection, Validator};

// ─── Fixtures ────────────────────────────────────────────────────────────────

/// bob is the local recipient; alice and eve are remote people he knows,
/// both with contact relationships. Tests that need a non-contact add
/// their own people.
struct Fixture {
  store: SqliteStore,
  bob:   Handle,
  alice: Handle,
  eve:   Handle,
}

async fn fixture() -> Fixture {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let bob = Handle::parse("bob@local.example").unwrap();
  let alice = Handle::parse("alice@pod.example").unwrap();
  let eve = Handle::parse("eve@pod.example").unwrap();

  for person in [&alice, &eve] {
    store.add_person(person).await.unwrap();
    store
      .add_contact(&bob, person, Some("generic".to_owned()))
      .await
      .unwrap();
  }

  Fixture { store, bob, alice, eve }
}

fn status_from(author: &Handle, guid: &str, text: &str) -> FederatedObject {
  FederatedObject::StatusMessage(StatusMessage {
    guid:   guid.to_owned(),
    author: author.clone(),
    text:   text.to_owned(),
  })
}

fn retraction_from(author: &Handle, target_guid: &str) -> FederatedObject {
  FederatedObject::Retraction(Retraction {
    target_guid: target_guid.to_owned(),
    target_type: ObjectType::StatusMessage,
    author:      author.clone(),
  })
}

async fn deliver(
  fx: &Fixture,
  sender: &Handle,
  object: FederatedObject,
) -> Result<
  Option<weft_core::store::PersistedObject>,
  weft_validate::ProcessError,
> {
  let envelope = UnwrappedEnvelope {
    sender:          sender.clone(),
    signature_valid: true,
    object,
  };
  Validator::from_envelope(envelope, fx.bob.clone())
    .process(&fx.store)
    .await
}

async fn stored_text(fx: &Fixture, guid: &str) -> String {
  let persisted = fx
    .store
    .lookup_by_guid(guid, Some(ObjectType::StatusMessage))
    .await
    .unwrap()
    .expect("object should be stored");
  let FederatedObject::StatusMessage(sm) = persisted.object else {
    panic!("expected status message");
  };
  sm.text
}

// ─── Contact required unless request ─────────────────────────────────────────

#[tokio::test]
async fn post_from_non_contact_is_not_saved_as_a_side_effect() {
  let fx = fixture().await;
  let bad_user = Handle::parse("bad-user@other.example").unwrap();
  fx.store.add_person(&bad_user).await.unwrap();

  let err = deliver(&fx, &bad_user, status_from(&bad_user, "g1", "hi"))
    .await
    .unwrap_err();

  assert!(matches!(
    err.rejection(),
    Some(Rejection::ContactRequired(_))
  ));
  assert_eq!(fx.store.count_objects(None).await.unwrap(), 0);
}

#[tokio::test]
async fn request_from_non_contact_passes_validation() {
  let fx = fixture().await;
  let newcomer = Handle::parse("newcomer@other.example").unwrap();
  fx.store.add_person(&newcomer).await.unwrap();

  let request = FederatedObject::Request(Request {
    guid:      "r1".to_owned(),
    author:    newcomer.clone(),
    recipient: fx.bob.clone(),
  });

  // Validation succeeds without a contact; acting on the request is the
  // social-graph layer's job, so nothing lands in the object store.
  let result = deliver(&fx, &newcomer, request).await.unwrap();
  assert!(result.is_none());
  assert_eq!(fx.store.count_objects(None).await.unwrap(), 0);
}

// ─── Mass assignment on guid ─────────────────────────────────────────────────

#[tokio::test]
async fn does_not_save_a_message_over_an_old_message_with_a_different_author()
{
  let fx = fixture().await;

  deliver(&fx, &fx.eve, status_from(&fx.eve, "g1", "store this!"))
    .await
    .unwrap();

  // alice re-sends eve's guid under her own name with different content
  let result = deliver(&fx, &fx.alice, status_from(&fx.alice, "g1", "BAD!!!"))
    .await
    .unwrap();

  assert!(result.is_none(), "the forged overwrite must be a no-op");
  assert_eq!(stored_text(&fx, "g1").await, "store this!");
  assert_eq!(fx.store.count_objects(None).await.unwrap(), 1);
}

#[tokio::test]
async fn same_author_resending_a_guid_does_not_duplicate() {
  let fx = fixture().await;

  deliver(&fx, &fx.eve, status_from(&fx.eve, "g1", "store this!"))
    .await
    .unwrap();
  deliver(&fx, &fx.eve, status_from(&fx.eve, "g1", "store this!"))
    .await
    .unwrap();

  assert_eq!(fx.store.count_objects(None).await.unwrap(), 1);
  assert_eq!(stored_text(&fx, "g1").await, "store this!");
}

#[tokio::test]
async fn does_not_overwrite_another_persons_profile() {
  let fx = fixture().await;

  fx.store
    .commit(FederatedObject::Profile(Profile {
      guid:       "p-eve".to_owned(),
      author:     fx.eve.clone(),
      first_name: Some("Eve".to_owned()),
      last_name:  None,
    }))
    .await
    .unwrap();

  // alice sends a profile declaring eve as its author
  let err = deliver(
    &fx,
    &fx.alice,
    FederatedObject::Profile(Profile {
      guid:       "p-eve".to_owned(),
      author:     fx.eve.clone(),
      first_name: Some("Not Eve".to_owned()),
      last_name:  None,
    }),
  )
  .await
  .unwrap_err();

  assert!(matches!(
    err.rejection(),
    Some(Rejection::AuthorMismatch(_))
  ));

  let persisted = fx
    .store
    .lookup_by_guid("p-eve", Some(ObjectType::Profile))
    .await
    .unwrap()
    .unwrap();
  let FederatedObject::Profile(profile) = persisted.object else {
    panic!("expected profile");
  };
  assert_eq!(profile.first_name.as_deref(), Some("Eve"));
}

// ─── Retraction ownership ────────────────────────────────────────────────────

#[tokio::test]
async fn ignores_retractions_on_a_post_not_owned_by_the_sender() {
  let fx = fixture().await;

  deliver(&fx, &fx.eve, status_from(&fx.eve, "g1", "store this!"))
    .await
    .unwrap();

  let err = deliver(&fx, &fx.alice, retraction_from(&fx.alice, "g1"))
    .await
    .unwrap_err();

  assert!(matches!(
    err.rejection(),
    Some(Rejection::AuthorMismatch(_))
  ));
  assert_eq!(fx.store.count_objects(None).await.unwrap(), 1);
  assert_eq!(stored_text(&fx, "g1").await, "store this!");
}

#[tokio::test]
async fn retraction_for_a_nonexistent_post_completes_without_error() {
  let fx = fixture().await;

  let result = deliver(&fx, &fx.alice, retraction_from(&fx.alice, "g3"))
    .await
    .unwrap();

  assert!(result.is_none());
  assert_eq!(fx.store.count_objects(None).await.unwrap(), 0);
}

#[tokio::test]
async fn rejects_retractions_where_retractor_and_sender_do_not_match() {
  let fx = fixture().await;

  deliver(&fx, &fx.eve, status_from(&fx.eve, "g1", "store this!"))
    .await
    .unwrap();

  // alice sends a retraction declaring eve as the retractor
  let err = deliver(&fx, &fx.alice, retraction_from(&fx.eve, "g1"))
    .await
    .unwrap_err();

  assert!(matches!(
    err.rejection(),
    Some(Rejection::AuthorMismatch(_))
  ));
  assert_eq!(fx.store.count_objects(None).await.unwrap(), 1);
}

#[tokio::test]
async fn author_may_retract_their_own_post() {
  let fx = fixture().await;

  deliver(&fx, &fx.eve, status_from(&fx.eve, "g2", "short lived"))
    .await
    .unwrap();
  assert_eq!(fx.store.count_objects(None).await.unwrap(), 1);

  let result = deliver(&fx, &fx.eve, retraction_from(&fx.eve, "g2"))
    .await
    .unwrap();

  assert!(result.is_none());
  assert!(fx.store.lookup_by_guid("g2", None).await.unwrap().is_none());
  assert_eq!(fx.store.count_objects(None).await.unwrap(), 0);
}

// ─── Author consistency ──────────────────────────────────────────────────────

#[tokio::test]
async fn sender_and_declared_author_mismatch_is_rejected_despite_contact() {
  let fx = fixture().await;

  // eve is a contact of bob, yet declaring alice as the author still fails
  let err = deliver(&fx, &fx.eve, status_from(&fx.alice, "g1", "hello"))
    .await
    .unwrap_err();

  assert!(matches!(
    err.rejection(),
    Some(Rejection::AuthorMismatch(_))
  ));
  assert_eq!(fx.store.count_objects(None).await.unwrap(), 0);
}

// ─── Relayable parents ───────────────────────────────────────────────────────

#[tokio::test]
async fn relayable_with_unknown_parent_is_rejected_even_when_authorized() {
  let fx = fixture().await;

  let err = deliver(
    &fx,
    &fx.alice,
    FederatedObject::Comment(Comment {
      guid:        "c1".to_owned(),
      author:      fx.alice.clone(),
      parent_guid: "never-seen".to_owned(),
      text:        "first!".to_owned(),
    }),
  )
  .await
  .unwrap_err();

  assert!(matches!(
    err.rejection(),
    Some(Rejection::NoKnownParent(_))
  ));
  assert_eq!(fx.store.count_objects(None).await.unwrap(), 0);
}
