//! The [`Validator`] — fixed-order orchestration of the pipeline checks.
//!
//! One validator is constructed per inbound message and discarded after
//! [`Validator::process`] returns. The check order is fixed and eagerly
//! short-circuits, so at most one rejection is ever surfaced per message:
//!
//! 1. envelope signature (failure is "nothing to do", never an error)
//! 2. object self-validity
//! 3. known-party match (authenticated sender = declared author, locally
//!    known)
//! 4. contact-required authorization
//! 5. relayable-parent existence
//!
//! Only when every check passes does the apply phase run: retractions go
//! through the ownership check, persistable objects through the mutation
//! guard. A failing message leaves the store untouched.

use weft_core::{
  envelope::{EnvelopeVerdict, UnwrappedEnvelope},
  identity::Handle,
  object::FederatedObject,
  store::{NodeStore, PersistedObject},
};

use crate::{
  authorization,
  error::{ProcessError, Rejection},
  guard, integrity, party,
};

// ─── Report ──────────────────────────────────────────────────────────────────

/// The outcome of the read-only validation phases.
///
/// Because the pipeline short-circuits at the first failing phase, a report
/// carries at most one rejection.
#[derive(Debug)]
pub struct ValidationReport {
  rejection: Option<Rejection>,
}

impl ValidationReport {
  fn valid() -> Self { Self { rejection: None } }

  fn rejected(rejection: Rejection) -> Self {
    Self { rejection: Some(rejection) }
  }

  pub fn is_valid(&self) -> bool { self.rejection.is_none() }

  pub fn rejection(&self) -> Option<&Rejection> { self.rejection.as_ref() }

  pub fn into_rejection(self) -> Option<Rejection> { self.rejection }

  /// Human-readable messages for the operator log.
  pub fn messages(&self) -> Vec<String> {
    self.rejection.iter().map(ToString::to_string).collect()
  }
}

// ─── Validator ───────────────────────────────────────────────────────────────

/// Per-message validator for the private delivery path.
pub struct Validator {
  signature_valid: bool,
  recipient:       Handle,
  sender:          Handle,
  object:          FederatedObject,
}

impl Validator {
  /// Construct a validator from the evaluated signature capability, the
  /// local recipient, the authenticated sender, and the parsed payload.
  pub fn new(
    verdict: &impl EnvelopeVerdict,
    recipient: Handle,
    sender: Handle,
    object: FederatedObject,
  ) -> Self {
    Self {
      signature_valid: verdict.signature_valid(),
      recipient,
      sender,
      object,
    }
  }

  /// Construct a validator directly from an unwrapped envelope addressed
  /// to `recipient`.
  pub fn from_envelope(envelope: UnwrappedEnvelope, recipient: Handle) -> Self {
    let UnwrappedEnvelope { sender, signature_valid, object } = envelope;
    Self { signature_valid, recipient, sender, object }
  }

  pub fn object(&self) -> &FederatedObject { &self.object }

  /// Run the read-only rejection phases (2–5 above) in order, stopping at
  /// the first failure. The signature gate belongs to [`Self::process`]:
  /// an unverified envelope yields an empty result there, not a
  /// rejection here.
  pub async fn check<S: NodeStore>(
    &self,
    store: &S,
  ) -> Result<ValidationReport, ProcessError> {
    // (2) the object must pass its own structural validation
    if let Err(rejection) = integrity::self_valid(&self.object) {
      return Ok(ValidationReport::rejected(rejection));
    }

    // (3) authenticated sender and declared author must be one known party
    if !party::consistent_party(&self.sender, self.object.author()) {
      return Ok(ValidationReport::rejected(Rejection::AuthorMismatch(
        format!(
          "sender {} declared author {}",
          self.sender,
          self.object.author(),
        ),
      )));
    }
    if party::resolve(store, &self.sender)
      .await
      .map_err(ProcessError::store)?
      .is_none()
    {
      return Ok(ValidationReport::rejected(Rejection::AuthorMismatch(
        format!("no locally known party for {}", self.sender),
      )));
    }

    // (4) non-request objects require a contact
    let authorized = authorization::authorized(
      store,
      &self.recipient,
      &self.sender,
      &self.object,
    )
    .await
    .map_err(ProcessError::store)?;
    if !authorized {
      return Ok(ValidationReport::rejected(Rejection::ContactRequired(
        format!("{} has no contact for {}", self.recipient, self.sender),
      )));
    }

    // (5) relayables must attach to a known parent
    let parent_known = integrity::parent_known(store, &self.object)
      .await
      .map_err(ProcessError::store)?;
    if !parent_known {
      return Ok(ValidationReport::rejected(Rejection::NoKnownParent(
        format!(
          "parent {} of {}",
          self.object.parent_guid().unwrap_or_default(),
          self.object.guid(),
        ),
      )));
    }

    Ok(ValidationReport::valid())
  }

  /// Whether the message would pass the rejection phases.
  pub async fn is_valid<S: NodeStore>(
    &self,
    store: &S,
  ) -> Result<bool, ProcessError> {
    Ok(self.check(store).await?.is_valid())
  }

  /// Run the full pipeline and, on success, apply the object.
  ///
  /// Returns `Ok(None)` when there is nothing to persist: an unverified
  /// signature, an applied or no-op retraction, a validated contact
  /// request (handed to the social-graph layer), or a mutation-guard
  /// discard. Returns the single first rejection otherwise. No mutation
  /// happens unless every check passes.
  pub async fn process<S: NodeStore>(
    self,
    store: &S,
  ) -> Result<Option<PersistedObject>, ProcessError> {
    if !self.signature_valid {
      tracing::debug!(
        sender = %self.sender,
        "envelope signature did not verify; nothing to do"
      );
      return Ok(None);
    }

    let report = self.check(store).await?;
    if let Some(rejection) = report.into_rejection() {
      tracing::warn!(
        sender = %self.sender,
        guid = %self.object.guid(),
        %rejection,
        "rejected inbound message"
      );
      return Err(rejection.into());
    }

    match self.object {
      FederatedObject::Retraction(retraction) => {
        integrity::apply_retraction(store, &retraction).await?;
        Ok(None)
      }
      FederatedObject::Request(request) => {
        tracing::debug!(
          author = %request.author,
          "contact request validated; handed to the social-graph layer"
        );
        Ok(None)
      }
      object => guard::guarded_commit(store, object).await,
    }
  }
}
