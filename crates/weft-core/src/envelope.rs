//! The unwrapped envelope — what the external envelope verifier hands over.
//!
//! Envelope cryptography lives upstream. By the time a message reaches this
//! crate the signature has already been evaluated and the payload bytes
//! parsed; what remains is the authenticated sender, the verdict, and the
//! typed object.

use serde::{Deserialize, Serialize};

use crate::{identity::Handle, object::FederatedObject};

/// Capability consumed by the validator: did the envelope signature check
/// out for the sender's key? Evaluated upstream, queried here. Injecting
/// the trait (rather than a bare bool) keeps test substitution explicit.
pub trait EnvelopeVerdict {
  fn signature_valid(&self) -> bool;
}

/// The combined output of the external envelope verifier and payload
/// parser: authenticated sender handle, signature verdict, and the parsed
/// payload. This is the only shape the validation pipeline ever sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnwrappedEnvelope {
  pub sender:          Handle,
  pub signature_valid: bool,
  pub object:          FederatedObject,
}

impl EnvelopeVerdict for UnwrappedEnvelope {
  fn signature_valid(&self) -> bool { self.signature_valid }
}
