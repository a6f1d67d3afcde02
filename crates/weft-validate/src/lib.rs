//! The private-message validation pipeline of a Weft federation node.
//!
//! This crate sits at the trust boundary between the network and local
//! storage: it decides whether an inbound signed message from a remote node
//! may be applied to local state. The [`Validator`] runs a fixed-order,
//! short-circuiting check sequence (signature, object self-validity,
//! known-party match, contact authorization, relayable-parent existence)
//! and, only when every check passes, applies the object through the
//! retraction-ownership and anti-overwrite guards.
//!
//! Nothing here performs cryptography or parsing; the envelope verifier and
//! payload parser live upstream and hand over an
//! [`weft_core::envelope::UnwrappedEnvelope`].

pub mod authorization;
pub mod error;
pub mod guard;
pub mod integrity;
pub mod party;
pub mod validator;

pub use error::{ProcessError, Rejection};
pub use validator::{ValidationReport, Validator};
