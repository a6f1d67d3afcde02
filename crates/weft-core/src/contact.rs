//! Contact — the directed trust relationship that authorizes delivery.
//!
//! A contact records that the local `recipient` accepts private messages
//! from the remote `person`. Its existence is the authorization predicate
//! for every non-request object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Handle;

/// A directed relationship from a local recipient to a remote person,
/// optionally scoped to a named aspect (a user-defined grouping).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
  pub recipient:  Handle,
  pub person:     Handle,
  pub aspect:     Option<String>,
  pub created_at: DateTime<Utc>,
}
