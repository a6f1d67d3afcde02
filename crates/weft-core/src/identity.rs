//! Federation identities — handles and the people they resolve to.
//!
//! A handle is the globally unique, opaque name of an account anywhere on
//! the network. A [`Person`] is the thin local record a handle resolves to;
//! at most one exists per handle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Handle ──────────────────────────────────────────────────────────────────

/// A federation handle, e.g. `alice@pod.example`.
///
/// Comparison is exact string equality. The validation pipeline never
/// attempts fuzzy or case-folded matching between handles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
  /// Parse a handle, enforcing the `user@host` shape.
  pub fn parse(raw: &str) -> Result<Self> {
    let trimmed = raw.trim();
    match trimmed.split_once('@') {
      Some((user, host))
        if !user.is_empty() && !host.is_empty() && !host.contains('@') =>
      {
        Ok(Self(trimmed.to_owned()))
      }
      _ => Err(Error::MalformedHandle(raw.to_owned())),
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl std::fmt::Display for Handle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl std::str::FromStr for Handle {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// The locally cached identity record a handle resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub person_guid: Uuid,
  pub handle:      Handle,
  pub created_at:  DateTime<Utc>,
}
