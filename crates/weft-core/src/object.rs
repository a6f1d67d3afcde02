//! The federated object model — the typed payloads a remote node may send.
//!
//! Objects are constructed transiently by the (external) payload parser for
//! the duration of one validation pass. They are discarded on rejection and
//! handed to the persistence gateway only on acceptance.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, identity::Handle};

// ─── Type discriminant ───────────────────────────────────────────────────────

/// The kind of federated object. `as_str` is the discriminant stored in the
/// `object_type` database column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
  StatusMessage,
  Photo,
  Profile,
  Comment,
  Retraction,
  Request,
}

impl ObjectType {
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::StatusMessage => "status_message",
      Self::Photo => "photo",
      Self::Profile => "profile",
      Self::Comment => "comment",
      Self::Retraction => "retraction",
      Self::Request => "request",
    }
  }

  /// Parse the discriminant string stored in the database.
  pub fn from_discriminant(s: &str) -> Result<Self> {
    match s {
      "status_message" => Ok(Self::StatusMessage),
      "photo" => Ok(Self::Photo),
      "profile" => Ok(Self::Profile),
      "comment" => Ok(Self::Comment),
      "retraction" => Ok(Self::Retraction),
      "request" => Ok(Self::Request),
      other => Err(Error::UnknownObjectType(other.to_owned())),
    }
  }

  /// Whether objects of this type are ever committed to the object store.
  ///
  /// Retractions act on other objects and contact requests are handed to
  /// the social-graph layer; neither is persisted here.
  pub fn is_persistable(&self) -> bool {
    !matches!(self, Self::Retraction | Self::Request)
  }
}

impl std::fmt::Display for ObjectType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Variant bodies ──────────────────────────────────────────────────────────

/// A short text post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
  pub guid:   String,
  pub author: Handle,
  pub text:   String,
}

/// A photo hosted on the origin node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
  pub guid:       String,
  pub author:     Handle,
  /// Where the origin node serves the image from.
  pub remote_url: String,
  pub text:       Option<String>,
}

/// A person's profile as published by their own node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub guid:       String,
  pub author:     Handle,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
}

/// A comment on a previously delivered post — the relayable variant.
/// A comment must never exist without its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub guid:        String,
  pub author:      Handle,
  pub parent_guid: String,
  pub text:        String,
}

/// An instruction to remove a previously delivered object.
///
/// A retraction carries no guid of its own; it is addressed by the guid of
/// its target. The `author` is the retractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retraction {
  pub target_guid: String,
  pub target_type: ObjectType,
  pub author:      Handle,
}

/// A contact request — the mechanism for establishing a contact
/// relationship, and therefore the one variant exempt from requiring one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
  pub guid:      String,
  pub author:    Handle,
  pub recipient: Handle,
}

// ─── FederatedObject ─────────────────────────────────────────────────────────

/// The tagged union over every payload variant a remote node may deliver.
/// The variant name doubles as the `object_type` discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum FederatedObject {
  StatusMessage(StatusMessage),
  Photo(Photo),
  Profile(Profile),
  Comment(Comment),
  Retraction(Retraction),
  Request(Request),
}

impl FederatedObject {
  pub fn object_type(&self) -> ObjectType {
    match self {
      Self::StatusMessage(_) => ObjectType::StatusMessage,
      Self::Photo(_) => ObjectType::Photo,
      Self::Profile(_) => ObjectType::Profile,
      Self::Comment(_) => ObjectType::Comment,
      Self::Retraction(_) => ObjectType::Retraction,
      Self::Request(_) => ObjectType::Request,
    }
  }

  /// The guid this object is addressed by. For a retraction that is the
  /// guid of its target; retractions have no guid of their own.
  pub fn guid(&self) -> &str {
    match self {
      Self::StatusMessage(o) => &o.guid,
      Self::Photo(o) => &o.guid,
      Self::Profile(o) => &o.guid,
      Self::Comment(o) => &o.guid,
      Self::Retraction(o) => &o.target_guid,
      Self::Request(o) => &o.guid,
    }
  }

  /// The declared author. For a retraction, the retractor.
  pub fn author(&self) -> &Handle {
    match self {
      Self::StatusMessage(o) => &o.author,
      Self::Photo(o) => &o.author,
      Self::Profile(o) => &o.author,
      Self::Comment(o) => &o.author,
      Self::Retraction(o) => &o.author,
      Self::Request(o) => &o.author,
    }
  }

  /// The parent guid, for variants with a parent concept.
  pub fn parent_guid(&self) -> Option<&str> {
    match self {
      Self::Comment(o) => Some(&o.parent_guid),
      _ => None,
    }
  }

  pub fn is_request(&self) -> bool { matches!(self, Self::Request(_)) }

  /// Structural self-validation. The pipeline rejects any object that
  /// fails this before consulting the store.
  pub fn check(&self) -> Result<()> {
    match self {
      Self::StatusMessage(o) => {
        require(!o.guid.is_empty(), "status message has no guid")?;
        require(!o.text.trim().is_empty(), "status message has no text")
      }
      Self::Photo(o) => {
        require(!o.guid.is_empty(), "photo has no guid")?;
        require(!o.remote_url.trim().is_empty(), "photo has no remote url")
      }
      Self::Profile(o) => require(!o.guid.is_empty(), "profile has no guid"),
      Self::Comment(o) => {
        require(!o.guid.is_empty(), "comment has no guid")?;
        require(!o.parent_guid.is_empty(), "comment has no parent guid")?;
        require(!o.text.trim().is_empty(), "comment has no text")
      }
      Self::Retraction(o) => {
        require(!o.target_guid.is_empty(), "retraction has no target guid")?;
        require(
          o.target_type.is_persistable(),
          "retraction target type is not a persisted object",
        )
      }
      Self::Request(o) => {
        require(!o.guid.is_empty(), "request has no guid")?;
        require(o.author != o.recipient, "request addressed to its own author")
      }
    }
  }

  /// Serialise the inner payload (without the type tag) for the `payload`
  /// database column.
  pub fn to_payload(&self) -> Result<serde_json::Value> {
    // The full serialised form is `{"type": "...", "data": <payload>}`.
    // We want only the payload.
    let full = serde_json::to_value(self)?;
    Ok(full.get("data").cloned().unwrap_or(serde_json::Value::Null))
  }

  /// Deserialise from the discriminant string and JSON payload stored in
  /// the database.
  pub fn from_payload(
    object_type: ObjectType,
    data: serde_json::Value,
  ) -> Result<Self> {
    let wrapped =
      serde_json::json!({ "type": object_type.as_str(), "data": data });
    Ok(serde_json::from_value(wrapped)?)
  }
}

fn require(ok: bool, flaw: &str) -> Result<()> {
  if ok {
    Ok(())
  } else {
    Err(Error::InvalidObject(flaw.to_owned()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn handle(s: &str) -> Handle { Handle::parse(s).unwrap() }

  fn status(guid: &str, author: &str, text: &str) -> FederatedObject {
    FederatedObject::StatusMessage(StatusMessage {
      guid:   guid.to_owned(),
      author: handle(author),
      text:   text.to_owned(),
    })
  }

  #[test]
  fn discriminant_roundtrip() {
    for ty in [
      ObjectType::StatusMessage,
      ObjectType::Photo,
      ObjectType::Profile,
      ObjectType::Comment,
      ObjectType::Retraction,
      ObjectType::Request,
    ] {
      assert_eq!(ObjectType::from_discriminant(ty.as_str()).unwrap(), ty);
    }
    assert!(ObjectType::from_discriminant("poll").is_err());
  }

  #[test]
  fn retraction_and_request_are_not_persistable() {
    assert!(!ObjectType::Retraction.is_persistable());
    assert!(!ObjectType::Request.is_persistable());
    assert!(ObjectType::StatusMessage.is_persistable());
    assert!(ObjectType::Comment.is_persistable());
  }

  #[test]
  fn payload_roundtrip_preserves_object() {
    let object = status("g1", "alice@pod.example", "store this!");
    let payload = object.to_payload().unwrap();
    let back =
      FederatedObject::from_payload(ObjectType::StatusMessage, payload)
        .unwrap();
    assert_eq!(back, object);
  }

  #[test]
  fn check_rejects_empty_guid_and_text() {
    assert!(status("", "alice@pod.example", "hi").check().is_err());
    assert!(status("g1", "alice@pod.example", "  ").check().is_err());
    assert!(status("g1", "alice@pod.example", "hi").check().is_ok());
  }

  #[test]
  fn check_rejects_comment_without_parent() {
    let comment = FederatedObject::Comment(Comment {
      guid:        "c1".to_owned(),
      author:      handle("alice@pod.example"),
      parent_guid: String::new(),
      text:        "nice".to_owned(),
    });
    assert!(comment.check().is_err());
  }

  #[test]
  fn check_rejects_retraction_of_unpersisted_type() {
    let retraction = FederatedObject::Retraction(Retraction {
      target_guid: "g1".to_owned(),
      target_type: ObjectType::Retraction,
      author:      handle("alice@pod.example"),
    });
    assert!(retraction.check().is_err());
  }

  #[test]
  fn retraction_guid_is_the_target_guid() {
    let retraction = FederatedObject::Retraction(Retraction {
      target_guid: "g9".to_owned(),
      target_type: ObjectType::StatusMessage,
      author:      handle("alice@pod.example"),
    });
    assert_eq!(retraction.guid(), "g9");
  }
}
