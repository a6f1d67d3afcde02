//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, handles verbatim, and object payloads as compact JSON (inner
//! data only; the variant lives in the `object_type` column).

use chrono::{DateTime, Utc};
use uuid::Uuid;
use weft_core::{
  contact::Contact,
  identity::{Handle, Person},
  object::{FederatedObject, ObjectType},
  store::PersistedObject,
};

use crate::Result;

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| crate::Error::DateParse(e.to_string()))
}

// ─── Handle ──────────────────────────────────────────────────────────────────

pub fn decode_handle(s: &str) -> Result<Handle> { Ok(Handle::parse(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `objects` row.
pub struct RawObject {
  pub object_type: String,
  pub payload:     String,
  pub recorded_at: String,
}

impl RawObject {
  pub fn into_persisted(self) -> Result<PersistedObject> {
    let object_type = ObjectType::from_discriminant(&self.object_type)?;
    let payload: serde_json::Value = serde_json::from_str(&self.payload)?;
    let object = FederatedObject::from_payload(object_type, payload)?;

    Ok(PersistedObject {
      object,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw strings read directly from a `people` row.
pub struct RawPerson {
  pub person_guid: String,
  pub handle:      String,
  pub created_at:  String,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_guid: decode_uuid(&self.person_guid)?,
      handle:      decode_handle(&self.handle)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `contacts` row.
pub struct RawContact {
  pub recipient:  String,
  pub person:     String,
  pub aspect:     Option<String>,
  pub created_at: String,
}

impl RawContact {
  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      recipient:  decode_handle(&self.recipient)?,
      person:     decode_handle(&self.person)?,
      aspect:     self.aspect,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
