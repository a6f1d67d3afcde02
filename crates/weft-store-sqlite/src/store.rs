//! [`SqliteStore`] — the SQLite implementation of [`NodeStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use weft_core::{
  contact::Contact,
  identity::{Handle, Person},
  object::{FederatedObject, ObjectType},
  store::{CommitOutcome, NodeStore, PersistedObject},
};

use crate::{
  Error, Result,
  encode::{RawContact, RawObject, RawPerson, decode_handle, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Weft node store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// are serialized on the connection's dedicated thread, which is what makes
/// the guarded commit atomic across concurrent messages.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Commit outcome as computed inside the write transaction, before the
/// domain types are reattached.
enum RawCommit {
  Created,
  Replaced,
  Skipped(String),
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── NodeStore impl ──────────────────────────────────────────────────────────

impl NodeStore for SqliteStore {
  type Error = Error;

  // ── Objects ───────────────────────────────────────────────────────────────

  async fn commit(&self, object: FederatedObject) -> Result<CommitOutcome> {
    let object_type = object.object_type();
    if !object_type.is_persistable() {
      return Err(Error::NotPersistable(object_type));
    }

    let persisted = PersistedObject { object, recorded_at: Utc::now() };

    let guid_str     = persisted.object.guid().to_owned();
    let type_str     = object_type.as_str().to_owned();
    let author_str   = persisted.object.author().as_str().to_owned();
    let payload_str  = persisted.object.to_payload()?.to_string();
    let recorded_str = encode_dt(persisted.recorded_at);

    let raw = self
      .conn
      .call(move |conn| {
        // The guard condition and the write share one transaction: two
        // concurrent messages for the same guid cannot both pass the
        // author check before either writes.
        let tx = conn.transaction()?;

        let existing: Option<String> = tx
          .query_row(
            "SELECT author FROM objects WHERE guid = ?1 AND object_type = ?2",
            rusqlite::params![guid_str, type_str],
            |r| r.get(0),
          )
          .optional()?;

        let outcome = match existing {
          None => {
            tx.execute(
              "INSERT INTO objects (guid, object_type, author, payload, recorded_at)
               VALUES (?1, ?2, ?3, ?4, ?5)",
              rusqlite::params![
                guid_str,
                type_str,
                author_str,
                payload_str,
                recorded_str,
              ],
            )?;
            RawCommit::Created
          }
          Some(existing_author) if existing_author == author_str => {
            tx.execute(
              "UPDATE objects SET payload = ?3, recorded_at = ?4
               WHERE guid = ?1 AND object_type = ?2",
              rusqlite::params![guid_str, type_str, payload_str, recorded_str],
            )?;
            RawCommit::Replaced
          }
          Some(existing_author) => RawCommit::Skipped(existing_author),
        };

        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    Ok(match raw {
      RawCommit::Created => CommitOutcome::Created(persisted),
      RawCommit::Replaced => CommitOutcome::Replaced(persisted),
      RawCommit::Skipped(author) => CommitOutcome::Skipped {
        existing_author: decode_handle(&author)?,
      },
    })
  }

  async fn lookup_by_guid(
    &self,
    guid: &str,
    object_type: Option<ObjectType>,
  ) -> Result<Option<PersistedObject>> {
    let guid_str = guid.to_owned();
    let type_str = object_type.map(|t| t.as_str().to_owned());

    let raw: Option<RawObject> = self
      .conn
      .call(move |conn| {
        let map = |row: &rusqlite::Row<'_>| {
          Ok(RawObject {
            object_type: row.get(0)?,
            payload:     row.get(1)?,
            recorded_at: row.get(2)?,
          })
        };

        let row = if let Some(t) = type_str {
          conn
            .query_row(
              "SELECT object_type, payload, recorded_at FROM objects
               WHERE guid = ?1 AND object_type = ?2",
              rusqlite::params![guid_str, t],
              map,
            )
            .optional()?
        } else {
          conn
            .query_row(
              "SELECT object_type, payload, recorded_at FROM objects
               WHERE guid = ?1",
              rusqlite::params![guid_str],
              map,
            )
            .optional()?
        };

        Ok(row)
      })
      .await?;

    raw.map(RawObject::into_persisted).transpose()
  }

  async fn remove_object(
    &self,
    guid: &str,
    object_type: ObjectType,
  ) -> Result<bool> {
    let guid_str = guid.to_owned();
    let type_str = object_type.as_str().to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM objects WHERE guid = ?1 AND object_type = ?2",
          rusqlite::params![guid_str, type_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    Ok(removed)
  }

  async fn count_objects(
    &self,
    object_type: Option<ObjectType>,
  ) -> Result<usize> {
    let type_str = object_type.map(|t| t.as_str().to_owned());

    let count: i64 = self
      .conn
      .call(move |conn| {
        let n = if let Some(t) = type_str {
          conn.query_row(
            "SELECT COUNT(*) FROM objects WHERE object_type = ?1",
            rusqlite::params![t],
            |r| r.get(0),
          )?
        } else {
          conn.query_row("SELECT COUNT(*) FROM objects", [], |r| r.get(0))?
        };
        Ok(n)
      })
      .await?;

    Ok(count as usize)
  }

  // ── People ────────────────────────────────────────────────────────────────

  async fn add_person(&self, handle: &Handle) -> Result<Person> {
    let person = Person {
      person_guid: Uuid::new_v4(),
      handle:      handle.clone(),
      created_at:  Utc::now(),
    };

    let id_str     = encode_uuid(person.person_guid);
    let handle_str = person.handle.as_str().to_owned();
    let at_str     = encode_dt(person.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM people WHERE handle = ?1",
            rusqlite::params![handle_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !exists {
          tx.execute(
            "INSERT INTO people (person_guid, handle, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![id_str, handle_str, at_str],
          )?;
        }
        tx.commit()?;
        Ok(!exists)
      })
      .await?;

    if !inserted {
      return Err(Error::PersonExists(handle.as_str().to_owned()));
    }
    Ok(person)
  }

  async fn lookup_person(&self, handle: &Handle) -> Result<Option<Person>> {
    let handle_str = handle.as_str().to_owned();

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT person_guid, handle, created_at FROM people WHERE handle = ?1",
              rusqlite::params![handle_str],
              |row| {
                Ok(RawPerson {
                  person_guid: row.get(0)?,
                  handle:      row.get(1)?,
                  created_at:  row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  // ── Contacts ──────────────────────────────────────────────────────────────

  async fn add_contact(
    &self,
    recipient: &Handle,
    person: &Handle,
    aspect: Option<String>,
  ) -> Result<Contact> {
    let contact = Contact {
      recipient:  recipient.clone(),
      person:     person.clone(),
      aspect,
      created_at: Utc::now(),
    };

    let recipient_str = contact.recipient.as_str().to_owned();
    let person_str    = contact.person.as_str().to_owned();
    let aspect_val    = contact.aspect.clone();
    let at_str        = encode_dt(contact.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM contacts WHERE recipient = ?1 AND person = ?2",
            rusqlite::params![recipient_str, person_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !exists {
          tx.execute(
            "INSERT INTO contacts (recipient, person, aspect, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![recipient_str, person_str, aspect_val, at_str],
          )?;
        }
        tx.commit()?;
        Ok(!exists)
      })
      .await?;

    if !inserted {
      return Err(Error::ContactExists {
        recipient: recipient.as_str().to_owned(),
        person:    person.as_str().to_owned(),
      });
    }
    Ok(contact)
  }

  async fn lookup_contact(
    &self,
    recipient: &Handle,
    person: &Handle,
  ) -> Result<bool> {
    let recipient_str = recipient.as_str().to_owned();
    let person_str    = person.as_str().to_owned();

    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM contacts WHERE recipient = ?1 AND person = ?2",
              rusqlite::params![recipient_str, person_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(found)
  }

  async fn count_contacts(&self, recipient: &Handle) -> Result<usize> {
    let recipient_str = recipient.as_str().to_owned();

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM contacts WHERE recipient = ?1",
          rusqlite::params![recipient_str],
          |r| r.get(0),
        )?)
      })
      .await?;

    Ok(count as usize)
  }

  async fn list_contacts(&self, recipient: &Handle) -> Result<Vec<Contact>> {
    let recipient_str = recipient.as_str().to_owned();

    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT recipient, person, aspect, created_at FROM contacts
           WHERE recipient = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![recipient_str], |row| {
            Ok(RawContact {
              recipient:  row.get(0)?,
              person:     row.get(1)?,
              aspect:     row.get(2)?,
              created_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }
}
