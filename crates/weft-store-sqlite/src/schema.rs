//! SQL schema for the Weft SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Remote identities known to this node. At most one row per handle.
CREATE TABLE IF NOT EXISTS people (
    person_guid TEXT PRIMARY KEY,
    handle      TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

-- The object store. One row per federated object; a row is only ever
-- replaced by a payload from the same author (enforced in store.rs inside
-- a single transaction).
CREATE TABLE IF NOT EXISTS objects (
    guid        TEXT NOT NULL,
    object_type TEXT NOT NULL,   -- discriminant of FederatedObject variant
    author      TEXT NOT NULL,
    payload     TEXT NOT NULL,   -- JSON payload (inner data only)
    recorded_at TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    PRIMARY KEY (guid, object_type)
);

-- Directed trust relationships: recipient accepts messages from person.
CREATE TABLE IF NOT EXISTS contacts (
    recipient  TEXT NOT NULL,
    person     TEXT NOT NULL,
    aspect     TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (recipient, person)
);

CREATE INDEX IF NOT EXISTS objects_author_idx     ON objects(author);
CREATE INDEX IF NOT EXISTS contacts_recipient_idx ON contacts(recipient);

PRAGMA user_version = 1;
";
