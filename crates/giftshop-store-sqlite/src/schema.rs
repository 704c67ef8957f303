//! SQL schema for the Giftshop SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- An import has no data of its own; it only scopes citizen ids.
CREATE TABLE IF NOT EXISTS imports (
    import_id INTEGER PRIMARY KEY AUTOINCREMENT
);

CREATE TABLE IF NOT EXISTS citizens (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    import_id   INTEGER NOT NULL REFERENCES imports(import_id),
    citizen_id  INTEGER NOT NULL,
    town        TEXT    NOT NULL,
    street      TEXT    NOT NULL,
    building    TEXT    NOT NULL,
    apartment   INTEGER NOT NULL,
    name        TEXT    NOT NULL,
    birth_date  TEXT    NOT NULL,              -- ISO 8601 calendar date
    gender      TEXT    NOT NULL,              -- 'male' | 'female'
    relatives   TEXT    NOT NULL DEFAULT '[]', -- JSON array of citizen_id
    UNIQUE (import_id, citizen_id),
    CHECK  (citizen_id >= 0 AND apartment >= 0)
);

PRAGMA user_version = 1;
";
