//! SQL schema for the Colonia SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout in case it ever changes.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS colonies (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    phone       TEXT,
    description TEXT,
    latitude    REAL,
    longitude   REAL
);

-- Cats are never deleted; `deleted_at` marks them instead.
-- `colony_id` carries no foreign key: colonies are removed outright and the
-- cats that pointed at them keep the dangling id.
CREATE TABLE IF NOT EXISTS cats (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL,
    age         REAL    NOT NULL,
    weight      REAL    NOT NULL,
    vaccinated  INTEGER NOT NULL DEFAULT 0,
    sterilized  INTEGER NOT NULL DEFAULT 0,
    conditions  TEXT    NOT NULL DEFAULT '[]',  -- JSON array of strings
    colony_id   INTEGER,
    deleted_at  TEXT                            -- ISO 8601 UTC or NULL
);

CREATE INDEX IF NOT EXISTS cats_colony_idx ON cats(colony_id);

PRAGMA user_version = 1;
";
