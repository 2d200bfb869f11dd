//! SQL schema for the Voti SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    owner_id    TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL
);

-- Grades are append-only; no UPDATE or DELETE is ever issued.
-- owner_id is not a foreign key: provisioning runs before every insert.
CREATE TABLE IF NOT EXISTS grades (
    grade_id     TEXT PRIMARY KEY,
    owner_id     TEXT NOT NULL,
    subject      TEXT NOT NULL,
    value        REAL NOT NULL,
    note         TEXT,
    date         TEXT NOT NULL,   -- YYYY-MM-DD, sorts chronologically
    period       TEXT NOT NULL,   -- 'trimestre' | 'pentamestre'
    recorded_at  TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS grades_owner_date_idx ON grades(owner_id, date);
CREATE INDEX IF NOT EXISTS grades_owner_subject_idx ON grades(owner_id, subject);

PRAGMA user_version = 1;
";
