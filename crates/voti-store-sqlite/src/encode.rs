//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`,
//! UUIDs as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use voti_core::{
  grade::{Grade, GradeEntry, Period, PeriodEntry},
  user::User,
};

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Period ───────────────────────────────────────────────────────────────────

pub fn encode_period(p: Period) -> &'static str { p.as_str() }

pub fn decode_period(s: &str) -> Result<Period> { Ok(s.parse()?) }

// ─── Raw row types ────────────────────────────────────────────────────────────

/// Column values for a `users` row before decoding.
pub struct RawUser {
  pub owner_id:   String,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      owner_id:   self.owner_id,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Column values for a full `grades` row before decoding.
pub struct RawGrade {
  pub grade_id:    String,
  pub owner_id:    String,
  pub subject:     String,
  pub value:       f64,
  pub note:        Option<String>,
  pub date:        String,
  pub period:      String,
  pub recorded_at: String,
}

impl RawGrade {
  pub const COLUMNS: &'static str =
    "grade_id, owner_id, subject, value, note, date, period, recorded_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawGrade {
      grade_id:    row.get(0)?,
      owner_id:    row.get(1)?,
      subject:     row.get(2)?,
      value:       row.get(3)?,
      note:        row.get(4)?,
      date:        row.get(5)?,
      period:      row.get(6)?,
      recorded_at: row.get(7)?,
    })
  }

  pub fn into_grade(self) -> Result<Grade> {
    Ok(Grade {
      grade_id:    decode_uuid(&self.grade_id)?,
      owner_id:    self.owner_id,
      subject:     self.subject,
      value:       self.value,
      note:        self.note,
      date:        decode_date(&self.date)?,
      period:      decode_period(&self.period)?,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

/// Column values for the `subject, value, date, period, note` projection.
pub struct RawEntry {
  pub subject: String,
  pub value:   f64,
  pub date:    String,
  pub period:  String,
  pub note:    Option<String>,
}

impl RawEntry {
  pub const COLUMNS: &'static str = "subject, value, date, period, note";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawEntry {
      subject: row.get(0)?,
      value:   row.get(1)?,
      date:    row.get(2)?,
      period:  row.get(3)?,
      note:    row.get(4)?,
    })
  }

  pub fn into_entry(self) -> Result<GradeEntry> {
    Ok(GradeEntry {
      subject: self.subject,
      value:   self.value,
      date:    decode_date(&self.date)?,
      period:  decode_period(&self.period)?,
      note:    self.note,
    })
  }
}

/// Column values for the `subject, value, date, note` projection.
pub struct RawPeriodEntry {
  pub subject: String,
  pub value:   f64,
  pub date:    String,
  pub note:    Option<String>,
}

impl RawPeriodEntry {
  pub const COLUMNS: &'static str = "subject, value, date, note";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawPeriodEntry {
      subject: row.get(0)?,
      value:   row.get(1)?,
      date:    row.get(2)?,
      note:    row.get(3)?,
    })
  }

  pub fn into_entry(self) -> Result<PeriodEntry> {
    Ok(PeriodEntry {
      subject: self.subject,
      value:   self.value,
      date:    decode_date(&self.date)?,
      note:    self.note,
    })
  }
}
