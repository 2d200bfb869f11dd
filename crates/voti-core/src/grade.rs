//! Grade records and the projections read back from the store.
//!
//! Grades are never updated or deleted once recorded. Field names on the wire
//! follow the JSON shape the dashboard consumes (`idUtente`, `voto`, `data`,
//! `periodo`), while the Rust names describe what the fields hold.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

// ─── Period ──────────────────────────────────────────────────────────────────

/// One of the two grading periods of the academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
  Trimestre,
  Pentamestre,
}

impl Period {
  pub const ALL: [Period; 2] = [Period::Trimestre, Period::Pentamestre];

  /// The string stored in the `period` column and sent on the wire.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Trimestre => "trimestre",
      Self::Pentamestre => "pentamestre",
    }
  }
}

impl fmt::Display for Period {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(self.as_str())
  }
}

impl FromStr for Period {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "trimestre" => Ok(Self::Trimestre),
      "pentamestre" => Ok(Self::Pentamestre),
      other => Err(Error::UnknownPeriod(other.to_owned())),
    }
  }
}

// ─── Grade ───────────────────────────────────────────────────────────────────

/// A stored grade. `grade_id` and `recorded_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
  #[serde(rename = "id")]
  pub grade_id:    Uuid,
  #[serde(rename = "idUtente")]
  pub owner_id:    String,
  pub subject:     String,
  #[serde(rename = "voto")]
  pub value:       f64,
  pub note:        Option<String>,
  #[serde(rename = "data")]
  pub date:        NaiveDate,
  #[serde(rename = "periodo")]
  pub period:      Period,
  #[serde(rename = "created_at")]
  pub recorded_at: DateTime<Utc>,
}

/// Input to [`crate::store::GradeStore::insert_grade`].
///
/// The store performs no validation of `value` or `date`; callers that accept
/// untrusted input check those first.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGrade {
  pub owner_id: String,
  pub subject:  String,
  pub value:    f64,
  pub note:     Option<String>,
  pub date:     NaiveDate,
  pub period:   Period,
}

// ─── Projections ─────────────────────────────────────────────────────────────

/// A grade without its owner or row metadata, as returned by the per-subject
/// and whole-year listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
  pub subject: String,
  #[serde(rename = "voto")]
  pub value:   f64,
  #[serde(rename = "data")]
  pub date:    NaiveDate,
  #[serde(rename = "periodo")]
  pub period:  Period,
  pub note:    Option<String>,
}

/// A grade inside a listing that is already restricted to one period, so the
/// period is omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodEntry {
  pub subject: String,
  #[serde(rename = "voto")]
  pub value:   f64,
  #[serde(rename = "data")]
  pub date:    NaiveDate,
  pub note:    Option<String>,
}

impl From<Grade> for GradeEntry {
  fn from(g: Grade) -> Self {
    GradeEntry {
      subject: g.subject,
      value:   g.value,
      date:    g.date,
      period:  g.period,
      note:    g.note,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn period_parses_lowercase_names_only() {
    assert_eq!("trimestre".parse::<Period>().unwrap(), Period::Trimestre);
    assert_eq!("pentamestre".parse::<Period>().unwrap(), Period::Pentamestre);
    assert!(matches!(
      "Trimestre".parse::<Period>(),
      Err(Error::UnknownPeriod(s)) if s == "Trimestre"
    ));
  }

  #[test]
  fn grade_serialises_with_wire_names() {
    let grade = Grade {
      grade_id:    Uuid::nil(),
      owner_id:    "u1".into(),
      subject:     "Math".into(),
      value:       8.0,
      note:        None,
      date:        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
      period:      Period::Trimestre,
      recorded_at: DateTime::<Utc>::UNIX_EPOCH,
    };
    let json = serde_json::to_value(&grade).unwrap();
    assert_eq!(json["idUtente"], "u1");
    assert_eq!(json["voto"], 8.0);
    assert_eq!(json["data"], "2025-03-10");
    assert_eq!(json["periodo"], "trimestre");
    assert!(json["note"].is_null());
    assert!(json.get("owner_id").is_none());
  }

  #[test]
  fn period_entry_has_no_period_field() {
    let entry = PeriodEntry {
      subject: "Storia".into(),
      value:   6.5,
      date:    NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
      note:    Some("interrogazione".into()),
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert!(json.get("periodo").is_none());
    assert_eq!(json["note"], "interrogazione");
  }
}
