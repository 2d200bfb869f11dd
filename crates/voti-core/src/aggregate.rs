//! Pure aggregation over fetched grades: averages, per-period summaries and
//! the month-bucketed series the trend charts plot.
//!
//! Nothing here holds state; every value is re-derived from the record list.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::grade::{Grade, GradeEntry, Period};

// ─── Graded ──────────────────────────────────────────────────────────────────

/// Anything carrying a value, a date and a period.
pub trait Graded {
  fn value(&self) -> f64;
  fn date(&self) -> NaiveDate;
  fn period(&self) -> Period;
}

impl Graded for Grade {
  fn value(&self) -> f64 { self.value }
  fn date(&self) -> NaiveDate { self.date }
  fn period(&self) -> Period { self.period }
}

impl Graded for GradeEntry {
  fn value(&self) -> f64 { self.value }
  fn date(&self) -> NaiveDate { self.date }
  fn period(&self) -> Period { self.period }
}

// ─── Means ───────────────────────────────────────────────────────────────────

/// Arithmetic mean. `None` when there are no values.
pub fn mean<I>(values: I) -> Option<f64>
where
  I: IntoIterator<Item = f64>,
{
  let (sum, count) = values
    .into_iter()
    .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
  (count > 0).then(|| sum / count as f64)
}

/// Mean of the grades in `period`, or of all grades when `period` is `None`.
pub fn period_mean<G: Graded>(grades: &[G], period: Option<Period>) -> Option<f64> {
  mean(
    grades
      .iter()
      .filter(|g| period.is_none_or(|p| g.period() == p))
      .map(Graded::value),
  )
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// Count and mean of a subset of grades.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
  pub count: usize,
  pub mean:  Option<f64>,
}

impl Stats {
  fn of<G: Graded>(grades: &[G], period: Option<Period>) -> Self {
    let count = grades
      .iter()
      .filter(|g| period.is_none_or(|p| g.period() == p))
      .count();
    Stats { count, mean: period_mean(grades, period) }
  }
}

/// Per-period and whole-year statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
  pub trimestre:   Stats,
  pub pentamestre: Stats,
  pub total:       Stats,
}

impl Summary {
  pub fn of<G: Graded>(grades: &[G]) -> Self {
    Summary {
      trimestre:   Stats::of(grades, Some(Period::Trimestre)),
      pentamestre: Stats::of(grades, Some(Period::Pentamestre)),
      total:       Stats::of(grades, None),
    }
  }

  pub fn period(&self, period: Period) -> Stats {
    match period {
      Period::Trimestre => self.trimestre,
      Period::Pentamestre => self.pentamestre,
    }
  }
}

// ─── Standing ────────────────────────────────────────────────────────────────

/// The pass band an average falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Standing {
  /// 6 or above.
  Sufficient,
  /// At least 5 but below 6.
  Borderline,
  /// Below 5.
  Insufficient,
}

impl Standing {
  pub fn of(mean: f64) -> Self {
    if mean >= 6.0 {
      Self::Sufficient
    } else if mean >= 5.0 {
      Self::Borderline
    } else {
      Self::Insufficient
    }
  }
}

// ─── Academic calendar ───────────────────────────────────────────────────────

/// The ten months of the school year, September through June.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcademicMonth {
  #[serde(rename = "Set")]
  September,
  #[serde(rename = "Ott")]
  October,
  #[serde(rename = "Nov")]
  November,
  #[serde(rename = "Dic")]
  December,
  #[serde(rename = "Gen")]
  January,
  #[serde(rename = "Feb")]
  February,
  #[serde(rename = "Mar")]
  March,
  #[serde(rename = "Apr")]
  April,
  #[serde(rename = "Mag")]
  May,
  #[serde(rename = "Giu")]
  June,
}

impl AcademicMonth {
  /// Calendar order of the school year.
  pub const ALL: [AcademicMonth; 10] = [
    Self::September,
    Self::October,
    Self::November,
    Self::December,
    Self::January,
    Self::February,
    Self::March,
    Self::April,
    Self::May,
    Self::June,
  ];

  /// Map a calendar month (1–12) onto the school year. July and August have
  /// no slot.
  pub fn from_month(month: u32) -> Option<Self> {
    match month {
      9 => Some(Self::September),
      10 => Some(Self::October),
      11 => Some(Self::November),
      12 => Some(Self::December),
      1 => Some(Self::January),
      2 => Some(Self::February),
      3 => Some(Self::March),
      4 => Some(Self::April),
      5 => Some(Self::May),
      6 => Some(Self::June),
      _ => None,
    }
  }

  pub fn of_date(date: NaiveDate) -> Option<Self> { Self::from_month(date.month()) }

  /// Position within [`Self::ALL`].
  pub fn index(self) -> usize { self as usize }

  /// Short Italian label used on chart axes.
  pub fn label(self) -> &'static str {
    match self {
      Self::September => "Set",
      Self::October => "Ott",
      Self::November => "Nov",
      Self::December => "Dic",
      Self::January => "Gen",
      Self::February => "Feb",
      Self::March => "Mar",
      Self::April => "Apr",
      Self::May => "Mag",
      Self::June => "Giu",
    }
  }
}

// ─── Monthly series ──────────────────────────────────────────────────────────

/// One point of the trend chart. A period with no grade that month is `None`,
/// never zero, so the chart leaves a gap instead of plotting a false value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthPoint {
  pub month:       AcademicMonth,
  pub trimestre:   Option<f64>,
  pub pentamestre: Option<f64>,
}

impl MonthPoint {
  pub fn get(&self, period: Period) -> Option<f64> {
    match period {
      Period::Trimestre => self.trimestre,
      Period::Pentamestre => self.pentamestre,
    }
  }
}

/// Bucket grades into the ten school months.
///
/// Each month holds at most one grade per period: the earliest-dated one
/// (input order breaks ties). The year is ignored, so a September grade of
/// any year lands in the same bucket.
pub fn monthly_series<G: Graded>(grades: &[G]) -> [MonthPoint; 10] {
  let mut picked: [[Option<(NaiveDate, f64)>; 2]; 10] = [[None; 2]; 10];

  for g in grades {
    let Some(month) = AcademicMonth::of_date(g.date()) else {
      continue;
    };
    let slot = &mut picked[month.index()][period_slot(g.period())];
    let earlier_kept = matches!(slot, Some((date, _)) if *date <= g.date());
    if !earlier_kept {
      *slot = Some((g.date(), g.value()));
    }
  }

  AcademicMonth::ALL.map(|month| {
    let [trimestre, pentamestre] = picked[month.index()];
    MonthPoint {
      month,
      trimestre: trimestre.map(|(_, v)| v),
      pentamestre: pentamestre.map(|(_, v)| v),
    }
  })
}

fn period_slot(period: Period) -> usize {
  match period {
    Period::Trimestre => 0,
    Period::Pentamestre => 1,
  }
}
