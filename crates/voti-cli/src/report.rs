//! Plain-text reports built from fetched grades.

use std::fmt::Write as _;

use voti_core::{
  aggregate::{MonthPoint, Standing, Stats, Summary, monthly_series, period_mean},
  grade::{Grade, GradeEntry, Period},
};

/// `7.50`, or `N/A` when there is nothing to average.
pub fn fmt_mean(mean: Option<f64>) -> String {
  mean.map_or_else(|| "N/A".to_string(), |m| format!("{m:.2}"))
}

fn fmt_cell(value: Option<f64>) -> String { value.map_or_else(|| "-".to_string(), |v| format!("{v}")) }

fn standing_label(standing: Standing) -> &'static str {
  match standing {
    Standing::Sufficient => "sufficiente",
    Standing::Borderline => "quasi sufficiente",
    Standing::Insufficient => "insufficiente",
  }
}

fn stats_line(label: &str, stats: Stats) -> String {
  let mut line = format!("{label:<12} media {:>5}  voti {}", fmt_mean(stats.mean), stats.count);
  if let Some(mean) = stats.mean {
    let _ = write!(line, "  ({})", standing_label(Standing::of(mean)));
  }
  line
}

/// One line per grade, in the order given.
pub fn grade_lines(grades: &[Grade]) -> String {
  if grades.is_empty() {
    return "Nessun voto inserito\n".to_string();
  }
  let mut out = String::new();
  for g in grades {
    let _ = write!(
      out,
      "{}  {:<11}  {:<16}  {:>4}",
      g.date, g.period, g.subject, g.value
    );
    if let Some(note) = &g.note {
      let _ = write!(out, "  {note}");
    }
    out.push('\n');
  }
  out
}

/// A period listing followed by its average.
pub fn period_report(period: Period, grades: &[Grade]) -> String {
  let mut out = grade_lines(grades);
  let stats = Stats {
    count: grades.iter().filter(|g| g.period == period).count(),
    mean:  period_mean(grades, Some(period)),
  };
  out.push('\n');
  out.push_str(&stats_line(period.as_str(), stats));
  out.push('\n');
  out
}

/// The ten-month table; months without a grade show `-`.
pub fn month_table(series: &[MonthPoint]) -> String {
  let mut out = format!("{:<5} {:>10} {:>12}\n", "Mese", "Trimestre", "Pentamestre");
  for point in series {
    let _ = writeln!(
      out,
      "{:<5} {:>10} {:>12}",
      point.month.label(),
      fmt_cell(point.trimestre),
      fmt_cell(point.pentamestre),
    );
  }
  out
}

/// Trend table and per-period averages for one subject.
pub fn subject_report(subject: &str, entries: &[GradeEntry]) -> String {
  let mut out = format!("{subject}\n\n");
  out.push_str(&month_table(&monthly_series(entries)));
  out.push('\n');

  let summary = Summary::of(entries);
  for period in Period::ALL {
    out.push_str(&stats_line(period.as_str(), summary.period(period)));
    out.push('\n');
  }
  out
}

/// Trend table and statistics for the whole school year.
pub fn year_report(entries: &[GradeEntry]) -> String {
  if entries.is_empty() {
    return "Nessun voto registrato\n".to_string();
  }

  let mut out = month_table(&monthly_series(entries));
  out.push('\n');

  let summary = Summary::of(entries);
  out.push_str(&stats_line("trimestre", summary.trimestre));
  out.push('\n');
  out.push_str(&stats_line("pentamestre", summary.pentamestre));
  out.push('\n');
  out.push_str(&stats_line("totale", summary.total));
  out.push('\n');
  out
}
