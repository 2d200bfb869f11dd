//! The `GradeStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `voti-store-sqlite`).
//! Higher layers (`voti-api`, `voti-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  grade::{Grade, GradeEntry, NewGrade, Period, PeriodEntry},
  user::User,
};

/// Abstraction over a grade store backend.
///
/// Grades are append-only: there are no update or delete operations. Every
/// listing is scoped to a single owner.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait GradeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Look up a user. A missing row is `Ok(None)`; only genuine backend
  /// failures are errors.
  fn get_user<'a>(
    &'a self,
    owner_id: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Insert a user row. Inserting an owner that already exists is a no-op and
  /// returns the stored row.
  fn add_user<'a>(
    &'a self,
    owner_id: &'a str,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  // ── Grades: append-only writes ───────────────────────────────────────

  /// Record a new grade and return the persisted [`Grade`].
  fn insert_grade(
    &self,
    input: NewGrade,
  ) -> impl Future<Output = Result<Grade, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All grades for `owner_id`, optionally restricted to one subject, newest
  /// first.
  fn list_all<'a>(
    &'a self,
    owner_id: &'a str,
    subject: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<Grade>, Self::Error>> + Send + 'a;

  /// Grades for `owner_id` in `period`, newest first.
  fn list_by_period<'a>(
    &'a self,
    owner_id: &'a str,
    period: Period,
  ) -> impl Future<Output = Result<Vec<Grade>, Self::Error>> + Send + 'a;

  /// All grades for `owner_id`, oldest first.
  fn list_all_chronological<'a>(
    &'a self,
    owner_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Grade>, Self::Error>> + Send + 'a;

  /// Projected grades for one subject, oldest first.
  fn list_by_subject<'a>(
    &'a self,
    owner_id: &'a str,
    subject: &'a str,
  ) -> impl Future<Output = Result<Vec<GradeEntry>, Self::Error>> + Send + 'a;

  /// Projected grades for one period, oldest first.
  fn list_by_period_projected<'a>(
    &'a self,
    owner_id: &'a str,
    period: Period,
  ) -> impl Future<Output = Result<Vec<PeriodEntry>, Self::Error>> + Send + 'a;

  /// Projected grades across every subject and period, oldest first.
  fn list_all_projected<'a>(
    &'a self,
    owner_id: &'a str,
  ) -> impl Future<Output = Result<Vec<GradeEntry>, Self::Error>> + Send + 'a;
}
