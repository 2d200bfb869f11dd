//! [`SqliteStore`], the SQLite implementation of [`GradeStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use voti_core::{
  grade::{Grade, GradeEntry, NewGrade, Period, PeriodEntry},
  store::GradeStore,
  user::User,
};

use crate::{
  encode::{
    RawEntry, RawGrade, RawPeriodEntry, RawUser, encode_date, encode_dt,
    encode_period, encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A grade store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
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

  /// Run a `SELECT` with positional text arguments and map every row.
  async fn select<R>(
    &self,
    sql: String,
    args: Vec<String>,
    map: fn(&rusqlite::Row<'_>) -> rusqlite::Result<R>,
  ) -> Result<Vec<R>>
  where
    R: Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(args.iter()), map)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn select_grades(&self, sql: String, args: Vec<String>) -> Result<Vec<Grade>> {
    self
      .select(sql, args, RawGrade::from_row)
      .await?
      .into_iter()
      .map(RawGrade::into_grade)
      .collect()
  }
}

// ─── GradeStore impl ─────────────────────────────────────────────────────────

impl GradeStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn get_user(&self, owner_id: &str) -> Result<Option<User>> {
    let owner = owner_id.to_owned();

    // `optional()` turns "no rows" into `None`; every other failure is an
    // error.
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT owner_id, created_at FROM users WHERE owner_id = ?1",
            rusqlite::params![owner],
            |row| {
              Ok(RawUser {
                owner_id:   row.get(0)?,
                created_at: row.get(1)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn add_user(&self, owner_id: &str) -> Result<User> {
    let owner  = owner_id.to_owned();
    let at_str = encode_dt(Utc::now());

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO users (owner_id, created_at) VALUES (?1, ?2)",
          rusqlite::params![owner, at_str],
        )?;
        Ok(conn.query_row(
          "SELECT owner_id, created_at FROM users WHERE owner_id = ?1",
          rusqlite::params![owner],
          |row| {
            Ok(RawUser {
              owner_id:   row.get(0)?,
              created_at: row.get(1)?,
            })
          },
        )?)
      })
      .await?;

    raw.into_user()
  }

  // ── Grades: append-only writes ───────────────────────────────────────────

  async fn insert_grade(&self, input: NewGrade) -> Result<Grade> {
    let grade = Grade {
      grade_id:    Uuid::new_v4(),
      owner_id:    input.owner_id,
      subject:     input.subject,
      value:       input.value,
      note:        input.note,
      date:        input.date,
      period:      input.period,
      recorded_at: Utc::now(),
    };

    let grade_id_str    = encode_uuid(grade.grade_id);
    let owner           = grade.owner_id.clone();
    let subject         = grade.subject.clone();
    let value           = grade.value;
    let note            = grade.note.clone();
    let date_str        = encode_date(grade.date);
    let period_str      = encode_period(grade.period);
    let recorded_at_str = encode_dt(grade.recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO grades (
             grade_id, owner_id, subject, value, note, date, period, recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            grade_id_str,
            owner,
            subject,
            value,
            note,
            date_str,
            period_str,
            recorded_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(grade)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_all(&self, owner_id: &str, subject: Option<&str>) -> Result<Vec<Grade>> {
    let mut args = vec![owner_id.to_owned()];
    let subject_clause = match subject {
      Some(s) => {
        args.push(s.to_owned());
        "AND subject = ?2"
      }
      None => "",
    };

    let sql = format!(
      "SELECT {} FROM grades
       WHERE owner_id = ?1 {subject_clause}
       ORDER BY date DESC, period DESC",
      RawGrade::COLUMNS,
    );
    self.select_grades(sql, args).await
  }

  async fn list_by_period(&self, owner_id: &str, period: Period) -> Result<Vec<Grade>> {
    let sql = format!(
      "SELECT {} FROM grades
       WHERE owner_id = ?1 AND period = ?2
       ORDER BY date DESC",
      RawGrade::COLUMNS,
    );
    let args = vec![owner_id.to_owned(), encode_period(period).to_owned()];
    self.select_grades(sql, args).await
  }

  async fn list_all_chronological(&self, owner_id: &str) -> Result<Vec<Grade>> {
    let sql = format!(
      "SELECT {} FROM grades
       WHERE owner_id = ?1
       ORDER BY date ASC, rowid ASC",
      RawGrade::COLUMNS,
    );
    self.select_grades(sql, vec![owner_id.to_owned()]).await
  }

  async fn list_by_subject(&self, owner_id: &str, subject: &str) -> Result<Vec<GradeEntry>> {
    let sql = format!(
      "SELECT {} FROM grades
       WHERE owner_id = ?1 AND subject = ?2
       ORDER BY date ASC, rowid ASC",
      RawEntry::COLUMNS,
    );
    let args = vec![owner_id.to_owned(), subject.to_owned()];
    self
      .select(sql, args, RawEntry::from_row)
      .await?
      .into_iter()
      .map(RawEntry::into_entry)
      .collect()
  }

  async fn list_by_period_projected(
    &self,
    owner_id: &str,
    period: Period,
  ) -> Result<Vec<PeriodEntry>> {
    let sql = format!(
      "SELECT {} FROM grades
       WHERE owner_id = ?1 AND period = ?2
       ORDER BY date ASC, rowid ASC",
      RawPeriodEntry::COLUMNS,
    );
    let args = vec![owner_id.to_owned(), encode_period(period).to_owned()];
    self
      .select(sql, args, RawPeriodEntry::from_row)
      .await?
      .into_iter()
      .map(RawPeriodEntry::into_entry)
      .collect()
  }

  async fn list_all_projected(&self, owner_id: &str) -> Result<Vec<GradeEntry>> {
    let sql = format!(
      "SELECT {} FROM grades
       WHERE owner_id = ?1
       ORDER BY date ASC, rowid ASC",
      RawEntry::COLUMNS,
    );
    self
      .select(sql, vec![owner_id.to_owned()], RawEntry::from_row)
      .await?
      .into_iter()
      .map(RawEntry::into_entry)
      .collect()
  }
}
