//! Handlers for the `/grades` endpoint.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/grades` | `?id_utente&action` required; `subject` / `periodo` depending on the action |
//! | `POST` | `/grades` | Body: [`WriteBody`]; returns `{"success":true}` |
//!
//! Both handlers validate their input before touching the store, then
//! provision the user and run exactly one store operation.

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use voti_core::{
  grade::{Grade, GradeEntry, NewGrade, Period, PeriodEntry},
  provision::ensure_user_exists,
  store::GradeStore,
};

use crate::error::ApiError;

/// Lowest and highest grade accepted by `POST /grades`.
pub const VALUE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=10.0;

// ─── Read ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ReadParams {
  /// Required: the owner whose grades to return.
  pub id_utente: Option<String>,
  /// Required: which listing to run, see [`ReadAction`].
  pub action:    Option<String>,
  /// Subject filter for `voti`; required for `fetchGrades`.
  pub subject:   Option<String>,
  /// Required for `periodGrades`.
  pub periodo:   Option<String>,
}

/// The listing selected by the `action` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadAction {
  /// `voti`: every grade, newest first, optionally for one subject.
  All { subject: Option<String> },
  /// `trimestre` / `pentamestre`: one period, newest first.
  Period(Period),
  /// `trimestrePentamestre`: every grade, oldest first.
  Chronological,
  /// `fetchGrades`: one subject, projected, oldest first.
  Subject(String),
  /// `allGrades`: every grade, projected, oldest first.
  AllProjected,
  /// `periodGrades`: one period, projected, oldest first.
  PeriodProjected(Period),
}

impl ReadAction {
  /// Resolve the action and the parameters it needs.
  pub fn from_params(
    action: Option<&str>,
    subject: Option<String>,
    periodo: Option<&str>,
  ) -> Result<Self, ApiError> {
    let action = action.ok_or_else(|| ApiError::BadRequest("missing action".into()))?;
    match action {
      "voti" => Ok(Self::All { subject }),
      "trimestre" => Ok(Self::Period(Period::Trimestre)),
      "pentamestre" => Ok(Self::Period(Period::Pentamestre)),
      "trimestrePentamestre" => Ok(Self::Chronological),
      "fetchGrades" => subject
        .map(Self::Subject)
        .ok_or_else(|| ApiError::BadRequest("fetchGrades requires subject".into())),
      "allGrades" => Ok(Self::AllProjected),
      "periodGrades" => {
        let periodo = periodo
          .ok_or_else(|| ApiError::BadRequest("periodGrades requires periodo".into()))?;
        Ok(Self::PeriodProjected(parse_period(periodo)?))
      }
      other => Err(ApiError::BadRequest(format!("no valid action specified: {other:?}"))),
    }
  }
}

/// The rows of a read response. Which shape is returned depends on the action.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GradeRows {
  Full(Vec<Grade>),
  Entries(Vec<GradeEntry>),
  PeriodEntries(Vec<PeriodEntry>),
}

#[derive(Debug, Serialize)]
pub struct GradesResponse {
  pub grades: GradeRows,
}

/// `GET /grades?id_utente=<owner>&action=<action>[&subject=...][&periodo=...]`
pub async fn read<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<ReadParams>, QueryRejection>,
) -> Result<Json<GradesResponse>, ApiError>
where
  S: GradeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

  let owner = non_empty(params.id_utente)
    .ok_or_else(|| ApiError::BadRequest("missing id_utente".into()))?;
  let action = ReadAction::from_params(
    non_empty(params.action).as_deref(),
    non_empty(params.subject),
    non_empty(params.periodo).as_deref(),
  )?;

  provision(&*store, &owner).await?;

  let grades = match action {
    ReadAction::All { subject } => {
      GradeRows::Full(store.list_all(&owner, subject.as_deref()).await.map_err(ApiError::store)?)
    }
    ReadAction::Period(period) => {
      GradeRows::Full(store.list_by_period(&owner, period).await.map_err(ApiError::store)?)
    }
    ReadAction::Chronological => {
      GradeRows::Full(store.list_all_chronological(&owner).await.map_err(ApiError::store)?)
    }
    ReadAction::Subject(subject) => GradeRows::Entries(
      store.list_by_subject(&owner, &subject).await.map_err(ApiError::store)?,
    ),
    ReadAction::AllProjected => {
      GradeRows::Entries(store.list_all_projected(&owner).await.map_err(ApiError::store)?)
    }
    ReadAction::PeriodProjected(period) => GradeRows::PeriodEntries(
      store
        .list_by_period_projected(&owner, period)
        .await
        .map_err(ApiError::store)?,
    ),
  };

  Ok(Json(GradesResponse { grades }))
}

// ─── Write ────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /grades`.
///
/// Every field is optional at the type level so that missing fields produce a
/// descriptive 400 instead of a deserialisation rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteBody {
  pub id_utente: Option<String>,
  pub subject:   Option<String>,
  pub voto:      Option<f64>,
  pub note:      Option<String>,
  /// ISO calendar date, `YYYY-MM-DD`.
  pub data:      Option<String>,
  /// `trimestre` or `pentamestre`.
  pub periodo:   Option<String>,
}

impl WriteBody {
  /// Validate the body and turn it into store input.
  pub fn into_new_grade(self) -> Result<NewGrade, ApiError> {
    let owner_id = non_empty(self.id_utente);
    let subject  = non_empty(self.subject);
    let data     = non_empty(self.data);
    let periodo  = non_empty(self.periodo);

    let missing: Vec<&str> = [
      ("idUtente", owner_id.is_none()),
      ("subject", subject.is_none()),
      ("voto", self.voto.is_none()),
      ("data", data.is_none()),
      ("periodo", periodo.is_none()),
    ]
    .into_iter()
    .filter_map(|(name, absent)| absent.then_some(name))
    .collect();

    let (Some(owner_id), Some(subject), Some(value), Some(data), Some(periodo)) =
      (owner_id, subject, self.voto, data, periodo)
    else {
      return Err(ApiError::BadRequest(format!(
        "missing required fields: {}",
        missing.join(", ")
      )));
    };

    if !VALUE_RANGE.contains(&value) {
      return Err(ApiError::BadRequest(format!(
        "voto must be between {} and {}, got {value}",
        VALUE_RANGE.start(),
        VALUE_RANGE.end()
      )));
    }

    let date = NaiveDate::parse_from_str(&data, "%Y-%m-%d").map_err(|_| {
      ApiError::BadRequest(format!("data must be a YYYY-MM-DD date, got {data:?}"))
    })?;

    Ok(NewGrade {
      owner_id,
      subject,
      value,
      note: non_empty(self.note),
      date,
      period: parse_period(&periodo)?,
    })
  }
}

#[derive(Debug, Serialize)]
pub struct WriteResponse {
  pub success: bool,
}

/// `POST /grades` with a [`WriteBody`].
pub async fn write<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<WriteBody>, JsonRejection>,
) -> Result<Json<WriteResponse>, ApiError>
where
  S: GradeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let input = body.into_new_grade()?;

  provision(&*store, &input.owner_id).await?;

  let grade = store.insert_grade(input).await.map_err(ApiError::store)?;
  tracing::debug!(grade_id = %grade.grade_id, owner = %grade.owner_id, "grade recorded");

  Ok(Json(WriteResponse { success: true }))
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

async fn provision<S>(store: &S, owner: &str) -> Result<(), ApiError>
where
  S: GradeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if ensure_user_exists(store, owner).await.map_err(ApiError::store)? {
    tracing::info!(owner, "provisioned new user");
  }
  Ok(())
}

fn parse_period(s: &str) -> Result<Period, ApiError> {
  s.parse().map_err(|e: voti_core::Error| ApiError::BadRequest(e.to_string()))
}

/// Treat empty strings like absent values.
fn non_empty(s: Option<String>) -> Option<String> { s.filter(|s| !s.is_empty()) }
