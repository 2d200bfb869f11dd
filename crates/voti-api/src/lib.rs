//! JSON API for Voti.
//!
//! Exposes an axum [`Router`] backed by any [`voti_core::store::GradeStore`].
//! Identity, TLS, and transport concerns are the caller's responsibility: the
//! owner id arrives as a plain request parameter.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", voti_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod grades;

use std::sync::Arc;

use axum::{Router, routing::get};
use voti_core::store::GradeStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: GradeStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/grades", get(grades::read::<S>).post(grades::write::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use voti_core::{
    aggregate::period_mean,
    grade::{Grade, GradeEntry, NewGrade, Period, PeriodEntry},
    user::User,
  };
  use voti_store_sqlite::SqliteStore;

  // A store whose every operation fails, counting how often it was reached.
  #[derive(Debug, thiserror::Error)]
  #[error("backend unavailable")]
  struct Unavailable;

  #[derive(Default)]
  struct BrokenStore {
    calls: AtomicUsize,
  }

  impl BrokenStore {
    fn fail<T>(&self) -> Result<T, Unavailable> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Err(Unavailable)
    }
  }

  impl GradeStore for BrokenStore {
    type Error = Unavailable;

    async fn get_user(&self, _owner_id: &str) -> Result<Option<User>, Unavailable> {
      self.fail()
    }

    async fn add_user(&self, _owner_id: &str) -> Result<User, Unavailable> { self.fail() }

    async fn insert_grade(&self, _input: NewGrade) -> Result<Grade, Unavailable> {
      self.fail()
    }

    async fn list_all(
      &self,
      _owner_id: &str,
      _subject: Option<&str>,
    ) -> Result<Vec<Grade>, Unavailable> {
      self.fail()
    }

    async fn list_by_period(
      &self,
      _owner_id: &str,
      _period: Period,
    ) -> Result<Vec<Grade>, Unavailable> {
      self.fail()
    }

    async fn list_all_chronological(&self, _owner_id: &str) -> Result<Vec<Grade>, Unavailable> {
      self.fail()
    }

    async fn list_by_subject(
      &self,
      _owner_id: &str,
      _subject: &str,
    ) -> Result<Vec<GradeEntry>, Unavailable> {
      self.fail()
    }

    async fn list_by_period_projected(
      &self,
      _owner_id: &str,
      _period: Period,
    ) -> Result<Vec<PeriodEntry>, Unavailable> {
      self.fail()
    }

    async fn list_all_projected(&self, _owner_id: &str) -> Result<Vec<GradeEntry>, Unavailable> {
      self.fail()
    }
  }

  async fn sqlite() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  async fn send<S>(store: Arc<S>, req: Request<Body>) -> (StatusCode, Value)
  where
    S: GradeStore + Send + Sync + 'static,
  {
    let resp  = api_router(store).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json  = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
  }

  fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
  }

  fn post(body: &Value) -> Request<Body> {
    Request::builder()
      .method("POST")
      .uri("/grades")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap()
  }

  fn math(voto: f64, data: &str, periodo: &str) -> Value {
    json!({
      "idUtente": "u1",
      "subject":  "Math",
      "voto":     voto,
      "data":     data,
      "periodo":  periodo,
    })
  }

  // ── Client errors never reach the store ──────────────────────────────────────

  #[tokio::test]
  async fn read_without_owner_is_400_and_skips_backend() {
    let store = Arc::new(BrokenStore::default());
    let (status, body) = send(store.clone(), get("/grades?action=voti")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing id_utente");
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn read_with_unknown_or_missing_action_is_400() {
    let store = Arc::new(BrokenStore::default());

    let (status, _) = send(store.clone(), get("/grades?id_utente=u1&action=drop")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(store.clone(), get("/grades?id_utente=u1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
      send(store.clone(), get("/grades?id_utente=u1&action=fetchGrades")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("subject"));

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn write_with_missing_fields_is_400_and_skips_backend() {
    let store = Arc::new(BrokenStore::default());
    let (status, body) =
      send(store.clone(), post(&json!({ "idUtente": "u1", "subject": "Math" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing required fields: voto, data, periodo");
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn write_with_invalid_values_is_400() {
    let store = Arc::new(BrokenStore::default());

    for body in [
      math(11.0, "2025-03-10", "trimestre"),
      math(7.0, "2025-02-30", "trimestre"),
      math(7.0, "2025-03-10", "quadrimestre"),
    ] {
      let (status, _) = send(store.clone(), post(&body)).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
    }
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn malformed_json_is_400() {
    let store = Arc::new(BrokenStore::default());
    let req = Request::builder()
      .method("POST")
      .uri("/grades")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();

    let (status, body) = send(store.clone(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
  }

  // ── Backend failures ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn backend_failure_is_500_with_message() {
    let store = Arc::new(BrokenStore::default());

    let (status, body) = send(store.clone(), get("/grades?id_utente=u1&action=voti")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "backend unavailable");

    let (status, _) = send(store.clone(), post(&math(7.0, "2025-03-10", "trimestre"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Provisioning fails first; nothing after it runs.
    assert_eq!(store.calls.load(Ordering::SeqCst), 2);
  }

  // ── Round trips ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn write_then_read_by_period() {
    let store = sqlite().await;

    let (status, body) = send(store.clone(), post(&math(8.0, "2025-03-10", "trimestre"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) =
      send(store.clone(), get("/grades?id_utente=u1&action=trimestre")).await;
    assert_eq!(status, StatusCode::OK);
    let grades = body["grades"].as_array().unwrap();
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0]["subject"], "Math");
    assert_eq!(grades[0]["voto"], 8.0);
    assert_eq!(grades[0]["data"], "2025-03-10");
    assert_eq!(grades[0]["periodo"], "trimestre");
    assert_eq!(grades[0]["idUtente"], "u1");
    assert!(grades[0]["note"].is_null());

    let (_, body) = send(store.clone(), get("/grades?id_utente=u1&action=pentamestre")).await;
    assert_eq!(body["grades"], json!([]));
  }

  #[tokio::test]
  async fn write_provisions_the_user_and_read_of_new_owner_does_too() {
    let store = sqlite().await;

    send(store.clone(), post(&math(8.0, "2025-03-10", "trimestre"))).await;
    assert!(store.get_user("u1").await.unwrap().is_some());

    let (status, body) = send(store.clone(), get("/grades?id_utente=u9&action=allGrades")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grades"], json!([]));
    assert!(store.get_user("u9").await.unwrap().is_some());
  }

  #[tokio::test]
  async fn two_grades_average_to_seven_and_a_half() {
    let store = sqlite().await;
    send(store.clone(), post(&math(6.0, "2025-10-01", "trimestre"))).await;
    send(store.clone(), post(&math(9.0, "2025-11-01", "trimestre"))).await;

    let (_, body) = send(store.clone(), get("/grades?id_utente=u1&action=trimestre")).await;
    let grades: Vec<Grade> = serde_json::from_value(body["grades"].clone()).unwrap();
    assert_eq!(period_mean(&grades, Some(Period::Trimestre)), Some(7.5));
  }

  #[tokio::test]
  async fn projected_actions_return_their_shapes() {
    let store = sqlite().await;
    send(store.clone(), post(&math(6.0, "2025-10-01", "trimestre"))).await;
    let mut storia = math(9.0, "2026-02-01", "pentamestre");
    storia["subject"] = json!("Storia");
    storia["note"] = json!("interrogazione");
    send(store.clone(), post(&storia)).await;

    let (_, body) =
      send(store.clone(), get("/grades?id_utente=u1&action=fetchGrades&subject=Storia")).await;
    let entries: Vec<GradeEntry> = serde_json::from_value(body["grades"].clone()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].note.as_deref(), Some("interrogazione"));
    assert!(body["grades"][0].get("idUtente").is_none());

    let (_, body) = send(store.clone(), get("/grades?id_utente=u1&action=allGrades")).await;
    let entries: Vec<GradeEntry> = serde_json::from_value(body["grades"].clone()).unwrap();
    assert_eq!(entries.iter().map(|e| e.value).collect::<Vec<_>>(), vec![6.0, 9.0]);

    let (_, body) = send(
      store.clone(),
      get("/grades?id_utente=u1&action=periodGrades&periodo=pentamestre"),
    )
    .await;
    assert_eq!(body["grades"].as_array().unwrap().len(), 1);
    assert!(body["grades"][0].get("periodo").is_none());
  }

  #[tokio::test]
  async fn voti_filters_by_subject_and_orders_newest_first() {
    let store = sqlite().await;
    send(store.clone(), post(&math(5.0, "2025-10-01", "trimestre"))).await;
    send(store.clone(), post(&math(7.0, "2026-03-01", "pentamestre"))).await;
    let mut other = math(10.0, "2025-12-01", "trimestre");
    other["subject"] = json!("Inglese");
    send(store.clone(), post(&other)).await;

    let (_, body) = send(store.clone(), get("/grades?id_utente=u1&action=voti")).await;
    assert_eq!(body["grades"].as_array().unwrap().len(), 3);
    assert_eq!(body["grades"][0]["data"], "2026-03-01");

    let (_, body) =
      send(store.clone(), get("/grades?id_utente=u1&action=voti&subject=Math")).await;
    let grades: Vec<Grade> = serde_json::from_value(body["grades"].clone()).unwrap();
    assert_eq!(grades.len(), 2);
    assert!(grades[0].date > grades[1].date);

    let (_, body) =
      send(store.clone(), get("/grades?id_utente=u1&action=trimestrePentamestre")).await;
    let grades: Vec<Grade> = serde_json::from_value(body["grades"].clone()).unwrap();
    assert!(grades.windows(2).all(|w| w[0].date <= w[1].date));
  }
}
