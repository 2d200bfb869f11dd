//! Async HTTP client wrapping the voti JSON API.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use voti_core::grade::{Grade, GradeEntry, Period};

/// Connection settings for the voti API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Owner id sent with every request; normally supplied by the identity
  /// provider.
  pub owner_id: String,
}

/// A grade to submit with [`ApiClient::add_grade`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GradeBody<'a> {
  id_utente: &'a str,
  subject:   &'a str,
  voto:      f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  note:      Option<&'a str>,
  data:      NaiveDate,
  periodo:   Period,
}

#[derive(Deserialize)]
struct GradesBody<T> {
  grades: Vec<T>,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Async HTTP client for the voti JSON API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!("{}/api/grades", self.config.base_url.trim_end_matches('/'))
  }

  /// Turn a non-success response into an error carrying the server's message.
  async fn check(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<ErrorBody>()
      .await
      .map(|b| b.error)
      .unwrap_or_else(|_| "no error message".to_string());
    Err(anyhow!("{what} → {status}: {message}"))
  }

  async fn fetch<T: DeserializeOwned>(
    &self,
    action: &str,
    extra: &[(&str, &str)],
  ) -> Result<Vec<T>> {
    let mut query = vec![("id_utente", self.config.owner_id.as_str()), ("action", action)];
    query.extend_from_slice(extra);

    tracing::debug!(action, "GET /grades");
    let resp = self
      .client
      .get(self.url())
      .query(&query)
      .send()
      .await
      .with_context(|| format!("GET /grades?action={action} failed"))?;

    let body: GradesBody<T> = Self::check(resp, "GET /grades")
      .await?
      .json()
      .await
      .context("deserialising grades")?;
    Ok(body.grades)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// `GET /api/grades?action=voti[&subject=<s>]`
  pub async fn list(&self, subject: Option<&str>) -> Result<Vec<Grade>> {
    match subject {
      Some(s) => self.fetch("voti", &[("subject", s)]).await,
      None => self.fetch("voti", &[]).await,
    }
  }

  /// `GET /api/grades?action=<trimestre|pentamestre>`
  pub async fn period(&self, period: Period) -> Result<Vec<Grade>> {
    self.fetch(period.as_str(), &[]).await
  }

  /// `GET /api/grades?action=fetchGrades&subject=<s>`
  pub async fn subject(&self, subject: &str) -> Result<Vec<GradeEntry>> {
    self.fetch("fetchGrades", &[("subject", subject)]).await
  }

  /// `GET /api/grades?action=allGrades`
  pub async fn year(&self) -> Result<Vec<GradeEntry>> { self.fetch("allGrades", &[]).await }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// `POST /api/grades`
  pub async fn add_grade(
    &self,
    subject: &str,
    voto: f64,
    data: NaiveDate,
    periodo: Period,
    note: Option<&str>,
  ) -> Result<()> {
    let body = GradeBody {
      id_utente: &self.config.owner_id,
      subject,
      voto,
      note,
      data,
      periodo,
    };

    let resp = self
      .client
      .post(self.url())
      .json(&body)
      .send()
      .await
      .context("POST /grades failed")?;
    Self::check(resp, "POST /grades").await?;
    Ok(())
  }
}
