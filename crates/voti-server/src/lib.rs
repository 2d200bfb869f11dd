//! HTTP server wiring for Voti.
//!
//! Combines the JSON API from `voti-api` with request tracing and holds the
//! runtime configuration the binary deserialises at startup.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use voti_core::store::GradeStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `VOTI_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 3000 }

fn default_store_path() -> PathBuf { PathBuf::from("voti.db") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       default_host(),
      port:       default_port(),
      store_path: default_store_path(),
    }
  }
}

impl ServerConfig {
  /// Layer an optional TOML file under `VOTI_`-prefixed environment variables.
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("VOTI"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: the API under `/api`, with every
/// request traced.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: GradeStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .nest("/api", voti_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}
