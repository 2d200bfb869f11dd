//! Error types for `voti-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown period: {0:?}")]
  UnknownPeriod(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
