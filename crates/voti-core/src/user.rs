//! The user row every grade hangs off.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user known to the store. Carries no state beyond its identity; it exists
/// so that every grade's owner refers to a provisioned row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  #[serde(rename = "id_utente")]
  pub owner_id:   String,
  pub created_at: DateTime<Utc>,
}
