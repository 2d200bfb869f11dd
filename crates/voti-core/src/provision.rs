//! Lazy user provisioning.

use crate::store::GradeStore;

/// Make sure a user row exists for `owner_id`, creating it if the lookup finds
/// nothing. Safe to call on every request.
///
/// Returns `true` when this call created the row.
pub async fn ensure_user_exists<S>(
  store: &S,
  owner_id: &str,
) -> Result<bool, S::Error>
where
  S: GradeStore,
{
  if store.get_user(owner_id).await?.is_some() {
    return Ok(false);
  }
  store.add_user(owner_id).await?;
  Ok(true)
}
