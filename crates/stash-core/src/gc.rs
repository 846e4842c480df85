//! Scope-scoped mark-and-sweep with an external mark phase.
//!
//! The caller — not this subsystem — knows which ids are still referenced
//! (a chat's current attachment list, a persona gallery) and supplies them
//! as `keep_ids`. The sweep deletes the complement within one
//! `(context, scope)` partition, optionally narrowed to one asset type.
//!
//! Sweeps are caller-invoked and caller-timed; nothing here runs on a
//! schedule, and no scope lock is taken. Two concurrent sweeps with
//! different keep-lists may race — GC is idempotent-enough cleanup, not a
//! correctness-critical transaction. A caller that adds an asset and wants
//! it preserved must recompute `keep_ids` after the add, immediately before
//! sweeping.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  asset::AssetType,
  partition::{ContextId, ScopeId},
  store::AssetStore,
};

/// Result of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepOutcome {
  /// Number of assets deleted.
  pub count: u64,
}

/// The candidate ids minus the keep-set.
///
/// An empty keep-list keeps *nothing* — the whole candidate set is
/// unreferenced. Callers must pass every still-live id explicitly on every
/// sweep.
pub fn unreferenced(candidates: Vec<Uuid>, keep_ids: &[Uuid]) -> Vec<Uuid> {
  if keep_ids.is_empty() {
    return candidates;
  }
  let keep: HashSet<Uuid> = keep_ids.iter().copied().collect();
  candidates.into_iter().filter(|id| !keep.contains(id)).collect()
}

/// Delete every asset in `(context_id, scope_id)` — narrowed to
/// `asset_type` when given — whose id is not in `keep_ids`.
///
/// One candidate enumeration, one bulk delete. Assets outside the
/// partition are never touched, whatever the keep-list says.
pub async fn sweep_scope<S: AssetStore>(
  store: &S,
  context_id: &ContextId,
  scope_id: &ScopeId,
  asset_type: Option<AssetType>,
  keep_ids: &[Uuid],
) -> Result<SweepOutcome, S::Error> {
  let candidates = store
    .list_scope_ids(context_id, scope_id, asset_type)
    .await?;

  let doomed = unreferenced(candidates, keep_ids);
  if doomed.is_empty() {
    return Ok(SweepOutcome { count: 0 });
  }

  let count = store.delete_many(&doomed).await?;
  tracing::debug!(
    context = %context_id,
    scope = %scope_id,
    count,
    "swept unreferenced assets"
  );

  Ok(SweepOutcome { count })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_keep_list_keeps_nothing() {
    let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
    assert_eq!(unreferenced(ids.clone(), &[]), ids);
  }

  #[test]
  fn keep_ids_are_subtracted() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let c = Uuid::new_v4();

    assert_eq!(unreferenced(vec![a, b, c], &[b]), vec![a, c]);
  }

  #[test]
  fn keep_ids_outside_candidates_are_ignored() {
    let a = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    assert_eq!(unreferenced(vec![a], &[stranger]), vec![a]);
  }

  #[test]
  fn full_keep_list_leaves_nothing_unreferenced() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    assert!(unreferenced(vec![a, b], &[a, b]).is_empty());
  }
}
