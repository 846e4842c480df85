//! Handlers for scope-level maintenance: bulk delete and GC sweeps.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/scope/delete` | Wipe a `(context, scope)` partition; returns `{"count": n}` |
//! | `POST` | `/scope/gc` | External mark-and-sweep; returns `{"count": n}` |

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use stash_core::{
  asset::AssetType,
  gc::{self, SweepOutcome},
  partition::{ContextId, ScopeId},
  store::AssetStore,
};
use uuid::Uuid;

use crate::{assets::CountResponse, error::ApiError};

// ─── Scope wipe ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScopeBody {
  pub context_id: ContextId,
  pub scope_id:   ScopeId,
}

/// `POST /scope/delete` — delete every asset in the partition.
pub async fn delete_scoped<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<ScopeBody>,
) -> Result<Json<CountResponse>, ApiError>
where
  S: AssetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let count = store
    .delete_all_scoped(&body.context_id, &body.scope_id)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    context = %body.context_id,
    scope = %body.scope_id,
    count,
    "deleted all scoped assets"
  );
  Ok(Json(CountResponse { count }))
}

// ─── GC ───────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /scope/gc`.
///
/// `keepIds` is the caller's authoritative live set, recomputed immediately
/// before each sweep. An empty list means "keep nothing".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GcBody {
  pub context_id: ContextId,
  pub scope_id:   ScopeId,
  #[serde(default)]
  pub asset_type: Option<AssetType>,
  pub keep_ids:   Vec<Uuid>,
}

/// `POST /scope/gc` — sweep unreferenced assets in one partition.
pub async fn gc_scoped<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<GcBody>,
) -> Result<Json<SweepOutcome>, ApiError>
where
  S: AssetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let outcome = gc::sweep_scope(
    store.as_ref(),
    &body.context_id,
    &body.scope_id,
    body.asset_type,
    &body.keep_ids,
  )
  .await
  .map_err(ApiError::store)?;

  Ok(Json(outcome))
}
