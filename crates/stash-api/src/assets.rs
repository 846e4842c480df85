//! Handlers for `/assets` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/assets` | `?assetType=` required; `contextId`+`scopeId` optional, together |
//! | `POST`   | `/assets` | Body: [`CreateBody`]; returns 201 + `{"id": ...}` |
//! | `GET`    | `/assets/:id` | 404 if not found |
//! | `PATCH`  | `/assets/:id` | Body: partial update; 404 if not found |
//! | `DELETE` | `/assets/:id` | Already-gone is success |
//! | `POST`   | `/assets/:id/transfer` | Body: `{"contextId":..,"scopeId":..}` |
//! | `POST`   | `/assets/delete` | Body: `{"ids":[..]}`; returns `{"count": n}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use stash_core::{
  asset::{Asset, AssetContent, AssetMetadata, AssetOrigin, AssetType, AssetUpdate, NewAsset},
  partition::{ContextId, ScopeId},
  store::AssetStore,
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub asset_type: AssetType,
  pub context_id: Option<ContextId>,
  pub scope_id:   Option<ScopeId>,
}

/// `GET /assets?assetType=<t>[&contextId=<c>&scopeId=<s>]`
///
/// With a `(contextId, scopeId)` pair this is the scoped listing; without,
/// the type-wide listing. Supplying only one of the pair is a validation
/// error rather than a silent fallback.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Asset>>, ApiError>
where
  S: AssetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let assets = match (params.context_id, params.scope_id) {
    (Some(context_id), Some(scope_id)) => store
      .list_by_scope_and_type(params.asset_type, &context_id, &scope_id)
      .await
      .map_err(ApiError::store)?,
    (None, None) => store
      .list_by_type(params.asset_type)
      .await
      .map_err(ApiError::store)?,
    _ => {
      return Err(ApiError::Validation(
        "contextId and scopeId must be provided together".into(),
      ));
    }
  };

  Ok(Json(assets))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /assets`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateBody {
  pub asset_type: AssetType,
  pub label:      String,
  pub content:    AssetContent,
  pub origin:     AssetOrigin,
  pub metadata:   AssetMetadata,
  #[serde(default)]
  pub context_id: Option<ContextId>,
  #[serde(default)]
  pub scope_id:   Option<ScopeId>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
  pub id: Uuid,
}

/// `POST /assets` — returns 201 + the freshly assigned id.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AssetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let input = NewAsset {
    asset_type: body.asset_type,
    label:      body.label,
    content:    body.content,
    origin:     body.origin,
    metadata:   body.metadata,
    context_id: body.context_id.unwrap_or_default(),
    scope_id:   body.scope_id.unwrap_or_default(),
  };

  // Fail fast on shape problems; the store validates again before writing.
  input
    .validate()
    .map_err(|e| ApiError::Validation(e.to_string()))?;

  let asset = store.add(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(CreatedResponse { id: asset.id })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /assets/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Asset>, ApiError>
where
  S: AssetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let asset = store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("asset {id} not found")))?;
  Ok(Json(asset))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /assets/:id` — body: [`AssetUpdate`]; only provided fields change.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(changes): Json<AssetUpdate>,
) -> Result<Json<Asset>, ApiError>
where
  S: AssetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  // Metadata payloads are checked against the stored type here, so the
  // mismatch surfaces as a 400 instead of an opaque backend failure.
  if let Some(metadata) = &changes.metadata {
    let existing = store
      .get(id)
      .await
      .map_err(ApiError::store)?
      .ok_or_else(|| ApiError::NotFound(format!("asset {id} not found")))?;
    if !metadata.matches(existing.asset_type) {
      return Err(ApiError::Validation(format!(
        "metadata does not match asset type {}",
        existing.asset_type
      )));
    }
  }

  let asset = store
    .update(id, changes)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("asset {id} not found")))?;
  Ok(Json(asset))
}

// ─── Transfer ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransferBody {
  pub context_id: ContextId,
  pub scope_id:   ScopeId,
}

/// `POST /assets/:id/transfer` — repartition an asset; content unchanged.
pub async fn transfer_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<TransferBody>,
) -> Result<StatusCode, ApiError>
where
  S: AssetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let moved = store
    .transfer_scope(id, &body.context_id, &body.scope_id)
    .await
    .map_err(ApiError::store)?;

  if !moved {
    return Err(ApiError::NotFound(format!("asset {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /assets/:id` — deleting an id that is already gone is success.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: AssetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store.delete(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteManyBody {
  pub ids: Vec<Uuid>,
}

/// Count of records a bulk operation removed.
#[derive(Debug, Serialize)]
pub struct CountResponse {
  pub count: u64,
}

/// `POST /assets/delete` — bulk delete by id list. The count may be less
/// than the number of ids when some were already gone; that is reported,
/// not an error.
pub async fn delete_many<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<DeleteManyBody>,
) -> Result<Json<CountResponse>, ApiError>
where
  S: AssetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let count = store.delete_many(&body.ids).await.map_err(ApiError::store)?;
  if (count as usize) < body.ids.len() {
    tracing::debug!(
      requested = body.ids.len(),
      deleted = count,
      "bulk delete found some ids already gone"
    );
  }
  Ok(Json(CountResponse { count }))
}
