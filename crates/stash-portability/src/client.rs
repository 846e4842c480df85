//! Async HTTP client wrapping the stash JSON API.
//!
//! Implements [`AssetStore`], so everything generic over the trait — the GC
//! engine, the legacy shim — works against a remote service boundary exactly
//! as it does against a local backend.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use stash_core::{
  asset::{Asset, AssetType, AssetUpdate, NewAsset},
  gc::SweepOutcome,
  partition::{ContextId, ScopeId},
  store::AssetStore,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("http transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("{method} {path} → {status}")]
  Status {
    method: &'static str,
    path:   String,
    status: reqwest::StatusCode,
  },

  /// The boundary acknowledged the create but the readback found nothing —
  /// a concurrent sweep or delete got there first.
  #[error("created asset {0} could not be fetched back")]
  CreateReadback(Uuid),
}

#[derive(Debug, Deserialize)]
struct CreatedBody {
  id: Uuid,
}

#[derive(Debug, Deserialize)]
struct CountBody {
  count: u64,
}

/// Async HTTP client for the stash JSON API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct AssetsClient {
  client:   reqwest::Client,
  base_url: String,
}

impl AssetsClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  fn check(
    method: &'static str,
    path: &str,
    resp: &reqwest::Response,
  ) -> Result<(), ClientError> {
    if resp.status().is_success() {
      return Ok(());
    }
    Err(ClientError::Status {
      method,
      path: path.to_owned(),
      status: resp.status(),
    })
  }

  /// `POST /api/scope/gc` — a sweep in one round-trip, for callers that
  /// don't need the generic engine's enumerate-then-delete path.
  pub async fn gc_assets_by_scope(
    &self,
    context_id: &ContextId,
    scope_id: &ScopeId,
    asset_type: Option<AssetType>,
    keep_ids: &[Uuid],
  ) -> Result<SweepOutcome, ClientError> {
    let path = "/scope/gc";
    let resp = self
      .client
      .post(self.url(path))
      .json(&json!({
        "contextId": context_id,
        "scopeId": scope_id,
        "assetType": asset_type,
        "keepIds": keep_ids,
      }))
      .send()
      .await?;

    Self::check("POST", path, &resp)?;
    Ok(resp.json().await?)
  }
}

impl AssetStore for AssetsClient {
  type Error = ClientError;

  async fn add(&self, input: NewAsset) -> Result<Asset, ClientError> {
    let path = "/assets";
    let resp = self
      .client
      .post(self.url(path))
      .json(&json!({
        "assetType": input.asset_type,
        "label": input.label,
        "content": input.content,
        "origin": input.origin,
        "metadata": input.metadata,
        "contextId": input.context_id,
        "scopeId": input.scope_id,
      }))
      .send()
      .await?;

    Self::check("POST", path, &resp)?;
    let created: CreatedBody = resp.json().await?;

    // The boundary returns only the id; read the stored record back so the
    // caller sees the server-assigned timestamps.
    self
      .get(created.id)
      .await?
      .ok_or(ClientError::CreateReadback(created.id))
  }

  async fn get(&self, id: Uuid) -> Result<Option<Asset>, ClientError> {
    let path = format!("/assets/{id}");
    let resp = self.client.get(self.url(&path)).send().await?;

    if resp.status() == reqwest::StatusCode::NOT_FOUND {
      return Ok(None);
    }
    Self::check("GET", &path, &resp)?;
    Ok(Some(resp.json().await?))
  }

  async fn update(
    &self,
    id: Uuid,
    changes: AssetUpdate,
  ) -> Result<Option<Asset>, ClientError> {
    let path = format!("/assets/{id}");
    let resp = self
      .client
      .patch(self.url(&path))
      .json(&changes)
      .send()
      .await?;

    if resp.status() == reqwest::StatusCode::NOT_FOUND {
      return Ok(None);
    }
    Self::check("PATCH", &path, &resp)?;
    Ok(Some(resp.json().await?))
  }

  async fn transfer_scope(
    &self,
    id: Uuid,
    context_id: &ContextId,
    scope_id: &ScopeId,
  ) -> Result<bool, ClientError> {
    let path = format!("/assets/{id}/transfer");
    let resp = self
      .client
      .post(self.url(&path))
      .json(&json!({ "contextId": context_id, "scopeId": scope_id }))
      .send()
      .await?;

    if resp.status() == reqwest::StatusCode::NOT_FOUND {
      return Ok(false);
    }
    Self::check("POST", &path, &resp)?;
    Ok(true)
  }

  async fn delete(&self, id: Uuid) -> Result<bool, ClientError> {
    let path = format!("/assets/{id}");
    let resp = self.client.delete(self.url(&path)).send().await?;

    Self::check("DELETE", &path, &resp)?;
    // The boundary reports already-gone as success, so "removed just now"
    // and "was already gone" are indistinguishable here.
    Ok(true)
  }

  async fn list_by_type(
    &self,
    asset_type: AssetType,
  ) -> Result<Vec<Asset>, ClientError> {
    let path = "/assets";
    let resp = self
      .client
      .get(self.url(path))
      .query(&[("assetType", asset_type.as_str())])
      .send()
      .await?;

    Self::check("GET", path, &resp)?;
    Ok(resp.json().await?)
  }

  async fn list_by_scope_and_type(
    &self,
    asset_type: AssetType,
    context_id: &ContextId,
    scope_id: &ScopeId,
  ) -> Result<Vec<Asset>, ClientError> {
    let path = "/assets";
    let resp = self
      .client
      .get(self.url(path))
      .query(&[
        ("assetType", asset_type.as_str()),
        ("contextId", context_id.as_str()),
        ("scopeId", scope_id.as_str()),
      ])
      .send()
      .await?;

    Self::check("GET", path, &resp)?;
    Ok(resp.json().await?)
  }

  async fn list_scope_ids(
    &self,
    context_id: &ContextId,
    scope_id: &ScopeId,
    asset_type: Option<AssetType>,
  ) -> Result<Vec<Uuid>, ClientError> {
    // The boundary has no id-only listing; enumerate per type and project.
    let types = match asset_type {
      Some(t) => vec![t],
      None => vec![AssetType::Image, AssetType::Audio],
    };

    let mut ids = Vec::new();
    for t in types {
      let assets = self.list_by_scope_and_type(t, context_id, scope_id).await?;
      ids.extend(assets.into_iter().map(|a| a.id));
    }
    Ok(ids)
  }

  async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, ClientError> {
    if ids.is_empty() {
      return Ok(0);
    }

    let path = "/assets/delete";
    let resp = self
      .client
      .post(self.url(path))
      .json(&json!({ "ids": ids }))
      .send()
      .await?;

    Self::check("POST", path, &resp)?;
    let body: CountBody = resp.json().await?;
    Ok(body.count)
  }

  async fn delete_all_scoped(
    &self,
    context_id: &ContextId,
    scope_id: &ScopeId,
  ) -> Result<u64, ClientError> {
    let path = "/scope/delete";
    let resp = self
      .client
      .post(self.url(path))
      .json(&json!({ "contextId": context_id, "scopeId": scope_id }))
      .send()
      .await?;

    Self::check("POST", path, &resp)?;
    let body: CountBody = resp.json().await?;
    Ok(body.count)
  }
}
