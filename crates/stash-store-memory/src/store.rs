//! [`MemoryStore`] — the process-local implementation of [`AssetStore`].

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use stash_core::{
  asset::{Asset, AssetType, AssetUpdate, NewAsset},
  partition::{ContextId, ScopeId},
  store::AssetStore,
};

/// An asset store living entirely in process memory.
///
/// Cloning is cheap — clones share the same map. The lock guards one
/// operation at a time and is never held across another store call, so the
/// concurrency contract matches the durable backend: per-operation
/// atomicity, last-write-wins between racing updates.
#[derive(Clone, Default)]
pub struct MemoryStore {
  assets: Arc<RwLock<HashMap<Uuid, Asset>>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Number of assets currently held. Test and diagnostics helper.
  pub async fn len(&self) -> usize { self.assets.read().await.len() }

  pub async fn is_empty(&self) -> bool { self.assets.read().await.is_empty() }
}

fn newest_first(assets: &mut [Asset]) {
  assets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

impl AssetStore for MemoryStore {
  type Error = stash_core::Error;

  // ── Single-record operations ──────────────────────────────────────────────

  async fn add(&self, input: NewAsset) -> Result<Asset, Self::Error> {
    input.validate()?;

    let now = Utc::now();
    let asset = Asset {
      id: Uuid::new_v4(),
      asset_type: input.asset_type,
      label: input.label,
      content: input.content,
      origin: input.origin,
      metadata: input.metadata,
      context_id: input.context_id,
      scope_id: input.scope_id,
      cache: serde_json::Value::Object(Default::default()),
      created_at: now,
      updated_at: now,
    };

    self.assets.write().await.insert(asset.id, asset.clone());
    Ok(asset)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Asset>, Self::Error> {
    Ok(self.assets.read().await.get(&id).cloned())
  }

  async fn update(
    &self,
    id: Uuid,
    changes: AssetUpdate,
  ) -> Result<Option<Asset>, Self::Error> {
    let mut assets = self.assets.write().await;

    let Some(asset) = assets.get_mut(&id) else {
      return Ok(None);
    };

    if let Some(metadata) = &changes.metadata
      && !metadata.matches(asset.asset_type)
    {
      return Err(stash_core::Error::MetadataMismatch(asset.asset_type));
    }

    if let Some(label) = changes.label {
      asset.label = label;
    }
    if let Some(metadata) = changes.metadata {
      asset.metadata = metadata;
    }
    if let Some(cache) = changes.cache {
      asset.cache = cache;
    }
    asset.updated_at = Utc::now();

    Ok(Some(asset.clone()))
  }

  async fn transfer_scope(
    &self,
    id: Uuid,
    context_id: &ContextId,
    scope_id: &ScopeId,
  ) -> Result<bool, Self::Error> {
    let mut assets = self.assets.write().await;

    let Some(asset) = assets.get_mut(&id) else {
      return Ok(false);
    };

    asset.context_id = context_id.clone();
    asset.scope_id = scope_id.clone();
    asset.updated_at = Utc::now();
    Ok(true)
  }

  async fn delete(&self, id: Uuid) -> Result<bool, Self::Error> {
    Ok(self.assets.write().await.remove(&id).is_some())
  }

  // ── Listing ────────────────────────────────────────────────────────────────

  async fn list_by_type(
    &self,
    asset_type: AssetType,
  ) -> Result<Vec<Asset>, Self::Error> {
    let mut matches: Vec<Asset> = self
      .assets
      .read()
      .await
      .values()
      .filter(|a| a.asset_type == asset_type)
      .cloned()
      .collect();

    newest_first(&mut matches);
    Ok(matches)
  }

  async fn list_by_scope_and_type(
    &self,
    asset_type: AssetType,
    context_id: &ContextId,
    scope_id: &ScopeId,
  ) -> Result<Vec<Asset>, Self::Error> {
    let mut matches: Vec<Asset> = self
      .assets
      .read()
      .await
      .values()
      .filter(|a| {
        a.asset_type == asset_type
          && a.context_id == *context_id
          && a.scope_id == *scope_id
      })
      .cloned()
      .collect();

    newest_first(&mut matches);
    Ok(matches)
  }

  async fn list_scope_ids(
    &self,
    context_id: &ContextId,
    scope_id: &ScopeId,
    asset_type: Option<AssetType>,
  ) -> Result<Vec<Uuid>, Self::Error> {
    Ok(
      self
        .assets
        .read()
        .await
        .values()
        .filter(|a| {
          a.context_id == *context_id
            && a.scope_id == *scope_id
            && asset_type.is_none_or(|t| a.asset_type == t)
        })
        .map(|a| a.id)
        .collect(),
    )
  }

  // ── Bulk deletion ──────────────────────────────────────────────────────────

  async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, Self::Error> {
    let mut assets = self.assets.write().await;
    let mut count = 0u64;
    for id in ids {
      if assets.remove(id).is_some() {
        count += 1;
      }
    }
    Ok(count)
  }

  async fn delete_all_scoped(
    &self,
    context_id: &ContextId,
    scope_id: &ScopeId,
  ) -> Result<u64, Self::Error> {
    let mut assets = self.assets.write().await;
    let before = assets.len();
    assets
      .retain(|_, a| a.context_id != *context_id || a.scope_id != *scope_id);
    Ok((before - assets.len()) as u64)
  }
}
