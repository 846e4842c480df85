//! The legacy DBlob function surface, rehomed onto the asset store.
//!
//! Call sites ported from the old blob API keep their call shape; only the
//! receiver changes. `DblobAssets` is generic over the backing store, so
//! the same functions run against the remote service boundary or against a
//! process-local map, and callers are oblivious to which one answers.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use stash_core::{
  asset::{
    Asset, AssetContent, AssetMetadata, AssetOrigin, AssetType, ImageMetadata,
    NewAsset,
  },
  gc,
  partition::{ContextId, ScopeId},
  store::AssetStore,
};
use stash_store_memory::MemoryStore;
use uuid::Uuid;

use crate::{AssetsClient, BlobUrl, ClientError};

/// Well-known mime types the legacy store enumerated.
pub mod mime {
  pub const IMG_PNG: &str = "image/png";
  pub const IMG_JPEG: &str = "image/jpeg";
  pub const IMG_WEBP: &str = "image/webp";
  pub const AUDIO_MPEG: &str = "audio/mpeg";
  pub const AUDIO_WAV: &str = "audio/wav";
}

#[derive(Debug, thiserror::Error)]
pub enum ShimError {
  #[error("asset {0} not found")]
  NotFound(Uuid),

  #[error("base64 decode error: {0}")]
  Base64(#[from] base64::DecodeError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ShimError {
  fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Self::Store(Box::new(e))
  }
}

/// The legacy function surface over an injected backing store.
#[derive(Clone)]
pub struct DblobAssets<S> {
  store: S,
}

impl DblobAssets<AssetsClient> {
  /// Back the shim with the real remote store through the service boundary.
  pub fn remote(base_url: impl Into<String>) -> Result<Self, ClientError> {
    Ok(Self { store: AssetsClient::new(base_url)? })
  }
}

impl DblobAssets<MemoryStore> {
  /// Back the shim with an ephemeral process-local map. For call sites
  /// with no reachable durable backend (e.g. pre-authentication flows);
  /// nothing survives the process.
  pub fn ephemeral() -> Self {
    Self { store: MemoryStore::new() }
  }
}

impl<S: AssetStore> DblobAssets<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  /// Legacy `addDBImageAsset`: store raw image bytes as an `IMAGE` asset in
  /// `(GLOBAL, scope_id)` and return the assigned id.
  pub async fn add_db_image_asset(
    &self,
    scope_id: ScopeId,
    mime_type: &str,
    bytes: impl AsRef<[u8]>,
    label: impl Into<String>,
    origin: AssetOrigin,
    metadata: ImageMetadata,
  ) -> Result<Uuid, ShimError> {
    let input = NewAsset::new(
      AssetType::Image,
      label,
      AssetContent {
        mime_type: mime_type.to_owned(),
        base64:    BASE64.encode(bytes.as_ref()),
      },
      origin,
      AssetMetadata::Image(metadata),
    )
    .with_scope(ContextId::Global, scope_id);

    let asset = self.store.add(input).await.map_err(ShimError::store)?;
    Ok(asset.id)
  }

  /// Legacy `getDBAsset`.
  pub async fn get_db_asset(&self, id: Uuid) -> Result<Option<Asset>, ShimError> {
    self.store.get(id).await.map_err(ShimError::store)
  }

  /// Legacy `getImageAsset`. The old call sites only ever held image ids;
  /// like them, this does not re-check the stored type.
  pub async fn get_image_asset(&self, id: Uuid) -> Result<Option<Asset>, ShimError> {
    self.get_db_asset(id).await
  }

  /// Legacy `getImageAssetAsBlobURL`: decode the stored base64 payload into
  /// a temporary local handle suitable for direct rendering.
  pub async fn get_image_asset_as_blob_url(
    &self,
    id: Uuid,
  ) -> Result<BlobUrl, ShimError> {
    let asset = self
      .get_image_asset(id)
      .await?
      .ok_or(ShimError::NotFound(id))?;

    let bytes = Bytes::from(BASE64.decode(asset.content.base64.as_bytes())?);
    Ok(BlobUrl::create(bytes, &asset.content.mime_type)?)
  }

  /// Legacy `deleteDBAsset`. Already-gone is success.
  pub async fn delete_db_asset(&self, id: Uuid) -> Result<(), ShimError> {
    self.store.delete(id).await.map_err(ShimError::store)?;
    Ok(())
  }

  /// Legacy `transferDBAssetContextScope`.
  pub async fn transfer_db_asset_context_scope(
    &self,
    id: Uuid,
    context_id: ContextId,
    scope_id: ScopeId,
  ) -> Result<(), ShimError> {
    let moved = self
      .store
      .transfer_scope(id, &context_id, &scope_id)
      .await
      .map_err(ShimError::store)?;

    if !moved {
      return Err(ShimError::NotFound(id));
    }
    Ok(())
  }

  /// Legacy `gcDBAssetsByScope`: sweep a partition against a caller-supplied
  /// keep-list; returns the number deleted.
  pub async fn gc_db_assets_by_scope(
    &self,
    context_id: ContextId,
    scope_id: ScopeId,
    asset_type: Option<AssetType>,
    keep_ids: &[Uuid],
  ) -> Result<u64, ShimError> {
    let outcome =
      gc::sweep_scope(&self.store, &context_id, &scope_id, asset_type, keep_ids)
        .await
        .map_err(ShimError::store)?;
    Ok(outcome.count)
  }

  /// Legacy `gcDBImageAssets`: image-filtered sweep.
  pub async fn gc_db_image_assets(
    &self,
    context_id: ContextId,
    scope_id: ScopeId,
    keep_ids: &[Uuid],
  ) -> Result<u64, ShimError> {
    self
      .gc_db_assets_by_scope(context_id, scope_id, Some(AssetType::Image), keep_ids)
      .await
  }
}
