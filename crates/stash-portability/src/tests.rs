//! Shim tests — ephemeral backend directly, and the remote backend against
//! a real service boundary on a loopback listener.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use stash_core::{
  asset::{AssetOrigin, AssetType, ImageMetadata},
  partition::{ContextId, ScopeId},
};
use stash_store_memory::MemoryStore;
use uuid::Uuid;

use crate::{DblobAssets, ShimError, mime};

fn upload_origin(file_name: &str) -> AssetOrigin {
  AssetOrigin::User {
    source:    "upload".into(),
    media:     None,
    url:       None,
    file_name: Some(file_name.into()),
  }
}

fn small_image_metadata() -> ImageMetadata {
  ImageMetadata {
    width:  8,
    height: 8,
    average_color: None,
    author: None,
    tags: None,
    description: None,
  }
}

// ─── Ephemeral backend ───────────────────────────────────────────────────────

#[tokio::test]
async fn ephemeral_add_and_get() {
  let shim = DblobAssets::ephemeral();

  let id = shim
    .add_db_image_asset(
      ScopeId::AppChat,
      mime::IMG_PNG,
      b"hello",
      "hello.png",
      upload_origin("hello.png"),
      small_image_metadata(),
    )
    .await
    .unwrap();

  let asset = shim.get_image_asset(id).await.unwrap().expect("asset present");
  assert_eq!(asset.label, "hello.png");
  assert_eq!(asset.content.mime_type, mime::IMG_PNG);
  assert_eq!(asset.content.base64, BASE64.encode(b"hello"));
  assert_eq!(asset.scope_id, ScopeId::AppChat);
}

#[tokio::test]
async fn blob_url_decodes_payload_and_cleans_up() {
  let shim = DblobAssets::ephemeral();

  let id = shim
    .add_db_image_asset(
      ScopeId::AppChat,
      mime::IMG_PNG,
      b"payload bytes",
      "blob.png",
      upload_origin("blob.png"),
      small_image_metadata(),
    )
    .await
    .unwrap();

  let blob = shim.get_image_asset_as_blob_url(id).await.unwrap();
  assert!(blob.url().starts_with("file://"));
  assert_eq!(blob.mime_type(), mime::IMG_PNG);
  assert_eq!(blob.bytes().as_ref(), b"payload bytes");
  assert_eq!(std::fs::read(blob.path()).unwrap(), b"payload bytes");

  let path = blob.path().to_path_buf();
  drop(blob);
  assert!(!path.exists());
}

#[tokio::test]
async fn blob_url_for_missing_asset_errors() {
  let shim = DblobAssets::ephemeral();

  let err = shim
    .get_image_asset_as_blob_url(Uuid::new_v4())
    .await
    .unwrap_err();
  assert!(matches!(err, ShimError::NotFound(_)));
}

#[tokio::test]
async fn ephemeral_image_gc() {
  let shim = DblobAssets::ephemeral();

  let mut ids = Vec::new();
  for label in ["a", "b", "c"] {
    ids.push(
      shim
        .add_db_image_asset(
          ScopeId::AttachmentDrafts,
          mime::IMG_PNG,
          label.as_bytes(),
          label,
          upload_origin(label),
          small_image_metadata(),
        )
        .await
        .unwrap(),
    );
  }

  let deleted = shim
    .gc_db_image_assets(ContextId::Global, ScopeId::AttachmentDrafts, &[ids[1]])
    .await
    .unwrap();
  assert_eq!(deleted, 2);

  assert!(shim.get_db_asset(ids[0]).await.unwrap().is_none());
  assert!(shim.get_db_asset(ids[1]).await.unwrap().is_some());
  assert!(shim.get_db_asset(ids[2]).await.unwrap().is_none());
}

// ─── Remote backend ──────────────────────────────────────────────────────────

/// Serve the real API router over loopback, backed by a memory store.
async fn spawn_boundary() -> String {
  let api = stash_api::api_router(Arc::new(MemoryStore::new()));
  let app = axum::Router::new().nest("/api", api);

  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });

  format!("http://{addr}")
}

#[tokio::test]
async fn remote_backend_is_interchangeable() {
  let base_url = spawn_boundary().await;
  let shim = DblobAssets::remote(&base_url).unwrap();

  // The same calls as the ephemeral tests, answered by the boundary.
  let id = shim
    .add_db_image_asset(
      ScopeId::AttachmentDrafts,
      mime::IMG_JPEG,
      b"jpeg bytes",
      "photo.jpg",
      upload_origin("photo.jpg"),
      small_image_metadata(),
    )
    .await
    .unwrap();

  let asset = shim.get_image_asset(id).await.unwrap().expect("asset present");
  assert_eq!(asset.label, "photo.jpg");
  assert_eq!(asset.content.base64, BASE64.encode(b"jpeg bytes"));

  shim
    .transfer_db_asset_context_scope(id, ContextId::Global, ScopeId::AppChat)
    .await
    .unwrap();

  // The draft scope is now empty; a keep-nothing sweep there deletes 0.
  let swept = shim
    .gc_db_assets_by_scope(ContextId::Global, ScopeId::AttachmentDrafts, None, &[])
    .await
    .unwrap();
  assert_eq!(swept, 0);

  let blob = shim.get_image_asset_as_blob_url(id).await.unwrap();
  assert_eq!(blob.bytes().as_ref(), b"jpeg bytes");

  shim.delete_db_asset(id).await.unwrap();
  assert!(shim.get_db_asset(id).await.unwrap().is_none());
}

#[tokio::test]
async fn remote_single_round_trip_gc() {
  let base_url = spawn_boundary().await;
  let shim = DblobAssets::remote(&base_url).unwrap();

  let keep = shim
    .add_db_image_asset(
      ScopeId::AppDraw,
      mime::IMG_PNG,
      b"keep",
      "keep.png",
      upload_origin("keep.png"),
      small_image_metadata(),
    )
    .await
    .unwrap();
  shim
    .add_db_image_asset(
      ScopeId::AppDraw,
      mime::IMG_PNG,
      b"drop",
      "drop.png",
      upload_origin("drop.png"),
      small_image_metadata(),
    )
    .await
    .unwrap();

  let outcome = shim
    .store()
    .gc_assets_by_scope(
      &ContextId::Global,
      &ScopeId::AppDraw,
      Some(AssetType::Image),
      &[keep],
    )
    .await
    .unwrap();
  assert_eq!(outcome.count, 1);
  assert!(shim.get_db_asset(keep).await.unwrap().is_some());
}
