//! Integration tests for `SqliteStore` against an in-memory database.

use stash_core::{
  asset::{
    AssetContent, AssetMetadata, AssetOrigin, AssetType, AssetUpdate,
    AudioMetadata, ImageMetadata, NewAsset,
  },
  gc,
  partition::{ContextId, ScopeId},
  store::AssetStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn png_content() -> AssetContent {
  AssetContent {
    mime_type: "image/png".into(),
    base64:    "iVBORw0KGgo=".into(),
  }
}

fn upload_origin(file_name: &str) -> AssetOrigin {
  AssetOrigin::User {
    source:    "upload".into(),
    media:     None,
    url:       None,
    file_name: Some(file_name.into()),
  }
}

fn image_metadata(width: u32, height: u32) -> AssetMetadata {
  AssetMetadata::Image(ImageMetadata {
    width,
    height,
    average_color: None,
    author: None,
    tags: None,
    description: None,
  })
}

fn image_input(label: &str, scope: ScopeId) -> NewAsset {
  NewAsset::new(
    AssetType::Image,
    label,
    png_content(),
    upload_origin(label),
    image_metadata(100, 100),
  )
  .with_scope(ContextId::Global, scope)
}

fn audio_input(label: &str, scope: ScopeId) -> NewAsset {
  NewAsset::new(
    AssetType::Audio,
    label,
    AssetContent {
      mime_type: "audio/wav".into(),
      base64:    "UklGRg==".into(),
    },
    upload_origin(label),
    AssetMetadata::Audio(AudioMetadata {
      duration:    2.5,
      sample_rate: 44100,
      bitrate:     None,
      channels:    Some(1),
    }),
  )
  .with_scope(ContextId::Global, scope)
}

// ─── Add / get ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_round_trip() {
  let s = store().await;

  let added = s.add(image_input("cat.png", ScopeId::AppChat)).await.unwrap();
  assert_eq!(added.label, "cat.png");
  assert_eq!(added.created_at, added.updated_at);

  let fetched = s.get(added.id).await.unwrap().expect("asset present");
  assert_eq!(fetched.id, added.id);
  assert_eq!(fetched.asset_type, AssetType::Image);
  assert_eq!(fetched.label, "cat.png");
  assert_eq!(fetched.content, added.content);
  assert_eq!(fetched.metadata, added.metadata);
  assert_eq!(fetched.context_id, ContextId::Global);
  assert_eq!(fetched.scope_id, ScopeId::AppChat);
  assert_eq!(fetched.created_at, added.created_at);
}

#[tokio::test]
async fn add_assigns_fresh_ids() {
  let s = store().await;

  let a = s.add(image_input("a", ScopeId::AppChat)).await.unwrap();
  let b = s.add(image_input("b", ScopeId::AppChat)).await.unwrap();
  assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn add_rejects_mismatched_metadata() {
  let s = store().await;

  let mut input = image_input("broken", ScopeId::AppChat);
  input.metadata = AssetMetadata::Audio(AudioMetadata {
    duration:    1.0,
    sample_rate: 44100,
    bitrate:     None,
    channels:    None,
  });

  let err = s.add(input).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(stash_core::Error::MetadataMismatch(AssetType::Image))
  ));
}

// ─── Origin variants ─────────────────────────────────────────────────────────

#[tokio::test]
async fn user_origin_round_trip_has_no_generated_fields() {
  let s = store().await;

  let added = s.add(image_input("photo.png", ScopeId::AppChat)).await.unwrap();
  let fetched = s.get(added.id).await.unwrap().unwrap();

  match fetched.origin {
    AssetOrigin::User { source, file_name, .. } => {
      assert_eq!(source, "upload");
      assert_eq!(file_name.as_deref(), Some("photo.png"));
    }
    AssetOrigin::Generated { .. } => panic!("user origin came back generated"),
  }
}

#[tokio::test]
async fn generated_origin_round_trip() {
  let s = store().await;

  let mut input = image_input("balloon", ScopeId::AppDraw);
  input.origin = AssetOrigin::Generated {
    source:         "ai-text-to-image".into(),
    generator_name: "prodia".into(),
    prompt:         "a red balloon".into(),
    parameters:     serde_json::json!({ "steps": 25, "cfg": 7 }),
    generated_at:   None,
  };

  let added = s.add(input).await.unwrap();
  let fetched = s.get(added.id).await.unwrap().unwrap();

  match fetched.origin {
    AssetOrigin::Generated { generator_name, prompt, parameters, .. } => {
      assert_eq!(generator_name, "prodia");
      assert_eq!(prompt, "a red balloon");
      assert_eq!(parameters["steps"], 25);
    }
    AssetOrigin::User { .. } => panic!("generated origin came back user"),
  }
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_by_type_newest_first() {
  let s = store().await;

  let first = s.add(image_input("first", ScopeId::AppChat)).await.unwrap();
  let second = s.add(image_input("second", ScopeId::AppChat)).await.unwrap();
  let third = s.add(image_input("third", ScopeId::AppChat)).await.unwrap();

  let images = s.list_by_type(AssetType::Image).await.unwrap();
  let ids: Vec<_> = images.iter().map(|a| a.id).collect();
  assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn list_by_type_excludes_other_type() {
  let s = store().await;

  s.add(image_input("img", ScopeId::AppChat)).await.unwrap();
  s.add(audio_input("clip", ScopeId::AppChat)).await.unwrap();

  let images = s.list_by_type(AssetType::Image).await.unwrap();
  assert_eq!(images.len(), 1);
  assert!(images.iter().all(|a| a.asset_type == AssetType::Image));
}

#[tokio::test]
async fn create_then_list_by_scope() {
  let s = store().await;

  let added = s.add(image_input("cat.png", ScopeId::AppChat)).await.unwrap();

  let listed = s
    .list_by_scope_and_type(AssetType::Image, &ContextId::Global, &ScopeId::AppChat)
    .await
    .unwrap();

  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].id, added.id);
  assert_eq!(listed[0].label, "cat.png");
}

#[tokio::test]
async fn scope_listing_is_partition_isolated() {
  let s = store().await;

  s.add(image_input("chat", ScopeId::AppChat)).await.unwrap();
  s.add(image_input("draw", ScopeId::AppDraw)).await.unwrap();

  let draw = s
    .list_by_scope_and_type(AssetType::Image, &ContextId::Global, &ScopeId::AppDraw)
    .await
    .unwrap();

  assert_eq!(draw.len(), 1);
  assert_eq!(draw[0].label, "draw");
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_changes_only_provided_fields() {
  let s = store().await;
  let added = s.add(image_input("old-label", ScopeId::AppChat)).await.unwrap();

  let updated = s
    .update(added.id, AssetUpdate {
      label: Some("new-label".into()),
      ..Default::default()
    })
    .await
    .unwrap()
    .expect("asset present");

  assert_eq!(updated.label, "new-label");
  assert_eq!(updated.metadata, added.metadata);
  assert_eq!(updated.content, added.content);
  assert_eq!(updated.created_at, added.created_at);
  assert!(updated.updated_at > added.updated_at);
}

#[tokio::test]
async fn update_metadata_and_cache() {
  let s = store().await;
  let added = s.add(image_input("img", ScopeId::AppChat)).await.unwrap();

  let updated = s
    .update(added.id, AssetUpdate {
      metadata: Some(image_metadata(640, 480)),
      cache:    Some(serde_json::json!({ "thumb64": "AAAA" })),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.metadata, image_metadata(640, 480));
  assert_eq!(updated.cache["thumb64"], "AAAA");
  assert_eq!(updated.label, "img");
}

#[tokio::test]
async fn update_missing_returns_none() {
  let s = store().await;

  let result = s
    .update(Uuid::new_v4(), AssetUpdate {
      label: Some("nobody".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  assert!(result.is_none());
}

#[tokio::test]
async fn update_rejects_mismatched_metadata() {
  let s = store().await;
  let added = s.add(image_input("img", ScopeId::AppChat)).await.unwrap();

  let err = s
    .update(added.id, AssetUpdate {
      metadata: Some(AssetMetadata::Audio(AudioMetadata {
        duration:    1.0,
        sample_rate: 8000,
        bitrate:     None,
        channels:    None,
      })),
      ..Default::default()
    })
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    crate::Error::Core(stash_core::Error::MetadataMismatch(AssetType::Image))
  ));

  // The record is unchanged.
  let fetched = s.get(added.id).await.unwrap().unwrap();
  assert_eq!(fetched.metadata, added.metadata);
  assert_eq!(fetched.updated_at, added.updated_at);
}

// ─── Transfer ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn transfer_then_isolate() {
  let s = store().await;

  let d = s
    .add(image_input("draft", ScopeId::AttachmentDrafts))
    .await
    .unwrap();

  let moved = s
    .transfer_scope(d.id, &ContextId::Global, &ScopeId::AppChat)
    .await
    .unwrap();
  assert!(moved);

  let drafts = s
    .list_by_scope_and_type(
      AssetType::Image,
      &ContextId::Global,
      &ScopeId::AttachmentDrafts,
    )
    .await
    .unwrap();
  assert!(drafts.is_empty());

  let chat = s
    .list_by_scope_and_type(AssetType::Image, &ContextId::Global, &ScopeId::AppChat)
    .await
    .unwrap();
  assert_eq!(chat.len(), 1);
  assert_eq!(chat[0].id, d.id);
}

#[tokio::test]
async fn transfer_missing_returns_false() {
  let s = store().await;

  let moved = s
    .transfer_scope(Uuid::new_v4(), &ContextId::Global, &ScopeId::AppChat)
    .await
    .unwrap();
  assert!(!moved);
}

// ─── Deletion ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_twice_is_quiet() {
  let s = store().await;
  let added = s.add(image_input("gone", ScopeId::AppChat)).await.unwrap();

  assert!(s.delete(added.id).await.unwrap());
  assert!(!s.delete(added.id).await.unwrap());
  assert!(s.get(added.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_many_counts_only_existing() {
  let s = store().await;

  let a = s.add(image_input("a", ScopeId::AppChat)).await.unwrap();
  let b = s.add(image_input("b", ScopeId::AppChat)).await.unwrap();

  let count = s
    .delete_many(&[a.id, b.id, Uuid::new_v4()])
    .await
    .unwrap();
  assert_eq!(count, 2);
}

#[tokio::test]
async fn delete_many_empty_is_noop() {
  let s = store().await;
  assert_eq!(s.delete_many(&[]).await.unwrap(), 0);
}

#[tokio::test]
async fn delete_all_scoped_wipes_only_that_partition() {
  let s = store().await;

  s.add(image_input("d1", ScopeId::AttachmentDrafts)).await.unwrap();
  s.add(image_input("d2", ScopeId::AttachmentDrafts)).await.unwrap();
  let kept = s.add(image_input("chat", ScopeId::AppChat)).await.unwrap();

  let count = s
    .delete_all_scoped(&ContextId::Global, &ScopeId::AttachmentDrafts)
    .await
    .unwrap();
  assert_eq!(count, 2);

  assert!(s.get(kept.id).await.unwrap().is_some());
}

// ─── GC sweeps ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn sweep_keeps_only_listed_ids() {
  let s = store().await;

  let _a = s.add(image_input("a", ScopeId::AttachmentDrafts)).await.unwrap();
  let b = s.add(image_input("b", ScopeId::AttachmentDrafts)).await.unwrap();
  let _c = s.add(image_input("c", ScopeId::AttachmentDrafts)).await.unwrap();

  let outcome = gc::sweep_scope(
    &s,
    &ContextId::Global,
    &ScopeId::AttachmentDrafts,
    None,
    &[b.id],
  )
  .await
  .unwrap();
  assert_eq!(outcome.count, 2);

  let remaining = s
    .list_by_scope_and_type(
      AssetType::Image,
      &ContextId::Global,
      &ScopeId::AttachmentDrafts,
    )
    .await
    .unwrap();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].id, b.id);
}

#[tokio::test]
async fn sweep_with_empty_keep_list_clears_the_scope() {
  let s = store().await;

  s.add(image_input("a", ScopeId::AppDraw)).await.unwrap();
  s.add(image_input("b", ScopeId::AppDraw)).await.unwrap();
  let other = s.add(image_input("chat", ScopeId::AppChat)).await.unwrap();

  let outcome =
    gc::sweep_scope(&s, &ContextId::Global, &ScopeId::AppDraw, None, &[])
      .await
      .unwrap();
  assert_eq!(outcome.count, 2);

  // The neighbouring scope is untouched even by a keep-nothing sweep.
  assert!(s.get(other.id).await.unwrap().is_some());
}

#[tokio::test]
async fn sweep_is_type_filtered() {
  let s = store().await;

  let img = s.add(image_input("img", ScopeId::AppChat)).await.unwrap();
  let clip = s.add(audio_input("clip", ScopeId::AppChat)).await.unwrap();

  let outcome = gc::sweep_scope(
    &s,
    &ContextId::Global,
    &ScopeId::AppChat,
    Some(AssetType::Image),
    &[],
  )
  .await
  .unwrap();
  assert_eq!(outcome.count, 1);

  assert!(s.get(img.id).await.unwrap().is_none());
  assert!(s.get(clip.id).await.unwrap().is_some());
}

#[tokio::test]
async fn second_identical_sweep_deletes_nothing() {
  let s = store().await;

  s.add(image_input("a", ScopeId::AttachmentDrafts)).await.unwrap();
  let b = s.add(image_input("b", ScopeId::AttachmentDrafts)).await.unwrap();

  let first = gc::sweep_scope(
    &s,
    &ContextId::Global,
    &ScopeId::AttachmentDrafts,
    None,
    &[b.id],
  )
  .await
  .unwrap();
  assert_eq!(first.count, 1);

  let second = gc::sweep_scope(
    &s,
    &ContextId::Global,
    &ScopeId::AttachmentDrafts,
    None,
    &[b.id],
  )
  .await
  .unwrap();
  assert_eq!(second.count, 0);
}

#[tokio::test]
async fn sweep_keeping_everything_deletes_nothing() {
  let s = store().await;

  let a = s.add(image_input("a", ScopeId::AppChat)).await.unwrap();
  let b = s.add(image_input("b", ScopeId::AppChat)).await.unwrap();

  let outcome = gc::sweep_scope(
    &s,
    &ContextId::Global,
    &ScopeId::AppChat,
    None,
    &[a.id, b.id],
  )
  .await
  .unwrap();
  assert_eq!(outcome.count, 0);
}

#[tokio::test]
async fn sweep_in_open_set_scope() {
  let s = store().await;

  let scope = ScopeId::from("APP_CODE");
  let input = image_input("snippet", scope.clone());
  s.add(input).await.unwrap();

  let outcome = gc::sweep_scope(&s, &ContextId::Global, &scope, None, &[])
    .await
    .unwrap();
  assert_eq!(outcome.count, 1);
}
