//! The `AssetStore` trait.
//!
//! The trait is implemented by storage backends (`stash-store-sqlite` for
//! durable storage, `stash-store-memory` for the ephemeral fallback, and
//! the remote client in `stash-portability`). Higher layers — the API
//! router and the GC engine — depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  asset::{Asset, AssetType, AssetUpdate, NewAsset},
  partition::{ContextId, ScopeId},
};

/// Abstraction over an asset store backend.
///
/// Absence is not an error at this layer: point lookups return `Option`,
/// deletes report whether anything was removed, and bulk deletes report a
/// count. The service boundary decides which of those become `NotFound`.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait AssetStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Single-record operations ──────────────────────────────────────────

  /// Validate and persist a new asset. The store assigns the id, the
  /// timestamps, and an empty cache slot; only the columns of the supplied
  /// origin variant are populated.
  ///
  /// This is the only way an id enters the system.
  fn add(
    &self,
    input: NewAsset,
  ) -> impl Future<Output = Result<Asset, Self::Error>> + Send + '_;

  /// Point lookup. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Asset>, Self::Error>> + Send + '_;

  /// Partial update of the mutable fields; `updated_at` is refreshed.
  /// Returns `None` if the asset does not exist. A supplied metadata
  /// payload must still match the stored asset's type.
  fn update(
    &self,
    id: Uuid,
    changes: AssetUpdate,
  ) -> impl Future<Output = Result<Option<Asset>, Self::Error>> + Send + '_;

  /// Atomically move an asset to another `(context, scope)` partition.
  /// No content change. Returns `false` if the asset does not exist.
  fn transfer_scope<'a>(
    &'a self,
    id: Uuid,
    context_id: &'a ContextId,
    scope_id: &'a ScopeId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Delete one asset. Returns `false` if it was already gone — callers
  /// treat that as success.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Listing ───────────────────────────────────────────────────────────

  /// All assets of a type, most recently created first. The ordering is a
  /// contract consumers depend on (e.g. "show latest generated image").
  fn list_by_type(
    &self,
    asset_type: AssetType,
  ) -> impl Future<Output = Result<Vec<Asset>, Self::Error>> + Send + '_;

  /// Assets of a type within one partition, most recently created first.
  fn list_by_scope_and_type<'a>(
    &'a self,
    asset_type: AssetType,
    context_id: &'a ContextId,
    scope_id: &'a ScopeId,
  ) -> impl Future<Output = Result<Vec<Asset>, Self::Error>> + Send + 'a;

  /// Ids of every asset in a partition, optionally filtered by type.
  /// The GC engine's candidate enumeration; id-only so sweeps never haul
  /// payloads out of the store.
  fn list_scope_ids<'a>(
    &'a self,
    context_id: &'a ContextId,
    scope_id: &'a ScopeId,
    asset_type: Option<AssetType>,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + 'a;

  // ── Bulk deletion ─────────────────────────────────────────────────────

  /// Delete many assets in one backend call. Returns the number actually
  /// removed, which may be less than `ids.len()` if some were already
  /// gone — reported, not an error.
  fn delete_many<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Delete every asset in a partition. Returns the number removed.
  fn delete_all_scoped<'a>(
    &'a self,
    context_id: &'a ContextId,
    scope_id: &'a ScopeId,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;
}
