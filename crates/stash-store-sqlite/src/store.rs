//! [`SqliteStore`] — the SQLite implementation of [`AssetStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use stash_core::{
  asset::{Asset, AssetType, AssetUpdate, NewAsset},
  partition::{ContextId, ScopeId},
  store::AssetStore,
};

use crate::{
  Error, Result,
  encode::{
    ASSET_COLUMNS, RawAsset, decode_asset_type, encode_asset_type, encode_dt,
    encode_origin, encode_uuid, read_raw,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An asset store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// funnel through one connection thread, so each operation is a single
/// uninterrupted round-trip from the caller's point of view.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch the stored `asset_type` discriminant for `id`, if the row exists.
  async fn stored_type(&self, id: Uuid) -> Result<Option<AssetType>> {
    let id_str = encode_uuid(id);

    let type_str: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT asset_type FROM assets WHERE asset_id = ?1",
              rusqlite::params![id_str],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    type_str.as_deref().map(decode_asset_type).transpose()
  }
}

// ─── AssetStore impl ─────────────────────────────────────────────────────────

impl AssetStore for SqliteStore {
  type Error = Error;

  // ── Single-record operations ──────────────────────────────────────────────

  async fn add(&self, input: NewAsset) -> Result<Asset> {
    input.validate().map_err(Error::Core)?;

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

    let id_str        = encode_uuid(asset.id);
    let type_str      = encode_asset_type(asset.asset_type).to_owned();
    let label         = asset.label.clone();
    let mime_type     = asset.content.mime_type.clone();
    let base64        = asset.content.base64.clone();
    let origin        = encode_origin(&asset.origin)?;
    let metadata_str  = serde_json::to_string(&asset.metadata)?;
    let cache_str     = serde_json::to_string(&asset.cache)?;
    let context_str   = asset.context_id.as_str().to_owned();
    let scope_str     = asset.scope_id.as_str().to_owned();
    let created_str   = encode_dt(asset.created_at);
    let updated_str   = encode_dt(asset.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO assets (
             asset_id, asset_type, label, mime_type, base64,
             origin_type, origin_source, origin_media, origin_url,
             origin_file_name, origin_generator_name, origin_prompt,
             origin_parameters, origin_generated_at,
             metadata, cache, context_id, scope_id, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                     ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
          rusqlite::params![
            id_str,
            type_str,
            label,
            mime_type,
            base64,
            origin.origin_type,
            origin.source,
            origin.media,
            origin.url,
            origin.file_name,
            origin.generator_name,
            origin.prompt,
            origin.parameters,
            origin.generated_at,
            metadata_str,
            cache_str,
            context_str,
            scope_str,
            created_str,
            updated_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(id = %asset.id, asset_type = %asset.asset_type, "added asset");
    Ok(asset)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Asset>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAsset> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ASSET_COLUMNS} FROM assets WHERE asset_id = ?1"),
              rusqlite::params![id_str],
              read_raw,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAsset::into_asset).transpose()
  }

  async fn update(&self, id: Uuid, changes: AssetUpdate) -> Result<Option<Asset>> {
    // Check the stored type first so a metadata payload is validated
    // against it before anything is written.
    let Some(asset_type) = self.stored_type(id).await? else {
      return Ok(None);
    };

    if let Some(metadata) = &changes.metadata
      && !metadata.matches(asset_type)
    {
      return Err(Error::Core(stash_core::Error::MetadataMismatch(asset_type)));
    }

    let id_str       = encode_uuid(id);
    let label        = changes.label;
    let metadata_str = changes
      .metadata
      .as_ref()
      .map(serde_json::to_string)
      .transpose()?;
    let cache_str    = changes
      .cache
      .as_ref()
      .map(serde_json::to_string)
      .transpose()?;
    let updated_str  = encode_dt(Utc::now());

    let raw: Option<RawAsset> = self
      .conn
      .call(move |conn| {
        // NULL params leave the column as-is via COALESCE, so the whole
        // partial update is one statement.
        let n = conn.execute(
          "UPDATE assets SET
             label      = COALESCE(?2, label),
             metadata   = COALESCE(?3, metadata),
             cache      = COALESCE(?4, cache),
             updated_at = ?5
           WHERE asset_id = ?1",
          rusqlite::params![id_str, label, metadata_str, cache_str, updated_str],
        )?;

        if n == 0 {
          return Ok(None);
        }

        Ok(
          conn
            .query_row(
              &format!("SELECT {ASSET_COLUMNS} FROM assets WHERE asset_id = ?1"),
              rusqlite::params![id_str],
              read_raw,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAsset::into_asset).transpose()
  }

  async fn transfer_scope(
    &self,
    id: Uuid,
    context_id: &ContextId,
    scope_id: &ScopeId,
  ) -> Result<bool> {
    let id_str      = encode_uuid(id);
    let context_str = context_id.as_str().to_owned();
    let scope_str   = scope_id.as_str().to_owned();
    let updated_str = encode_dt(Utc::now());

    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE assets SET context_id = ?2, scope_id = ?3, updated_at = ?4
           WHERE asset_id = ?1",
          rusqlite::params![id_str, context_str, scope_str, updated_str],
        )?)
      })
      .await?;

    Ok(n > 0)
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM assets WHERE asset_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(n > 0)
  }

  // ── Listing ────────────────────────────────────────────────────────────────

  async fn list_by_type(&self, asset_type: AssetType) -> Result<Vec<Asset>> {
    let type_str = encode_asset_type(asset_type).to_owned();

    let raws: Vec<RawAsset> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ASSET_COLUMNS} FROM assets
           WHERE asset_type = ?1
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![type_str], read_raw)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAsset::into_asset).collect()
  }

  async fn list_by_scope_and_type(
    &self,
    asset_type: AssetType,
    context_id: &ContextId,
    scope_id: &ScopeId,
  ) -> Result<Vec<Asset>> {
    let type_str    = encode_asset_type(asset_type).to_owned();
    let context_str = context_id.as_str().to_owned();
    let scope_str   = scope_id.as_str().to_owned();

    let raws: Vec<RawAsset> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ASSET_COLUMNS} FROM assets
           WHERE asset_type = ?1 AND context_id = ?2 AND scope_id = ?3
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![type_str, context_str, scope_str], read_raw)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAsset::into_asset).collect()
  }

  async fn list_scope_ids(
    &self,
    context_id: &ContextId,
    scope_id: &ScopeId,
    asset_type: Option<AssetType>,
  ) -> Result<Vec<Uuid>> {
    let context_str = context_id.as_str().to_owned();
    let scope_str   = scope_id.as_str().to_owned();
    let type_str    = asset_type.map(encode_asset_type).map(str::to_owned);

    let id_strs: Vec<String> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(t) = type_str {
          let mut stmt = conn.prepare(
            "SELECT asset_id FROM assets
             WHERE context_id = ?1 AND scope_id = ?2 AND asset_type = ?3",
          )?;
          stmt
            .query_map(rusqlite::params![context_str, scope_str, t], |row| {
              row.get(0)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT asset_id FROM assets
             WHERE context_id = ?1 AND scope_id = ?2",
          )?;
          stmt
            .query_map(rusqlite::params![context_str, scope_str], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    id_strs
      .iter()
      .map(|s| crate::encode::decode_uuid(s))
      .collect()
  }

  // ── Bulk deletion ──────────────────────────────────────────────────────────

  async fn delete_many(&self, ids: &[Uuid]) -> Result<u64> {
    if ids.is_empty() {
      return Ok(0);
    }

    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();

    let n = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; id_strs.len()].join(", ");
        let sql = format!("DELETE FROM assets WHERE asset_id IN ({placeholders})");
        Ok(conn.execute(&sql, rusqlite::params_from_iter(id_strs.iter()))?)
      })
      .await?;

    tracing::debug!(requested = ids.len(), deleted = n, "bulk-deleted assets");
    Ok(n as u64)
  }

  async fn delete_all_scoped(
    &self,
    context_id: &ContextId,
    scope_id: &ScopeId,
  ) -> Result<u64> {
    let context_str = context_id.as_str().to_owned();
    let scope_str   = scope_id.as_str().to_owned();

    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM assets WHERE context_id = ?1 AND scope_id = ?2",
          rusqlite::params![context_str, scope_str],
        )?)
      })
      .await?;

    Ok(n as u64)
  }
}
