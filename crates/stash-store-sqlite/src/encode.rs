//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. `metadata`, `cache`, and
//! generated-origin `parameters` are stored as compact JSON. UUIDs are
//! stored as hyphenated lowercase strings. The origin union is flattened
//! into per-variant columns, discriminated by `origin_type`.

use chrono::{DateTime, Utc};
use stash_core::{
  asset::{Asset, AssetContent, AssetMetadata, AssetOrigin, AssetType},
  partition::{ContextId, ScopeId},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── AssetType ───────────────────────────────────────────────────────────────

pub fn encode_asset_type(t: AssetType) -> &'static str { t.as_str() }

pub fn decode_asset_type(s: &str) -> Result<AssetType> {
  match s {
    "IMAGE" => Ok(AssetType::Image),
    "AUDIO" => Ok(AssetType::Audio),
    other => Err(Error::Decode(format!("unknown asset type: {other:?}"))),
  }
}

// ─── Origin columns ──────────────────────────────────────────────────────────

/// The origin union split into its column representation for INSERT.
/// Only one variant's columns are populated; the rest stay NULL.
pub struct OriginColumns {
  pub origin_type:    &'static str,
  pub source:         String,
  pub media:          Option<String>,
  pub url:            Option<String>,
  pub file_name:      Option<String>,
  pub generator_name: Option<String>,
  pub prompt:         Option<String>,
  pub parameters:     Option<String>,
  pub generated_at:   Option<String>,
}

pub fn encode_origin(origin: &AssetOrigin) -> Result<OriginColumns> {
  Ok(match origin {
    AssetOrigin::User { source, media, url, file_name } => OriginColumns {
      origin_type:    "user",
      source:         source.clone(),
      media:          media.clone(),
      url:            url.clone(),
      file_name:      file_name.clone(),
      generator_name: None,
      prompt:         None,
      parameters:     None,
      generated_at:   None,
    },
    AssetOrigin::Generated {
      source,
      generator_name,
      prompt,
      parameters,
      generated_at,
    } => OriginColumns {
      origin_type:    "generated",
      source:         source.clone(),
      media:          None,
      url:            None,
      file_name:      None,
      generator_name: Some(generator_name.clone()),
      prompt:         Some(prompt.clone()),
      parameters:     Some(serde_json::to_string(parameters)?),
      generated_at:   generated_at.map(encode_dt),
    },
  })
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Column list shared by every full-row SELECT, in [`RawAsset`] field order.
pub const ASSET_COLUMNS: &str = "asset_id, asset_type, label, mime_type, \
   base64, origin_type, origin_source, origin_media, origin_url, \
   origin_file_name, origin_generator_name, origin_prompt, \
   origin_parameters, origin_generated_at, metadata, cache, context_id, \
   scope_id, created_at, updated_at";

/// Raw strings read directly from an `assets` row.
pub struct RawAsset {
  pub asset_id:              String,
  pub asset_type:            String,
  pub label:                 String,
  pub mime_type:             String,
  pub base64:                String,
  pub origin_type:           String,
  pub origin_source:         String,
  pub origin_media:          Option<String>,
  pub origin_url:            Option<String>,
  pub origin_file_name:      Option<String>,
  pub origin_generator_name: Option<String>,
  pub origin_prompt:         Option<String>,
  pub origin_parameters:     Option<String>,
  pub origin_generated_at:   Option<String>,
  pub metadata:              String,
  pub cache:                 String,
  pub context_id:            String,
  pub scope_id:              String,
  pub created_at:            String,
  pub updated_at:            String,
}

/// Row mapper matching [`ASSET_COLUMNS`].
pub fn read_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAsset> {
  Ok(RawAsset {
    asset_id:              row.get(0)?,
    asset_type:            row.get(1)?,
    label:                 row.get(2)?,
    mime_type:             row.get(3)?,
    base64:                row.get(4)?,
    origin_type:           row.get(5)?,
    origin_source:         row.get(6)?,
    origin_media:          row.get(7)?,
    origin_url:            row.get(8)?,
    origin_file_name:      row.get(9)?,
    origin_generator_name: row.get(10)?,
    origin_prompt:         row.get(11)?,
    origin_parameters:     row.get(12)?,
    origin_generated_at:   row.get(13)?,
    metadata:              row.get(14)?,
    cache:                 row.get(15)?,
    context_id:            row.get(16)?,
    scope_id:              row.get(17)?,
    created_at:            row.get(18)?,
    updated_at:            row.get(19)?,
  })
}

impl RawAsset {
  pub fn into_asset(self) -> Result<Asset> {
    let asset_type = decode_asset_type(&self.asset_type)?;

    let origin = match self.origin_type.as_str() {
      "user" => AssetOrigin::User {
        source:    self.origin_source,
        media:     self.origin_media,
        url:       self.origin_url,
        file_name: self.origin_file_name,
      },
      "generated" => AssetOrigin::Generated {
        source:         self.origin_source,
        generator_name: self.origin_generator_name.ok_or_else(|| {
          Error::Decode("generated origin missing generator_name".into())
        })?,
        prompt:         self.origin_prompt.ok_or_else(|| {
          Error::Decode("generated origin missing prompt".into())
        })?,
        parameters:     match self.origin_parameters {
          Some(ref s) => serde_json::from_str(s)?,
          None => serde_json::Value::Object(Default::default()),
        },
        generated_at:   self
          .origin_generated_at
          .as_deref()
          .map(decode_dt)
          .transpose()?,
      },
      other => {
        return Err(Error::Decode(format!("unknown origin type: {other:?}")));
      }
    };

    // Metadata shape is discriminated by the asset_type column, not by the
    // JSON itself.
    let metadata = match asset_type {
      AssetType::Image => AssetMetadata::Image(serde_json::from_str(&self.metadata)?),
      AssetType::Audio => AssetMetadata::Audio(serde_json::from_str(&self.metadata)?),
    };

    Ok(Asset {
      id: decode_uuid(&self.asset_id)?,
      asset_type,
      label: self.label,
      content: AssetContent {
        mime_type: self.mime_type,
        base64:    self.base64,
      },
      origin,
      metadata,
      context_id: ContextId::from(self.context_id.as_str()),
      scope_id: ScopeId::from(self.scope_id.as_str()),
      cache: serde_json::from_str(&self.cache)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
