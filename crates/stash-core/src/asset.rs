//! Asset types — the durable unit of stored content.
//!
//! An asset couples an opaque base64 payload with provenance (`origin`),
//! type-specific metadata, and a two-level ownership partition
//! (`context_id`, `scope_id`). The payload is never transcoded or validated
//! here; this subsystem treats it as bytes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  partition::{ContextId, ScopeId},
};

// ─── Asset type ──────────────────────────────────────────────────────────────

/// What kind of content an asset holds. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetType {
  Image,
  Audio,
}

impl AssetType {
  /// The wire/database string for this type.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Image => "IMAGE",
      Self::Audio => "AUDIO",
    }
  }
}

impl std::fmt::Display for AssetType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Content ─────────────────────────────────────────────────────────────────

/// The encoded payload. Opaque to the store — no transcoding, no validation
/// of payload correctness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetContent {
  pub mime_type: String,
  pub base64:    String,
}

// ─── Origin ──────────────────────────────────────────────────────────────────

/// Provenance of an asset. Immutable after creation; discriminates for
/// audit/display, never for GC decisions.
///
/// The `ot` tag and mutually exclusive field sets are a frozen wire shape —
/// fields of the other variant are absent, never null-but-present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "ot", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum AssetOrigin {
  /// Content supplied by a person (upload, paste, drop, …).
  User {
    source:    String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media:     Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url:       Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
  },
  /// Content produced by a generative process.
  Generated {
    source:         String,
    generator_name: String,
    prompt:         String,
    /// Generator-specific settings; carried verbatim.
    parameters:     serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generated_at:   Option<DateTime<Utc>>,
  },
}

impl AssetOrigin {
  /// The `ot` discriminant string.
  pub fn ot(&self) -> &'static str {
    match self {
      Self::User { .. } => "user",
      Self::Generated { .. } => "generated",
    }
  }
}

// ─── Metadata ────────────────────────────────────────────────────────────────

/// Image-specific attributes. Mutable via update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageMetadata {
  pub width:  u32,
  pub height: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub average_color: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub author:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tags:          Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:   Option<String>,
}

/// Audio-specific attributes. Mutable via update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AudioMetadata {
  pub duration:    f64,
  pub sample_rate: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bitrate:  Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub channels: Option<u32>,
}

/// Type-specific metadata, discriminated on the wire by its required fields
/// rather than a tag (the legacy wire shape). Unknown fields are rejected at
/// deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetMetadata {
  Image(ImageMetadata),
  Audio(AudioMetadata),
}

impl AssetMetadata {
  /// Whether this metadata variant belongs to `asset_type`.
  pub fn matches(&self, asset_type: AssetType) -> bool {
    matches!(
      (self, asset_type),
      (Self::Image(_), AssetType::Image) | (Self::Audio(_), AssetType::Audio)
    )
  }
}

// ─── Asset ───────────────────────────────────────────────────────────────────

/// A persisted binary-content record.
///
/// Assets are intentionally ownerless at the storage layer: no foreign key
/// points at an owning record. Liveness is determined by caller-supplied
/// keep-lists at GC time (see [`crate::gc`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
  /// Assigned once at creation, never reused — a deleted id never resolves
  /// to a different asset later.
  pub id:         Uuid,
  pub asset_type: AssetType,
  pub label:      String,
  pub content:    AssetContent,
  pub origin:     AssetOrigin,
  pub metadata:   AssetMetadata,
  pub context_id: ContextId,
  pub scope_id:   ScopeId,
  /// Opaque derived-data slot (e.g. pre-resized thumbnails). Owned by the
  /// store; safe to be empty or stale.
  pub cache:      serde_json::Value,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

// ─── NewAsset ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::AssetStore::add`]. The id, timestamps, and cache
/// slot are always assigned by the store; they are not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewAsset {
  pub asset_type: AssetType,
  pub label:      String,
  pub content:    AssetContent,
  pub origin:     AssetOrigin,
  pub metadata:   AssetMetadata,
  pub context_id: ContextId,
  pub scope_id:   ScopeId,
}

impl NewAsset {
  /// Convenience constructor with the default partition
  /// (`GLOBAL` / `APP_CHAT`).
  pub fn new(
    asset_type: AssetType,
    label: impl Into<String>,
    content: AssetContent,
    origin: AssetOrigin,
    metadata: AssetMetadata,
  ) -> Self {
    Self {
      asset_type,
      label: label.into(),
      content,
      origin,
      metadata,
      context_id: ContextId::default(),
      scope_id: ScopeId::default(),
    }
  }

  pub fn with_scope(mut self, context_id: ContextId, scope_id: ScopeId) -> Self {
    self.context_id = context_id;
    self.scope_id = scope_id;
    self
  }

  /// Check that `metadata` belongs to `asset_type`. Backends call this
  /// before persisting; the service boundary calls it to fail fast.
  pub fn validate(&self) -> Result<()> {
    if !self.metadata.matches(self.asset_type) {
      return Err(Error::MetadataMismatch(self.asset_type));
    }
    Ok(())
  }
}

// ─── AssetUpdate ─────────────────────────────────────────────────────────────

/// Partial-update payload for [`crate::store::AssetStore::update`].
/// Only the mutable fields of an asset appear here; unknown fields are
/// rejected rather than silently persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssetUpdate {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metadata: Option<AssetMetadata>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cache:    Option<serde_json::Value>,
}

impl AssetUpdate {
  pub fn is_empty(&self) -> bool {
    self.label.is_none() && self.metadata.is_none() && self.cache.is_none()
  }
}
