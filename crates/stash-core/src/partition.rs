//! The two-level ownership partition: context and scope.
//!
//! `(ContextId, ScopeId)` together define the reachability partition — GC
//! sweeps and bulk scope deletes never cross it. Both are open sets: the
//! named variants cover today's callers, and `Other` carries any value a
//! future context or app introduces without a schema change.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ─── ContextId ───────────────────────────────────────────────────────────────

/// Top-level ownership partition. Currently a single fixed value in
/// practice, but open so new contexts can be added without migration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextId {
  Global,
  Other(String),
}

impl ContextId {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Global => "GLOBAL",
      Self::Other(s) => s,
    }
  }
}

impl Default for ContextId {
  fn default() -> Self { Self::Global }
}

impl From<&str> for ContextId {
  fn from(s: &str) -> Self {
    match s {
      "GLOBAL" => Self::Global,
      other => Self::Other(other.to_owned()),
    }
  }
}

impl std::fmt::Display for ContextId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for ContextId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for ContextId {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    Ok(Self::from(s.as_str()))
  }
}

// ─── ScopeId ─────────────────────────────────────────────────────────────────

/// Sub-partition within a context, distinguishing which app or pipeline
/// owns a group of assets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeId {
  AppChat,
  AppDraw,
  AttachmentDrafts,
  Other(String),
}

impl ScopeId {
  pub fn as_str(&self) -> &str {
    match self {
      Self::AppChat => "APP_CHAT",
      Self::AppDraw => "APP_DRAW",
      Self::AttachmentDrafts => "ATTACHMENT_DRAFTS",
      Self::Other(s) => s,
    }
  }
}

impl Default for ScopeId {
  fn default() -> Self { Self::AppChat }
}

impl From<&str> for ScopeId {
  fn from(s: &str) -> Self {
    match s {
      "APP_CHAT" => Self::AppChat,
      "APP_DRAW" => Self::AppDraw,
      "ATTACHMENT_DRAFTS" => Self::AttachmentDrafts,
      other => Self::Other(other.to_owned()),
    }
  }
}

impl std::fmt::Display for ScopeId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for ScopeId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for ScopeId {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    Ok(Self::from(s.as_str()))
  }
}
