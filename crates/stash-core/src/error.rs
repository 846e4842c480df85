//! Error types for `stash-core`.

use thiserror::Error;

use crate::asset::AssetType;

#[derive(Debug, Error)]
pub enum Error {
  /// The metadata payload does not belong to the asset's type — e.g. audio
  /// metadata supplied for an `IMAGE` asset.
  #[error("metadata does not match asset type {0}")]
  MetadataMismatch(AssetType),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
