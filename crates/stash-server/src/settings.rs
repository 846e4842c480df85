//! Server settings, deserialised from `config.toml` and `STASH_*`
//! environment variables.

use std::path::PathBuf;

use serde::Deserialize;

/// Which store backend to open at startup.
///
/// `memory` keeps assets for the lifetime of the process only — intended for
/// development and for flows where no durable engine is reachable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  #[default]
  Sqlite,
  Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host: String,

  #[serde(default = "default_port")]
  pub port: u16,

  #[serde(default)]
  pub backend: Backend,

  /// SQLite database file; ignored by the memory backend.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8077 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/stash/assets.db") }
