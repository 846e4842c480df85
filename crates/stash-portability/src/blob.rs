//! [`BlobUrl`] — a temporary, locally addressable handle to decoded content.
//!
//! The browser's object URLs are revocable handles to in-memory blobs. The
//! server-side analogue here is a uniquely named file in the OS temp
//! directory, removed when the handle drops.

use std::{
  fs,
  io::Write as _,
  path::{Path, PathBuf},
};

use bytes::Bytes;
use uuid::Uuid;

/// A decoded payload written to a temp file for direct rendering.
/// The file is deleted on drop.
#[derive(Debug)]
pub struct BlobUrl {
  path:      PathBuf,
  mime_type: String,
  data:      Bytes,
}

impl BlobUrl {
  pub(crate) fn create(data: Bytes, mime_type: &str) -> std::io::Result<Self> {
    let path = std::env::temp_dir().join(format!("stash-blob-{}", Uuid::new_v4()));
    let mut file = fs::File::create(&path)?;
    file.write_all(&data)?;

    Ok(Self {
      path,
      mime_type: mime_type.to_owned(),
      data,
    })
  }

  /// `file://` URL for the temp file.
  pub fn url(&self) -> String {
    format!("file://{}", self.path.display())
  }

  pub fn path(&self) -> &Path { &self.path }

  pub fn mime_type(&self) -> &str { &self.mime_type }

  /// The decoded payload, for callers that render from memory instead of
  /// from the file.
  pub fn bytes(&self) -> &Bytes { &self.data }
}

impl Drop for BlobUrl {
  fn drop(&mut self) {
    let _ = fs::remove_file(&self.path);
  }
}
