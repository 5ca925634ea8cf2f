//! Transient upload storage
//!
//! Uploaded bytes are written under a generated name and removed when the
//! owning [`TransientUpload`] is dropped, whatever path the request takes.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use super::constants::APK_EXTENSION;
use crate::models::AppResult;

/// True when the final component of `filename` ends in `.apk` (any case)
/// and has a non-empty stem.
pub fn is_apk_filename(filename: &str) -> bool {
    // Client names may carry either separator
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match base.rsplit_once('.') {
        Some((stem, ext)) => !stem.is_empty() && ext.eq_ignore_ascii_case(APK_EXTENSION),
        None => false,
    }
}

/// Owns a file in the upload directory; deleting it on drop.
#[derive(Debug)]
pub struct TransientUpload {
    path: PathBuf,
}

impl TransientUpload {
    /// Reserve a unique path inside `dir`. Nothing is written yet.
    pub fn reserve(dir: &Path) -> Self {
        let name = format!("{}.{}", Uuid::new_v4(), APK_EXTENSION);
        Self {
            path: dir.join(name),
        }
    }

    /// Reserve a path and write `bytes` to it.
    ///
    /// Blocking. The guard exists before the write starts, so a partial file
    /// left by a failed write is still removed. Callers on an async runtime
    /// run this together with the scan and the drop in one blocking task, so
    /// no file can outlive a cancelled request.
    pub fn persist(dir: &Path, bytes: &[u8]) -> AppResult<Self> {
        let upload = Self::reserve(dir);
        std::fs::write(&upload.path, bytes)?;
        debug!(path = %upload.path.display(), size = bytes.len(), "Upload stored");
        Ok(upload)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TransientUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Upload removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove upload"),
        }
    }
}
