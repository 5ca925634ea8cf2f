//! Providers Module - External Parsing Backends
//!
//! The verdict engine only ever sees a [`MetadataRecord`]; how it is pulled
//! out of an APK is behind [`MetadataReader`], so the parsing backend can be
//! swapped without touching the rules.

pub mod apk;

use std::path::Path;

use crate::models::{AppResult, MetadataRecord};

pub use apk::ZipApkReader;

/// Extracts a [`MetadataRecord`] from an APK on disk.
///
/// Implementations do not validate the file before delegating to their
/// parser, and must not fall back to partial metadata: any parser failure is
/// returned as-is.
pub trait MetadataReader: Send + Sync {
    fn read_metadata(&self, path: &Path) -> AppResult<MetadataRecord>;
}
