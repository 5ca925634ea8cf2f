//! APK Screen Library
//!
//! Heuristic screening of Android packages. Extracts a few manifest fields
//! from an uploaded APK and flags it as likely fake when:
//! - the package name is outside the `com.` / `org.` / `in.` allow-list
//! - the APK is smaller than 2000 KB
//! - it declares READ_SMS, READ_CONTACTS or RECORD_AUDIO

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::{ApkAnalyzer, FakeDetector, FakeIndicator, ScanOutcome};
pub use models::{
    AppError, AppResult, ErrorCode, MetadataRecord, ScanReport, ServerConfig, Verdict,
    VerdictRecord,
};
pub use providers::{MetadataReader, ZipApkReader};
pub use utils::telemetry::{ScanStats, TelemetryCollector};
pub use utils::upload::{is_apk_filename, TransientUpload};
