//! Scan pipeline: read metadata, then evaluate it.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::detector::{FakeDetector, FakeIndicator};
use crate::models::{AppResult, ScanReport, VerdictRecord};
use crate::providers::{MetadataReader, ZipApkReader};

/// Outcome of [`ApkAnalyzer::scan_detailed`]
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub report: ScanReport,
    pub indicators: Vec<FakeIndicator>,
    pub latency_ms: u64,
}

/// Reads an APK through a [`MetadataReader`] and runs the detector on it
#[derive(Clone)]
pub struct ApkAnalyzer {
    reader: Arc<dyn MetadataReader>,
    detector: FakeDetector,
}

impl ApkAnalyzer {
    pub fn new(reader: Arc<dyn MetadataReader>) -> Self {
        Self {
            reader,
            detector: FakeDetector::new(),
        }
    }

    /// Scan a file on disk. Reader failures propagate unchanged.
    pub fn scan(&self, path: &Path) -> AppResult<ScanReport> {
        self.scan_detailed(path).map(|outcome| outcome.report)
    }

    /// Scan and also return the typed indicators and timing
    pub fn scan_detailed(&self, path: &Path) -> AppResult<ScanOutcome> {
        let start = Instant::now();

        let features = self.reader.read_metadata(path)?;
        debug!(
            package = %features.package_name,
            permissions = features.permissions.len(),
            size_kb = features.file_size_kb,
            "Metadata extracted"
        );

        let indicators = self.detector.indicators(&features);
        let result =
            VerdictRecord::from_reasons(indicators.iter().map(FakeIndicator::description).collect());
        let latency_ms = start.elapsed().as_millis() as u64;

        info!(
            package = %features.package_name,
            verdict = result.verdict.as_str(),
            reasons = result.reasons.len(),
            latency_ms,
            "Scan completed"
        );

        Ok(ScanOutcome {
            report: ScanReport { features, result },
            indicators,
            latency_ms,
        })
    }
}

impl Default for ApkAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(ZipApkReader::new()))
    }
}
