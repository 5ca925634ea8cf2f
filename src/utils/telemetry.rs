//! Telemetry Module
//!
//! In-memory scan counters since process start, exposed by `GET /stats`.
//! Nothing is written to disk and no per-scan record is kept: only
//! aggregate numbers, never filenames or package names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::core::detector::FakeIndicator;
use crate::models::Verdict;

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanStats {
    /// Scans that produced a verdict
    pub total_scanned: u64,
    pub total_safe: u64,
    pub total_likely_fake: u64,
    /// Scans that failed while parsing or evaluating
    pub total_failed: u64,
    /// Uploads rejected before scanning (missing file, wrong extension)
    pub total_rejected: u64,
    /// Indicator hits by kind
    pub indicators_by_kind: BTreeMap<String, u64>,
    /// Average scan latency over successful scans (ms)
    pub avg_latency_ms: f64,
    /// Collector start time (RFC 3339)
    pub since: String,
}

/// Lock-free counters plus a small per-kind map
pub struct TelemetryCollector {
    total_scanned: AtomicU64,
    total_safe: AtomicU64,
    total_likely_fake: AtomicU64,
    total_failed: AtomicU64,
    total_rejected: AtomicU64,
    total_latency_ms: AtomicU64,
    indicator_counts: RwLock<BTreeMap<&'static str, u64>>,
    started_at: DateTime<Utc>,
}

impl TelemetryCollector {
    pub fn new() -> Self {
        Self {
            total_scanned: AtomicU64::new(0),
            total_safe: AtomicU64::new(0),
            total_likely_fake: AtomicU64::new(0),
            total_failed: AtomicU64::new(0),
            total_rejected: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            indicator_counts: RwLock::new(BTreeMap::new()),
            started_at: Utc::now(),
        }
    }

    /// Record a completed scan
    pub fn record_scan(&self, verdict: Verdict, indicators: &[FakeIndicator], latency_ms: u64) {
        self.total_scanned.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);

        match verdict {
            Verdict::Safe => self.total_safe.fetch_add(1, Ordering::Relaxed),
            Verdict::LikelyFake => self.total_likely_fake.fetch_add(1, Ordering::Relaxed),
        };

        if indicators.is_empty() {
            return;
        }
        if let Ok(mut counts) = self.indicator_counts.write() {
            for indicator in indicators {
                *counts.entry(indicator.kind()).or_insert(0) += 1;
            }
        }
    }

    /// Record a scan that ended in an error
    pub fn record_failure(&self) {
        self.total_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an upload rejected by validation
    pub fn record_rejected(&self) {
        self.total_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics
    pub fn get_stats(&self) -> ScanStats {
        let total_scanned = self.total_scanned.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);

        let avg_latency_ms = if total_scanned > 0 {
            total_latency as f64 / total_scanned as f64
        } else {
            0.0
        };

        let indicators_by_kind = self
            .indicator_counts
            .read()
            .map(|counts| counts.iter().map(|(k, v)| (k.to_string(), *v)).collect())
            .unwrap_or_default();

        ScanStats {
            total_scanned,
            total_safe: self.total_safe.load(Ordering::Relaxed),
            total_likely_fake: self.total_likely_fake.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
            total_rejected: self.total_rejected.load(Ordering::Relaxed),
            indicators_by_kind,
            avg_latency_ms,
            since: self.started_at.to_rfc3339(),
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}
