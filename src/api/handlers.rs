//! API Request Handlers

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Json, Multipart, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::types::*;
use crate::core::analyzer::ApkAnalyzer;
use crate::models::{AppError, AppResult, ErrorCode, ScanReport, ServerConfig};
use crate::providers::{MetadataReader, ZipApkReader};
use crate::utils::constants::UPLOAD_FIELD;
use crate::utils::telemetry::TelemetryCollector;
use crate::utils::upload::{is_apk_filename, TransientUpload};

/// Shared application state
pub struct AppState {
    pub config: ServerConfig,
    pub analyzer: ApkAnalyzer,
    pub telemetry: Arc<TelemetryCollector>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig, reader: Arc<dyn MetadataReader>) -> Self {
        Self {
            config,
            analyzer: ApkAnalyzer::new(reader),
            telemetry: Arc::new(TelemetryCollector::new()),
            start_time: Instant::now(),
        }
    }

    /// State backed by the zip/binary-XML reader
    pub fn with_default_reader(config: ServerConfig) -> Self {
        Self::new(config, Arc::new(ZipApkReader::new()))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}

// ============================================
// APK Scan
// ============================================

/// `POST /scan`: multipart field `file` holding an `.apk`
pub async fn scan_apk(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ScanReport>, AppError> {
    let upload = read_upload(multipart).await.map_err(|e| {
        state.telemetry.record_rejected();
        warn!(code = e.code_str(), "Upload rejected: {}", e.message);
        e
    })?;

    info!(
        filename = %upload.filename,
        size = upload.bytes.len(),
        "📦 APK received"
    );

    match run_scan(&state, upload.bytes).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e) => {
            state.telemetry.record_failure();
            warn!(
                code = e.code_str(),
                filename = %upload.filename,
                "❌ Scan failed: {}",
                e.message
            );
            Err(e)
        }
    }
}

/// Persist, scan and delete on the blocking pool, then record telemetry.
///
/// The transient file is created, scanned and removed inside a single
/// blocking task. If the request future is dropped, the task still runs to
/// completion and the guard still deletes the file.
async fn run_scan(state: &AppState, bytes: Bytes) -> AppResult<ScanReport> {
    let upload_dir = state.config.upload_dir.clone();
    let analyzer = state.analyzer.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        let upload = TransientUpload::persist(&upload_dir, &bytes)?;
        drop(bytes);
        let outcome = analyzer.scan_detailed(upload.path());
        drop(upload);
        outcome
    })
    .await
    .map_err(|e| AppError::internal(format!("Scan task failed: {}", e)))??;

    state.telemetry.record_scan(
        outcome.report.result.verdict,
        &outcome.indicators,
        outcome.latency_ms,
    );

    Ok(outcome.report)
}

struct UploadedFile {
    filename: String,
    bytes: Bytes,
}

/// Pull the `file` part out of the multipart body.
///
/// Other parts are skipped. Extension is checked before the body of the
/// part is read.
async fn read_upload(mut multipart: Multipart) -> AppResult<UploadedFile> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if !is_apk_filename(&filename) {
            return Err(AppError::invalid_extension());
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(UploadedFile { filename, bytes });
    }

    Err(AppError::upload_missing())
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::new(ErrorCode::UploadTooLarge, err.body_text())
    } else {
        AppError::bad_request(err.body_text())
    }
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();

    let data = StatsData {
        scans: state.telemetry.get_stats(),
        uptime_seconds: state.uptime_seconds(),
        api_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}
