//! APK Screen API Server
//!
//! Usage:
//!   cargo run --bin apk_screen_api
//!
//! Environment:
//!   PORT / APK_SCREEN_PORT   - Server port (default: 5000)
//!   APK_SCREEN_HOST          - Server host (default: 0.0.0.0)
//!   APK_SCREEN_UPLOAD_DIR    - Transient upload directory (default: uploads)
//!   APK_SCREEN_MAX_UPLOAD_MB - Request body limit (default: 100)
//!   RUST_LOG                 - Log level (default: info)

use apk_screen::api::{create_router, AppState};
use apk_screen::ServerConfig;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = ServerConfig::from_env()?;
    config.ensure_upload_dir()?;

    let addr = config.bind_addr()?;
    let state = Arc::new(AppState::with_default_reader(config));
    let telemetry = state.telemetry.clone();

    let app = create_router(state);

    info!("🚀 APK Screen API v{} starting on http://{}", env!("CARGO_PKG_VERSION"), addr);
    info!("");
    info!("Endpoints:");
    info!("  POST /scan    - Upload an APK (multipart field `file`)");
    info!("  GET  /stats   - Scan statistics");
    info!("  GET  /health  - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    let stats = telemetry.get_stats();
    info!("🛑 Shutdown complete");
    info!("   Total scanned:     {}", stats.total_scanned);
    info!("   Likely fake:       {}", stats.total_likely_fake);
    info!("   Failed:            {}", stats.total_failed);
    info!("   Rejected uploads:  {}", stats.total_rejected);

    Ok(())
}
