//! Server configuration
//!
//! Read once from the environment at startup and handed to the router state.
//! Defaults live in `utils/constants.rs`.

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::info;

use super::errors::{AppError, AppResult};
use crate::utils::constants::{DEFAULT_HOST, DEFAULT_MAX_UPLOAD_MB, DEFAULT_PORT, DEFAULT_UPLOAD_DIR};

/// Configuration for the upload API
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Directory holding transient uploads
    pub upload_dir: PathBuf,
    /// Request body limit in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load from environment variables, falling back to defaults.
    ///
    /// `PORT` wins over `APK_SCREEN_PORT` so PaaS hosts can inject it.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] over an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("APK_SCREEN_HOST").unwrap_or(defaults.host);

        let port = match lookup("PORT").or_else(|| lookup("APK_SCREEN_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::invalid_config("PORT", &raw))?,
            None => defaults.port,
        };

        let upload_dir = lookup("APK_SCREEN_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);

        let max_upload_bytes = match lookup("APK_SCREEN_MAX_UPLOAD_MB") {
            Some(raw) => {
                raw.trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|mb| *mb > 0)
                    .and_then(|mb| mb.checked_mul(1024 * 1024))
                    .ok_or_else(|| AppError::invalid_config("APK_SCREEN_MAX_UPLOAD_MB", &raw))?
            }
            None => defaults.max_upload_bytes,
        };

        Ok(Self {
            host,
            port,
            upload_dir,
            max_upload_bytes,
        })
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> AppResult<SocketAddr> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| AppError::invalid_config("APK_SCREEN_HOST", &self.host))
    }

    /// Create the upload directory if it does not exist yet
    pub fn ensure_upload_dir(&self) -> AppResult<()> {
        std::fs::create_dir_all(&self.upload_dir)?;
        info!("📂 Upload directory: {}", self.upload_dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.max_upload_bytes, 100 * 1024 * 1024);
        assert_eq!(config.bind_addr().unwrap().port(), 5000);
    }

    #[test]
    fn test_port_precedence() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("APK_SCREEN_PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);

        let config =
            ServerConfig::from_lookup(lookup_from(&[("APK_SCREEN_PORT", "9000")])).unwrap();
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);

        let err = ServerConfig::from_lookup(lookup_from(&[("APK_SCREEN_MAX_UPLOAD_MB", "0")]))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);

        let huge = usize::MAX.to_string();
        let lookup = lookup_from(&[("APK_SCREEN_MAX_UPLOAD_MB", huge.as_str())]);
        let err = ServerConfig::from_lookup(lookup).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
        assert!(err.message.contains(&huge));
    }

    #[test]
    fn test_ensure_upload_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            upload_dir: tmp.path().join("a").join("b"),
            ..ServerConfig::default()
        };
        config.ensure_upload_dir().unwrap();
        assert!(config.upload_dir.is_dir());
    }
}
