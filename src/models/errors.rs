//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so scan failures can be told
//! apart in logs even though the HTTP surface collapses them into 400/500.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - UPLOAD_xxx: upload validation errors
//! - APK_xxx: archive / manifest extraction errors
//! - API_xxx: API errors
//! - CFG_xxx: Configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message, returned to API clients verbatim
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Upload Errors
    // ============================================
    /// No `file` part in the multipart body
    UploadMissing,
    /// Client filename does not end in `.apk`
    UploadInvalidExtension,
    /// Request body exceeds the configured limit
    UploadTooLarge,

    // ============================================
    // APK Extraction Errors
    // ============================================
    /// File is not a readable zip container
    ApkInvalidArchive,
    /// Archive has no AndroidManifest.xml entry
    ApkManifestMissing,
    /// Manifest entry could not be decoded as binary XML
    ApkManifestInvalid,
    /// A required manifest field is absent
    ApkFieldMissing,

    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Generic Errors
    // ============================================
    /// Filesystem failure
    Io,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UploadMissing => "UPLOAD_MISSING",
            Self::UploadInvalidExtension => "UPLOAD_INVALID_EXTENSION",
            Self::UploadTooLarge => "UPLOAD_TOO_LARGE",

            Self::ApkInvalidArchive => "APK_INVALID_ARCHIVE",
            Self::ApkManifestMissing => "APK_MANIFEST_MISSING",
            Self::ApkManifestInvalid => "APK_MANIFEST_INVALID",
            Self::ApkFieldMissing => "APK_FIELD_MISSING",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            Self::Io => "IO_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UploadMissing | Self::UploadInvalidExtension | Self::ApiBadRequest => 400,
            Self::UploadTooLarge => 413,
            _ => 500,
        }
    }

    /// True for failures raised while extracting metadata from the APK
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::ApkInvalidArchive
                | Self::ApkManifestMissing
                | Self::ApkManifestInvalid
                | Self::ApkFieldMissing
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// No file part in the upload
    pub fn upload_missing() -> Self {
        Self::new(ErrorCode::UploadMissing, "No file uploaded")
    }

    /// Upload does not carry an `.apk` filename
    pub fn invalid_extension() -> Self {
        Self::new(ErrorCode::UploadInvalidExtension, "Please upload a .apk file")
    }

    /// Archive lacks AndroidManifest.xml
    pub fn manifest_missing() -> Self {
        Self::new(
            ErrorCode::ApkManifestMissing,
            "AndroidManifest.xml not found in archive",
        )
    }

    /// Required manifest field is absent
    pub fn field_missing(field: &str) -> Self {
        Self::new(
            ErrorCode::ApkFieldMissing,
            format!("Manifest is missing required field: {}", field),
        )
    }

    /// Invalid configuration value
    pub fn invalid_config(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", key, value),
        )
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Io, err.to_string(), err)
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::FileNotFound => Self::manifest_missing(),
            zip::result::ZipError::Io(io) => io.into(),
            other => Self::with_source(ErrorCode::ApkInvalidArchive, other.to_string(), other),
        }
    }
}
