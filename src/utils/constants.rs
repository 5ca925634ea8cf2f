//! Constants Module - Single Source of Truth
//!
//! Every heuristic threshold, label and default used by the service is
//! defined here. The heuristics are intentionally literal: the prefix
//! allow-list, the size threshold and the permission set produce false
//! positives (any legitimate `net.` / `io.` package, any small utility app)
//! and are kept as-is rather than tuned.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "APK Screen";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// HEURISTIC RULES
// ============================================

/// Package-name prefixes that pass the shape check
pub const TRUSTED_PACKAGE_PREFIXES: [&str; 3] = ["com.", "org.", "in."];

/// APKs strictly below this size (KiB) are flagged
pub const MIN_APK_SIZE_KB: f64 = 2000.0;

/// Permissions flagged when declared, in reporting order
pub const DANGEROUS_PERMISSIONS: [&str; 3] = ["READ_SMS", "READ_CONTACTS", "RECORD_AUDIO"];

/// Namespace Android prepends to framework permission names
pub const ANDROID_PERMISSION_NAMESPACE: &str = "android.permission.";

// ============================================
// REASONS & LABELS
// ============================================

pub const REASON_UNUSUAL_PACKAGE: &str = "Unusual package name";
pub const REASON_SMALL_APK: &str = "APK size unusually small";
pub const REASON_SUSPICIOUS_PERMISSION_PREFIX: &str = "Suspicious Permission: ";

pub const VERDICT_SAFE_LABEL: &str = "SAFE ✅";
pub const VERDICT_LIKELY_FAKE_LABEL: &str = "Likely FAKE ⚠️";

// ============================================
// APK LAYOUT
// ============================================

/// Accepted upload extension (compared case-insensitively)
pub const APK_EXTENSION: &str = "apk";

/// Manifest entry inside the archive
pub const MANIFEST_ENTRY: &str = "AndroidManifest.xml";

/// Upper bound on the decompressed manifest; real manifests are well under 1 MiB
pub const MAX_MANIFEST_BYTES: u64 = 4 * 1024 * 1024;

/// Android attribute namespace prefix used by the decoder
pub const ANDROID_ATTR_PREFIX: &str = "android:";

/// How the decoder renders typed values it cannot resolve (references, dimensions, ...)
pub const UNRESOLVED_VALUE_PREFIX: &str = "ResourceValueType::";

// ============================================
// SERVER DEFAULTS
// ============================================

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 100;

/// Multipart field carrying the APK
pub const UPLOAD_FIELD: &str = "file";

// ============================================
// CONVERSIONS
// ============================================

/// Bytes to KiB, rounded to two decimals
#[inline]
pub fn bytes_to_kb(bytes: u64) -> f64 {
    (bytes as f64 / 1024.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_kb() {
        assert_eq!(bytes_to_kb(0), 0.0);
        assert_eq!(bytes_to_kb(1024), 1.0);
        assert_eq!(bytes_to_kb(2_048_000), 2000.0);
        // 1500 / 1024 = 1.46484375
        assert_eq!(bytes_to_kb(1500), 1.46);
    }
}
