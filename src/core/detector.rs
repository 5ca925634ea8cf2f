//! Heuristic Verdict Engine
//!
//! Three independent checks over a [`MetadataRecord`]:
//! 1. package name starts with an allow-listed prefix
//! 2. APK is at least [`MIN_APK_SIZE_KB`]
//! 3. none of [`DANGEROUS_PERMISSIONS`] is declared
//!
//! Every check runs on every record; any hit makes the verdict LIKELY_FAKE.
//! Reasons are reported in rule order.

use crate::models::{MetadataRecord, VerdictRecord};
use crate::utils::constants::{
    ANDROID_PERMISSION_NAMESPACE, DANGEROUS_PERMISSIONS, MIN_APK_SIZE_KB, REASON_SMALL_APK,
    REASON_SUSPICIOUS_PERMISSION_PREFIX, REASON_UNUSUAL_PACKAGE, TRUSTED_PACKAGE_PREFIXES,
};

/// A single failed check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeIndicator {
    /// Package name outside the prefix allow-list
    UnusualPackageName,
    /// APK smaller than the size threshold
    SmallApkSize,
    /// A dangerous permission is declared (bare name)
    SuspiciousPermission(&'static str),
}

impl FakeIndicator {
    /// Reason string reported to clients
    pub fn description(&self) -> String {
        match self {
            FakeIndicator::UnusualPackageName => REASON_UNUSUAL_PACKAGE.to_string(),
            FakeIndicator::SmallApkSize => REASON_SMALL_APK.to_string(),
            FakeIndicator::SuspiciousPermission(name) => {
                format!("{}{}", REASON_SUSPICIOUS_PERMISSION_PREFIX, name)
            }
        }
    }

    /// Stable key for telemetry
    pub fn kind(&self) -> &'static str {
        match self {
            FakeIndicator::UnusualPackageName => "unusual_package_name",
            FakeIndicator::SmallApkSize => "small_apk_size",
            FakeIndicator::SuspiciousPermission(_) => "suspicious_permission",
        }
    }
}

/// Stateless rule evaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeDetector;

impl FakeDetector {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate all rules and build the verdict record
    pub fn evaluate(&self, metadata: &MetadataRecord) -> VerdictRecord {
        let reasons = self
            .indicators(metadata)
            .iter()
            .map(FakeIndicator::description)
            .collect();
        VerdictRecord::from_reasons(reasons)
    }

    /// Failed checks in rule order
    pub fn indicators(&self, metadata: &MetadataRecord) -> Vec<FakeIndicator> {
        let mut found = Vec::new();

        if !has_trusted_prefix(&metadata.package_name) {
            found.push(FakeIndicator::UnusualPackageName);
        }

        // NaN compares false, so treat "not >= threshold" as small
        if !(metadata.file_size_kb >= MIN_APK_SIZE_KB) {
            found.push(FakeIndicator::SmallApkSize);
        }

        for perm in DANGEROUS_PERMISSIONS {
            if declares_permission(metadata, perm) {
                found.push(FakeIndicator::SuspiciousPermission(perm));
            }
        }

        found
    }
}

fn has_trusted_prefix(package_name: &str) -> bool {
    TRUSTED_PACKAGE_PREFIXES
        .iter()
        .any(|prefix| package_name.starts_with(prefix))
}

/// Exact match on the bare name or its `android.permission.` form
fn declares_permission(metadata: &MetadataRecord, name: &str) -> bool {
    metadata.permissions.iter().any(|declared| {
        declared == name
            || declared
                .strip_prefix(ANDROID_PERMISSION_NAMESPACE)
                .is_some_and(|bare| bare == name)
    })
}
