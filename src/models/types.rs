//! Type definitions for APK screening
//! Metadata, verdict and report records. All of them live for one scan only.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

use crate::utils::constants::{VERDICT_LIKELY_FAKE_LABEL, VERDICT_SAFE_LABEL};

/// Metadata extracted from an APK manifest plus its on-disk size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Application display label (absent when the manifest only has a resource reference)
    #[serde(rename = "App Name")]
    pub app_name: Option<String>,
    /// Package identifier, normally reverse-DNS
    #[serde(rename = "Package Name")]
    pub package_name: String,
    /// Human-readable version label
    #[serde(rename = "Version")]
    pub version: Option<String>,
    /// Declared permission identifiers, as written in the manifest
    #[serde(rename = "Permissions")]
    pub permissions: BTreeSet<String>,
    /// File size in KiB, two decimals
    #[serde(rename = "File Size (KB)")]
    pub file_size_kb: f64,
}

impl MetadataRecord {
    /// Build a record with only the fields the verdict engine looks at
    pub fn new<I, S>(package_name: impl Into<String>, file_size_kb: f64, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            app_name: None,
            package_name: package_name.into(),
            version: None,
            permissions: permissions.into_iter().map(Into::into).collect(),
            file_size_kb,
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Binary screening outcome, serialized as its [`label`](Verdict::label)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    LikelyFake,
}

const VERDICT_LABELS: &[&str] = &[VERDICT_SAFE_LABEL, VERDICT_LIKELY_FAKE_LABEL];

impl Verdict {
    /// Wire label
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Safe => VERDICT_SAFE_LABEL,
            Verdict::LikelyFake => VERDICT_LIKELY_FAKE_LABEL,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            VERDICT_SAFE_LABEL => Some(Verdict::Safe),
            VERDICT_LIKELY_FAKE_LABEL => Some(Verdict::LikelyFake),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Safe => "SAFE",
            Verdict::LikelyFake => "LIKELY_FAKE",
        }
    }

    pub fn is_fake(&self) -> bool {
        matches!(self, Verdict::LikelyFake)
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Verdict::from_label(&label)
            .ok_or_else(|| de::Error::unknown_variant(&label, VERDICT_LABELS))
    }
}

/// Verdict plus the reasons that produced it.
///
/// `reasons` is empty iff `verdict` is [`Verdict::Safe`]; use
/// [`VerdictRecord::from_reasons`] to keep that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictRecord {
    #[serde(rename = "Verdict")]
    pub verdict: Verdict,
    #[serde(rename = "Reasons")]
    pub reasons: Vec<String>,
}

impl VerdictRecord {
    pub fn from_reasons(reasons: Vec<String>) -> Self {
        let verdict = if reasons.is_empty() {
            Verdict::Safe
        } else {
            Verdict::LikelyFake
        };
        Self { verdict, reasons }
    }

    /// Pretty print for terminal output
    pub fn summary(&self) -> String {
        let mut output = format!("{}\n", self.verdict.label());
        for reason in &self.reasons {
            output.push_str(&format!("   - {}\n", reason));
        }
        output
    }
}

/// Full result of one scan, serialized as `{ "features": …, "result": … }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub features: MetadataRecord,
    pub result: VerdictRecord,
}
