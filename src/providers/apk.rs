//! APK metadata reader backed by `zip` + `axmldecoder`
//!
//! Opens the archive, decodes `AndroidManifest.xml` from Android binary XML
//! and picks out package, version, label and declared permissions.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::panic;
use std::path::Path;

use axmldecoder::{Element, Node};
use tracing::debug;
use zip::ZipArchive;

use super::MetadataReader;
use crate::models::{AppError, AppResult, ErrorCode, MetadataRecord};
use crate::utils::constants::{
    bytes_to_kb, ANDROID_ATTR_PREFIX, MANIFEST_ENTRY, MAX_MANIFEST_BYTES, UNRESOLVED_VALUE_PREFIX,
};

/// Manifest children that declare permissions
const PERMISSION_TAGS: [&str; 2] = ["uses-permission", "uses-permission-sdk-23"];

/// Default [`MetadataReader`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipApkReader;

impl ZipApkReader {
    pub fn new() -> Self {
        Self
    }

    /// Raw bytes of the binary manifest.
    ///
    /// The size declared in the archive is not trusted; at most
    /// [`MAX_MANIFEST_BYTES`] are inflated.
    fn manifest_bytes(path: &Path) -> AppResult<(Vec<u8>, u64)> {
        let file = File::open(path)?;
        let size_bytes = file.metadata()?.len();

        let mut archive = ZipArchive::new(BufReader::new(file))?;
        let mut entry = archive.by_name(MANIFEST_ENTRY)?;

        let mut buf = Vec::new();
        entry
            .by_ref()
            .take(MAX_MANIFEST_BYTES + 1)
            .read_to_end(&mut buf)?;

        if buf.len() as u64 > MAX_MANIFEST_BYTES {
            return Err(AppError::new(
                ErrorCode::ApkManifestInvalid,
                format!("{} exceeds {} bytes", MANIFEST_ENTRY, MAX_MANIFEST_BYTES),
            ));
        }

        Ok((buf, size_bytes))
    }
}

impl MetadataReader for ZipApkReader {
    fn read_metadata(&self, path: &Path) -> AppResult<MetadataRecord> {
        let (manifest, size_bytes) = Self::manifest_bytes(path)?;
        debug!(path = %path.display(), manifest_len = manifest.len(), "Decoding manifest");

        let document = decode_manifest(&manifest)?;

        let root = match document.get_root() {
            Some(Node::Element(root)) => root,
            _ => return Err(AppError::field_missing("manifest")),
        };

        let mut record = extract_manifest(root)?;
        record.file_size_kb = bytes_to_kb(size_bytes);
        Ok(record)
    }
}

/// Decode Android binary XML.
///
/// The decoder indexes and unwraps on malformed chunk tables, so a panic is
/// reported as an invalid manifest instead of taking the caller down.
fn decode_manifest(manifest: &[u8]) -> AppResult<axmldecoder::XmlDocument> {
    match panic::catch_unwind(|| axmldecoder::parse(manifest)) {
        Ok(Ok(document)) => Ok(document),
        Ok(Err(e)) => Err(AppError::new(ErrorCode::ApkManifestInvalid, e.to_string())),
        Err(_) => Err(AppError::new(
            ErrorCode::ApkManifestInvalid,
            format!("{} is malformed", MANIFEST_ENTRY),
        )),
    }
}

/// Build a record from the decoded `<manifest>` element. Size is left at 0.
fn extract_manifest(root: &Element) -> AppResult<MetadataRecord> {
    let package_name = attr(root, "package")
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::field_missing("package"))?
        .to_string();

    let version = attr(root, "versionName").map(str::to_string);

    let app_name = child_elements(root)
        .find(|e| e.get_tag() == "application")
        .and_then(|app| attr(app, "label"))
        .filter(|label| !is_resource_reference(label))
        .map(str::to_string);

    let permissions: BTreeSet<String> = child_elements(root)
        .filter(|e| PERMISSION_TAGS.iter().any(|tag| e.get_tag() == *tag))
        .filter_map(|e| attr(e, "name"))
        .map(str::to_string)
        .collect();

    Ok(MetadataRecord {
        app_name,
        package_name,
        version,
        permissions,
        file_size_kb: 0.0,
    })
}

fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.get_children().iter().filter_map(|node| match node {
        Node::Element(e) => Some(e),
        _ => None,
    })
}

fn attr<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
    find_attr(element.get_attributes().iter(), name)
}

/// Look up `name`, accepting it bare or under the `android:` prefix.
fn find_attr<'a, I>(attrs: I, name: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    attrs
        .into_iter()
        .find(|(key, _)| {
            key.as_str() == name || key.strip_prefix(ANDROID_ATTR_PREFIX) == Some(name)
        })
        .map(|(_, value)| value.as_str())
}

/// `@string/app_name`, `@7F120027` and typed references the decoder leaves
/// unresolved all need resources.arsc
fn is_resource_reference(value: &str) -> bool {
    value.starts_with('@') || value.starts_with(UNRESOLVED_VALUE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;

    const MANIFEST: &[u8] = include_bytes!("../../tests/fixtures/AndroidManifest.xml");
    const MANIFEST_NO_PACKAGE: &[u8] =
        include_bytes!("../../tests/fixtures/AndroidManifestNoPackage.xml");
    const MANIFEST_LABEL_REF: &[u8] =
        include_bytes!("../../tests/fixtures/AndroidManifestLabelRef.xml");
    const DEX: &[u8] = b"dex\n035\0";

    fn write_zip(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> std::path::PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (entry, data) in entries {
            zip.start_file(*entry, FileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
        path
    }

    #[test]
    fn test_find_attr_accepts_both_forms() {
        let pairs = vec![
            ("package".to_string(), "com.example".to_string()),
            ("android:versionName".to_string(), "1.0".to_string()),
            ("android:name".to_string(), "android.permission.READ_SMS".to_string()),
        ];
        let iter = || pairs.iter().map(|(k, v)| (k, v));

        assert_eq!(find_attr(iter(), "package"), Some("com.example"));
        assert_eq!(find_attr(iter(), "versionName"), Some("1.0"));
        assert_eq!(find_attr(iter(), "android:versionName"), Some("1.0"));
        assert_eq!(find_attr(iter(), "name"), Some("android.permission.READ_SMS"));
        assert_eq!(find_attr(iter(), "label"), None);
        // only the android namespace is stripped
        assert_eq!(find_attr(iter(), "ersionName"), None);
    }

    #[test]
    fn test_resource_reference_detection() {
        assert!(is_resource_reference("@string/app_name"));
        assert!(is_resource_reference("@7F120027"));
        assert!(is_resource_reference("ResourceValueType::Reference/2131886119"));
        assert!(!is_resource_reference("My App"));
        assert!(!is_resource_reference(""));
    }

    #[test]
    fn test_non_zip_is_invalid_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("fake.apk");
        std::fs::write(&path, b"this is definitely not a zip file").unwrap();

        let err = ZipApkReader::new().read_metadata(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::ApkInvalidArchive);
        assert!(err.code.is_parse_failure());
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_zip_without_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_zip(tmp.path(), "empty.apk", &[("classes.dex", DEX)]);

        let err = ZipApkReader::new().read_metadata(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::ApkManifestMissing);
    }

    #[test]
    fn test_reads_manifest_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_zip(
            tmp.path(),
            "fixture.apk",
            &[(MANIFEST_ENTRY, MANIFEST), ("classes.dex", DEX)],
        );

        let record = ZipApkReader::new().read_metadata(&path).unwrap();
        assert_eq!(record.package_name, "com.example.fixture");
        assert_eq!(record.version.as_deref(), Some("2.1.0"));
        assert_eq!(record.app_name.as_deref(), Some("Fixture App"));
        assert_eq!(
            record.permissions.iter().map(String::as_str).collect::<Vec<_>>(),
            vec![
                "android.permission.INTERNET",
                "android.permission.READ_SMS",
                "android.permission.RECORD_AUDIO",
            ]
        );

        let on_disk = std::fs::metadata(&path).unwrap().len();
        assert!(record.file_size_kb > 0.0);
        assert_eq!(record.file_size_kb, bytes_to_kb(on_disk));
    }

    #[test]
    fn test_unresolved_label_is_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_zip(tmp.path(), "ref.apk", &[(MANIFEST_ENTRY, MANIFEST_LABEL_REF)]);

        let record = ZipApkReader::new().read_metadata(&path).unwrap();
        assert_eq!(record.package_name, "xyz.labelref");
        assert_eq!(record.app_name, None);
        assert_eq!(record.version, None);
        assert!(record.permissions.is_empty());
    }

    #[test]
    fn test_missing_package_is_field_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_zip(tmp.path(), "nopkg.apk", &[(MANIFEST_ENTRY, MANIFEST_NO_PACKAGE)]);

        let err = ZipApkReader::new().read_metadata(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::ApkFieldMissing);
        assert!(err.message.contains("package"));
    }

    #[test]
    fn test_oversized_manifest_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        // Deflates to a few KiB, inflates past the limit
        let inflated = vec![0u8; MAX_MANIFEST_BYTES as usize + 1];
        let path = write_zip(tmp.path(), "bomb.apk", &[(MANIFEST_ENTRY, inflated.as_slice())]);
        assert!(std::fs::metadata(&path).unwrap().len() < 1024 * 1024);

        let err = ZipApkReader::new().read_metadata(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::ApkManifestInvalid);
    }

    #[test]
    fn test_manifest_at_limit_is_read() {
        let tmp = tempfile::tempdir().unwrap();
        let exact = vec![0u8; MAX_MANIFEST_BYTES as usize];
        let path = write_zip(tmp.path(), "exact.apk", &[(MANIFEST_ENTRY, exact.as_slice())]);

        let (bytes, _) = ZipApkReader::manifest_bytes(&path).unwrap();
        assert_eq!(bytes.len() as u64, MAX_MANIFEST_BYTES);
    }

    #[test]
    fn test_malformed_manifest_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let plain = write_zip(
            tmp.path(),
            "plain.apk",
            &[(MANIFEST_ENTRY, &b"<manifest package=\"com.example\"/>"[..])],
        );
        let truncated = write_zip(tmp.path(), "truncated.apk", &[(MANIFEST_ENTRY, &MANIFEST[..64])]);

        for path in [plain, truncated] {
            let err = ZipApkReader::new().read_metadata(&path).unwrap_err();
            assert_eq!(err.code, ErrorCode::ApkManifestInvalid, "{}", path.display());
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ZipApkReader::new()
            .read_metadata(&tmp.path().join("gone.apk"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Io);
    }
}
