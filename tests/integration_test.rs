//! Integration tests for the heuristic verdict engine

use apk_screen::{FakeDetector, MetadataRecord, Verdict};

fn no_perms() -> Vec<&'static str> {
    Vec::new()
}

#[test]
fn test_scenario_a_clean_app_is_safe() {
    let record = MetadataRecord::new("com.example.app", 5000.0, ["INTERNET"]);
    let result = FakeDetector::new().evaluate(&record);

    assert_eq!(result.verdict, Verdict::Safe);
    assert!(result.reasons.is_empty());
}

#[test]
fn test_scenario_b_unusual_package() {
    let record = MetadataRecord::new("xyz.weird", 5000.0, no_perms());
    let result = FakeDetector::new().evaluate(&record);

    assert_eq!(result.verdict, Verdict::LikelyFake);
    assert_eq!(result.reasons, vec!["Unusual package name"]);
}

#[test]
fn test_scenario_c_small_with_sms() {
    let record = MetadataRecord::new("com.example.app", 500.0, ["READ_SMS"]);
    let result = FakeDetector::new().evaluate(&record);

    assert_eq!(result.verdict, Verdict::LikelyFake);
    assert_eq!(
        result.reasons,
        vec!["APK size unusually small", "Suspicious Permission: READ_SMS"]
    );
}

#[test]
fn test_size_threshold_is_strict() {
    let detector = FakeDetector::new();

    let at_threshold = MetadataRecord::new("org.example", 2000.0, no_perms());
    assert_eq!(detector.evaluate(&at_threshold).verdict, Verdict::Safe);

    let just_below = MetadataRecord::new("org.example", 1999.99, no_perms());
    assert_eq!(
        detector.evaluate(&just_below).reasons,
        vec!["APK size unusually small"]
    );
}

#[test]
fn test_one_reason_per_failed_rule() {
    let detector = FakeDetector::new();
    let cases: Vec<(MetadataRecord, usize)> = vec![
        (MetadataRecord::new("in.example", 2500.0, ["CAMERA"]), 0),
        (MetadataRecord::new("net.example", 2500.0, ["CAMERA"]), 1),
        (MetadataRecord::new("net.example", 10.0, ["CAMERA"]), 2),
        (MetadataRecord::new("net.example", 10.0, ["READ_CONTACTS"]), 3),
        (
            MetadataRecord::new(
                "net.example",
                10.0,
                ["READ_SMS", "READ_CONTACTS", "RECORD_AUDIO"],
            ),
            5,
        ),
    ];

    for (record, expected) in cases {
        let result = detector.evaluate(&record);
        assert_eq!(result.reasons.len(), expected, "{:?}", record);
        assert_eq!(result.verdict.is_fake(), expected > 0);
    }
}

#[test]
fn test_verdict_is_pure() {
    let detector = FakeDetector::new();
    let record = MetadataRecord::new("xyz.weird", 42.0, ["android.permission.RECORD_AUDIO"])
        .with_app_name("Weird")
        .with_version("0.0.1");

    let first = detector.evaluate(&record);
    let second = detector.evaluate(&record);
    assert_eq!(first, second);
    assert_eq!(
        first.reasons,
        vec![
            "Unusual package name",
            "APK size unusually small",
            "Suspicious Permission: RECORD_AUDIO",
        ]
    );
}
