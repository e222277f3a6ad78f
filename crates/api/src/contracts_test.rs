//! Tests for StreamRequest

use super::*;

#[test]
fn test_validate_rejects_non_positive_max_batches() {
    let req = StreamRequest::default();
    assert!(req.validate().is_err());

    let req = StreamRequest {
        max_batches: -1,
        ..StreamRequest::default()
    };
    assert!(req.validate().is_err());

    let req = StreamRequest {
        max_batches: 1,
        ..StreamRequest::default()
    };
    assert!(req.validate().is_ok());
}

#[test]
fn test_validate_rejects_negative_timeout() {
    let req = StreamRequest {
        max_batches: 1,
        timeout_seconds: -1,
        ..StreamRequest::default()
    };
    assert!(req.validate().is_err());

    let req = StreamRequest {
        max_batches: 1,
        timeout_seconds: 0,
        ..StreamRequest::default()
    };
    assert!(req.validate().is_ok());
}

#[test]
fn test_request_deserializes_with_defaults() {
    let req: StreamRequest = serde_json::from_str(r#"{"max_batches":3}"#).unwrap();
    assert_eq!(req.max_batches, 3);
    assert_eq!(req.timeout_seconds, 0);
    assert!(req.signals.is_empty());
    assert!(!req.verbose_metrics);
    assert!(req.bucket_counts_len.is_none());
}

#[test]
fn test_filter_conversion() {
    let req: StreamRequest = serde_json::from_str(
        r#"{
            "signals": ["metrics", "logs"],
            "metric_names": ["a", "b"],
            "metric_names_exclude": ["c"],
            "attribute_names": ["k"],
            "log_body_contains": "oops",
            "min_severity_number": 9,
            "resource_attributes": {"service.name": "svc"},
            "max_batches": 1
        }"#,
    )
    .unwrap();

    let filter = req.filter();
    assert!(filter.signals.contains(&SignalKind::Metrics));
    assert!(filter.signals.contains(&SignalKind::Logs));
    assert!(!filter.signals.contains(&SignalKind::Traces));
    assert!(filter.metric_names.contains("a"));
    assert!(filter.metric_names_exclude.contains("c"));
    assert!(filter.attribute_names.contains("k"));
    assert_eq!(filter.log_body_contains, "oops");
    assert_eq!(filter.min_severity_number, 9);
    assert_eq!(filter.resource_attributes["service.name"], "svc");
}
