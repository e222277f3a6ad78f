//! Tests for Filter

use super::*;

use otap_model::testing::{
    gauge_metric, histogram_metric, log_record, logs_data, logs_data_with, metrics_data,
    metrics_data_with, span, span_with_event, sum_metric, traces_data, traces_data_with,
};

fn set(values: &[&str]) -> HashSet<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

fn signals(kinds: &[SignalKind]) -> HashSet<SignalKind> {
    kinds.iter().copied().collect()
}

// ============================================================================
// Signal and resource gates
// ============================================================================

#[test]
fn test_empty_filter_matches_any_signal() {
    let filter = Filter::new();
    assert!(filter.match_metrics(&metrics_data(vec![gauge_metric("m", &[])])));
    assert!(filter.match_traces(&traces_data(vec![span("s", &[])])));
    assert!(filter.match_logs(&logs_data(vec![log_record(5, "hello", &[])])));
}

#[test]
fn test_signal_gate_rejects_other_signals() {
    let filter = Filter {
        signals: signals(&[SignalKind::Traces]),
        ..Filter::default()
    };
    assert!(!filter.match_metrics(&metrics_data(vec![gauge_metric("m", &[])])));
    assert!(!filter.match_logs(&logs_data(vec![log_record(5, "hello", &[])])));
    assert!(filter.match_traces(&traces_data(vec![span("s", &[])])));
}

#[test]
fn test_resource_attributes_all_required() {
    let filter = Filter {
        resource_attributes: [
            ("service.name".to_owned(), "svc".to_owned()),
            ("env".to_owned(), "prod".to_owned()),
        ]
        .into(),
        ..Filter::default()
    };

    let both = metrics_data_with(
        &[("service.name", "svc"), ("env", "prod")],
        &[],
        vec![gauge_metric("m", &[])],
    );
    assert!(filter.match_metrics(&both));

    let one = metrics_data_with(&[("service.name", "svc")], &[], vec![gauge_metric("m", &[])]);
    assert!(!filter.match_metrics(&one));

    let wrong_value = metrics_data_with(
        &[("service.name", "svc"), ("env", "dev")],
        &[],
        vec![gauge_metric("m", &[])],
    );
    assert!(!filter.match_metrics(&wrong_value));
}

// ============================================================================
// Attribute names across levels
// ============================================================================

#[test]
fn test_metrics_attribute_name_across_levels() {
    let md = metrics_data_with(
        &[("service.name", "svc")],
        &[("scope.key", "scope.value")],
        vec![gauge_metric("http.server.request.duration", &[("http.route", "/v1")])],
    );

    let by_point = Filter {
        signals: signals(&[SignalKind::Metrics]),
        metric_names: set(&["http.server.request.duration"]),
        attribute_names: set(&["http.route"]),
        ..Filter::default()
    };
    assert!(by_point.match_metrics(&md));

    let by_scope = Filter {
        signals: signals(&[SignalKind::Metrics]),
        attribute_names: set(&["scope.key"]),
        ..Filter::default()
    };
    assert!(by_scope.match_metrics(&md));

    let by_resource = Filter {
        signals: signals(&[SignalKind::Metrics]),
        attribute_names: set(&["service.name"]),
        ..Filter::default()
    };
    assert!(by_resource.match_metrics(&md));

    let missing = Filter {
        signals: signals(&[SignalKind::Metrics]),
        attribute_names: set(&["missing.key"]),
        ..Filter::default()
    };
    assert!(!missing.match_metrics(&md));
}

#[test]
fn test_metrics_field_and_value_or() {
    let mut metrics = vec![
        sum_metric("hnb_product_api_graphql_total", &[("client_name", "web")]),
        gauge_metric("http.server.request.duration", &[("other", "x")]),
    ];

    let filter = Filter {
        signals: signals(&[SignalKind::Metrics]),
        metric_names: set(&["http.server.request.duration"]),
        attribute_names: set(&["client.name", "client_name"]),
        ..Filter::default()
    };

    // Name and attribute key live on different metrics: no match.
    assert!(!filter.match_metrics(&metrics_data(metrics.clone())));

    // Put the key on the named metric: match.
    metrics[1] = gauge_metric(
        "http.server.request.duration",
        &[("other", "x"), ("client_name", "mobile")],
    );
    assert!(filter.match_metrics(&metrics_data(metrics)));
}

#[test]
fn test_traces_attribute_name_across_levels() {
    let td = traces_data_with(
        &[("service.name", "svc")],
        &[("scope.key", "scope.value")],
        vec![span_with_event(
            "GET /",
            &[("span.key", "span.value")],
            &[("event.key", "event.value")],
        )],
    );

    let by_event = Filter {
        signals: signals(&[SignalKind::Traces]),
        span_names: set(&["GET /"]),
        attribute_names: set(&["event.key"]),
        ..Filter::default()
    };
    assert!(by_event.match_traces(&td));

    let by_scope = Filter {
        signals: signals(&[SignalKind::Traces]),
        attribute_names: set(&["scope.key"]),
        ..Filter::default()
    };
    assert!(by_scope.match_traces(&td));

    let missing = Filter {
        signals: signals(&[SignalKind::Traces]),
        attribute_names: set(&["missing.key"]),
        ..Filter::default()
    };
    assert!(!missing.match_traces(&td));
}

#[test]
fn test_traces_field_and_value_or() {
    let spans = vec![
        span("POST /graphql", &[("client_name", "web")]),
        span("GET /", &[("other", "x")]),
    ];

    let filter = Filter {
        signals: signals(&[SignalKind::Traces]),
        span_names: set(&["GET /"]),
        attribute_names: set(&["client.name", "client_name"]),
        ..Filter::default()
    };
    assert!(!filter.match_traces(&traces_data(spans)));

    let spans = vec![
        span("POST /graphql", &[("client_name", "web")]),
        span("GET /", &[("other", "x"), ("client_name", "mobile")]),
    ];
    assert!(filter.match_traces(&traces_data(spans)));
}

#[test]
fn test_logs_attribute_name_across_levels() {
    let ld = logs_data_with(
        &[("service.name", "svc")],
        &[("scope.key", "scope.value")],
        vec![log_record(9, "hello", &[("log.key", "log.value")])],
    );

    let by_record = Filter {
        signals: signals(&[SignalKind::Logs]),
        attribute_names: set(&["log.key"]),
        ..Filter::default()
    };
    assert!(by_record.match_logs(&ld));

    let missing = Filter {
        signals: signals(&[SignalKind::Logs]),
        attribute_names: set(&["missing.key"]),
        min_severity_number: 9,
        ..Filter::default()
    };
    assert!(!missing.match_logs(&ld));
}

// ============================================================================
// Log severity and body gates
// ============================================================================

#[test]
fn test_log_severity_and_body_gates() {
    let filter = Filter {
        signals: signals(&[SignalKind::Logs]),
        log_body_contains: "timeout".to_owned(),
        min_severity_number: 9,
        ..Filter::default()
    };

    // Severity too low.
    assert!(!filter.match_logs(&logs_data(vec![log_record(5, "timeout", &[])])));
    // Body does not contain the needle.
    assert!(!filter.match_logs(&logs_data(vec![log_record(13, "ok", &[])])));
    // Both gates pass.
    assert!(filter.match_logs(&logs_data(vec![log_record(17, "request timeout", &[])])));
}

#[test]
fn test_log_gates_are_per_record() {
    let filter = Filter {
        signals: signals(&[SignalKind::Logs]),
        log_body_contains: "timeout".to_owned(),
        min_severity_number: 9,
        ..Filter::default()
    };

    // One record passes both gates even though its neighbours fail.
    let ld = logs_data(vec![
        log_record(5, "timeout", &[]),
        log_record(13, "ok", &[]),
        log_record(17, "request timeout", &[]),
    ]);
    assert!(filter.match_logs(&ld));
}

// ============================================================================
// Exclusions
// ============================================================================

#[test]
fn test_metric_name_exclusion() {
    let filter = Filter {
        metric_names_exclude: set(&["noisy.metric"]),
        ..Filter::default()
    };

    assert!(!filter.match_metrics(&metrics_data(vec![gauge_metric("noisy.metric", &[])])));
    assert!(filter.match_metrics(&metrics_data(vec![gauge_metric("quiet.metric", &[])])));
}

#[test]
fn test_span_name_exclusion() {
    let filter = Filter {
        span_names_exclude: set(&["GET /health"]),
        ..Filter::default()
    };

    assert!(!filter.match_traces(&traces_data(vec![span("GET /health", &[])])));
    assert!(filter.match_traces(&traces_data(vec![
        span("GET /health", &[]),
        span("GET /", &[]),
    ])));
}

#[test]
fn test_attribute_exclusion_rejects_at_any_level() {
    let filter = Filter {
        attribute_names_exclude: set(&["internal"]),
        ..Filter::default()
    };

    // Key on a span event rejects the span.
    let td = traces_data(vec![span_with_event("GET /", &[], &[("internal", "1")])]);
    assert!(!filter.match_traces(&td));

    // Key on a data point rejects the metric.
    let md = metrics_data(vec![gauge_metric("m", &[("internal", "1")])]);
    assert!(!filter.match_metrics(&md));

    // Key on the record rejects the log.
    let ld = logs_data(vec![log_record(9, "hello", &[("internal", "1")])]);
    assert!(!filter.match_logs(&ld));

    // Clean candidates still match.
    assert!(filter.match_traces(&traces_data(vec![span("GET /", &[])])));
}

// ============================================================================
// Histogram shape
// ============================================================================

#[test]
fn test_histogram_shape_filters() {
    let filter = Filter {
        bucket_counts_len: Some(3),
        ..Filter::default()
    };

    assert!(filter.match_metrics(&metrics_data(vec![histogram_metric(
        "h",
        &[1, 1, 0],
        &[1.0, 2.0],
    )])));
    assert!(!filter.match_metrics(&metrics_data(vec![histogram_metric("h", &[1, 1], &[1.0])])));
    // Non-histogram metrics never pass a shape filter.
    assert!(!filter.match_metrics(&metrics_data(vec![gauge_metric("g", &[])])));

    let both = Filter {
        bucket_counts_len: Some(3),
        explicit_bounds_len: Some(2),
        ..Filter::default()
    };
    assert!(both.match_metrics(&metrics_data(vec![histogram_metric(
        "h",
        &[1, 1, 0],
        &[1.0, 2.0],
    )])));
    assert!(!both.match_metrics(&metrics_data(vec![histogram_metric(
        "h",
        &[1, 1, 0],
        &[1.0],
    )])));
}
