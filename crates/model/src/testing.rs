//! Helpers for constructing OTLP batches in tests
//!
//! Building prost message trees by hand is noisy; these helpers keep the
//! capture and API tests focused on behavior. Downstream crates use them
//! from their own tests, so the module is part of the normal build.

use opentelemetry_proto::tonic::common::v1::{AnyValue, InstrumentationScope, KeyValue, any_value};
use opentelemetry_proto::tonic::logs::v1 as plog;
use opentelemetry_proto::tonic::metrics::v1 as pmetric;
use opentelemetry_proto::tonic::resource::v1::Resource;
use opentelemetry_proto::tonic::trace::v1 as ptrace;

/// A string-valued attribute.
pub fn str_kv(key: &str, value: &str) -> KeyValue {
    KeyValue {
        key: key.to_owned(),
        value: Some(AnyValue {
            value: Some(any_value::Value::StringValue(value.to_owned())),
        }),
    }
}

/// A list of string-valued attributes.
pub fn attrs(pairs: &[(&str, &str)]) -> Vec<KeyValue> {
    pairs.iter().map(|(k, v)| str_kv(k, v)).collect()
}

/// A gauge metric with one double data point carrying `point_attrs`.
pub fn gauge_metric(name: &str, point_attrs: &[(&str, &str)]) -> pmetric::Metric {
    pmetric::Metric {
        name: name.to_owned(),
        data: Some(pmetric::metric::Data::Gauge(pmetric::Gauge {
            data_points: vec![pmetric::NumberDataPoint {
                attributes: attrs(point_attrs),
                value: Some(pmetric::number_data_point::Value::AsDouble(1.0)),
                ..pmetric::NumberDataPoint::default()
            }],
        })),
        ..pmetric::Metric::default()
    }
}

/// A monotonic sum metric with one int data point carrying `point_attrs`.
pub fn sum_metric(name: &str, point_attrs: &[(&str, &str)]) -> pmetric::Metric {
    pmetric::Metric {
        name: name.to_owned(),
        data: Some(pmetric::metric::Data::Sum(pmetric::Sum {
            data_points: vec![pmetric::NumberDataPoint {
                attributes: attrs(point_attrs),
                value: Some(pmetric::number_data_point::Value::AsInt(1)),
                ..pmetric::NumberDataPoint::default()
            }],
            is_monotonic: true,
            ..pmetric::Sum::default()
        })),
        ..pmetric::Metric::default()
    }
}

/// A histogram metric with one data point (`count=2`, `sum=3`).
pub fn histogram_metric(
    name: &str,
    bucket_counts: &[u64],
    explicit_bounds: &[f64],
) -> pmetric::Metric {
    pmetric::Metric {
        name: name.to_owned(),
        data: Some(pmetric::metric::Data::Histogram(pmetric::Histogram {
            data_points: vec![pmetric::HistogramDataPoint {
                count: 2,
                sum: Some(3.0),
                bucket_counts: bucket_counts.to_vec(),
                explicit_bounds: explicit_bounds.to_vec(),
                ..pmetric::HistogramDataPoint::default()
            }],
            ..pmetric::Histogram::default()
        })),
        ..pmetric::Metric::default()
    }
}

/// A metrics batch with one resource and one scope, no attributes.
pub fn metrics_data(metrics: Vec<pmetric::Metric>) -> pmetric::MetricsData {
    metrics_data_with(&[], &[], metrics)
}

/// A metrics batch with one resource and one scope carrying attributes.
pub fn metrics_data_with(
    resource_attrs: &[(&str, &str)],
    scope_attrs: &[(&str, &str)],
    metrics: Vec<pmetric::Metric>,
) -> pmetric::MetricsData {
    pmetric::MetricsData {
        resource_metrics: vec![pmetric::ResourceMetrics {
            resource: Some(Resource {
                attributes: attrs(resource_attrs),
                ..Resource::default()
            }),
            scope_metrics: vec![pmetric::ScopeMetrics {
                scope: Some(InstrumentationScope {
                    attributes: attrs(scope_attrs),
                    ..InstrumentationScope::default()
                }),
                metrics,
                ..pmetric::ScopeMetrics::default()
            }],
            ..pmetric::ResourceMetrics::default()
        }],
    }
}

/// A span with attributes and no events.
pub fn span(name: &str, span_attrs: &[(&str, &str)]) -> ptrace::Span {
    ptrace::Span {
        name: name.to_owned(),
        attributes: attrs(span_attrs),
        ..ptrace::Span::default()
    }
}

/// A span with one event carrying `event_attrs`.
pub fn span_with_event(
    name: &str,
    span_attrs: &[(&str, &str)],
    event_attrs: &[(&str, &str)],
) -> ptrace::Span {
    ptrace::Span {
        name: name.to_owned(),
        attributes: attrs(span_attrs),
        events: vec![ptrace::span::Event {
            attributes: attrs(event_attrs),
            ..ptrace::span::Event::default()
        }],
        ..ptrace::Span::default()
    }
}

/// A traces batch with one resource and one scope, no attributes.
pub fn traces_data(spans: Vec<ptrace::Span>) -> ptrace::TracesData {
    traces_data_with(&[], &[], spans)
}

/// A traces batch with one resource and one scope carrying attributes.
pub fn traces_data_with(
    resource_attrs: &[(&str, &str)],
    scope_attrs: &[(&str, &str)],
    spans: Vec<ptrace::Span>,
) -> ptrace::TracesData {
    ptrace::TracesData {
        resource_spans: vec![ptrace::ResourceSpans {
            resource: Some(Resource {
                attributes: attrs(resource_attrs),
                ..Resource::default()
            }),
            scope_spans: vec![ptrace::ScopeSpans {
                scope: Some(InstrumentationScope {
                    attributes: attrs(scope_attrs),
                    ..InstrumentationScope::default()
                }),
                spans,
                ..ptrace::ScopeSpans::default()
            }],
            ..ptrace::ResourceSpans::default()
        }],
    }
}

/// A log record; an empty `body` string produces a record without a body.
pub fn log_record(severity: i32, body: &str, record_attrs: &[(&str, &str)]) -> plog::LogRecord {
    let body = (!body.is_empty()).then(|| AnyValue {
        value: Some(any_value::Value::StringValue(body.to_owned())),
    });
    plog::LogRecord {
        severity_number: severity,
        body,
        attributes: attrs(record_attrs),
        ..plog::LogRecord::default()
    }
}

/// A logs batch with one resource and one scope, no attributes.
pub fn logs_data(records: Vec<plog::LogRecord>) -> plog::LogsData {
    logs_data_with(&[], &[], records)
}

/// A logs batch with one resource and one scope carrying attributes.
pub fn logs_data_with(
    resource_attrs: &[(&str, &str)],
    scope_attrs: &[(&str, &str)],
    records: Vec<plog::LogRecord>,
) -> plog::LogsData {
    plog::LogsData {
        resource_logs: vec![plog::ResourceLogs {
            resource: Some(Resource {
                attributes: attrs(resource_attrs),
                ..Resource::default()
            }),
            scope_logs: vec![plog::ScopeLogs {
                scope: Some(InstrumentationScope {
                    attributes: attrs(scope_attrs),
                    ..InstrumentationScope::default()
                }),
                log_records: records,
                ..plog::ScopeLogs::default()
            }],
            ..plog::ResourceLogs::default()
        }],
    }
}
