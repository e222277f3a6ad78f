//! Per-signal payload projections
//!
//! Field presence mirrors the data point shape: scalar points carry
//! `value`, aggregated points carry `count`/`sum`, summaries add quantile
//! pairs, and histogram bucket detail appears only in verbose sessions.
//! Empty attribute maps serialize as absent, not as `{}`.

use serde::Serialize;
use serde_json::{Map, Value};

/// Detailed metrics batch projection.
///
/// Contains only the metrics that individually matched the session filter;
/// `resource_metrics_count` counts resources that contributed at least one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsPayload {
    pub resource_metrics_count: usize,
    pub metric_count: usize,
    pub metrics: Vec<Metric>,
}

/// One projected metric with its resource and scope context inlined.
#[derive(Debug, Clone, Serialize)]
pub struct Metric {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub unit: String,
    #[serde(rename = "type")]
    pub metric_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_attributes: Option<Map<String, Value>>,
    pub scope: Scope,
    pub data_points: Vec<MetricDataPoint>,
}

/// Instrumentation scope identity and attributes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scope {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
}

/// Normalized data point detail across the five OTLP metric types.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricDataPoint {
    pub start_time_unix_nano: u64,
    pub time_unix_nano: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
    /// Scalar value; present for gauge and sum points only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
    /// Histogram bucket detail; only populated for verbose sessions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_counts: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_bounds: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quantile_values: Vec<QuantileValue>,
    pub flags: u32,
}

/// One summary quantile pair.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuantileValue {
    pub quantile: f64,
    pub value: f64,
}

/// Concise traces batch summary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TracesPayload {
    pub resource_spans_count: usize,
    pub span_count: usize,
    /// Span names deduplicated in first-seen order across the whole batch.
    pub span_names: Vec<String>,
}

/// Concise logs batch summary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LogsPayload {
    pub resource_logs_count: usize,
    pub log_count: usize,
    /// Up to ten non-empty bodies in first-seen order.
    pub bodies: Vec<String>,
}
