//! Payload builders over borrowed OTLP batches
//!
//! Pure projections: no filtering happens here. The capture registry
//! decides which metrics make it into a payload; traces and logs are
//! summarized whole.

use opentelemetry_proto::tonic::common::v1::{InstrumentationScope, KeyValue};
use opentelemetry_proto::tonic::logs::v1 as plog;
use opentelemetry_proto::tonic::metrics::v1 as pmetric;
use opentelemetry_proto::tonic::metrics::v1::metric::Data;
use opentelemetry_proto::tonic::trace::v1 as ptrace;
use serde_json::Value;

use crate::attrs::{attrs_to_json, value_to_string};
use crate::payload::{
    LogsPayload, Metric, MetricDataPoint, QuantileValue, Scope, TracesPayload,
};

/// Maximum number of log bodies carried in a logs summary
const MAX_LOG_BODIES: usize = 10;

fn span_count(td: &ptrace::TracesData) -> usize {
    td.resource_spans
        .iter()
        .flat_map(|rs| &rs.scope_spans)
        .map(|ss| ss.spans.len())
        .sum()
}

fn log_record_count(ld: &plog::LogsData) -> usize {
    ld.resource_logs
        .iter()
        .flat_map(|rl| &rl.scope_logs)
        .map(|sl| sl.log_records.len())
        .sum()
}

/// Detailed projection for one metric with its resource and scope context.
///
/// If `verbose` is true, histogram data points include `bucket_counts` and
/// `explicit_bounds`.
pub fn build_metric(
    resource_attrs: &[KeyValue],
    scope: Option<&InstrumentationScope>,
    metric: &pmetric::Metric,
    verbose: bool,
) -> Metric {
    Metric {
        name: metric.name.clone(),
        description: metric.description.clone(),
        unit: metric.unit.clone(),
        metric_type: metric_type_name(metric),
        resource_attributes: attrs_to_json(resource_attrs),
        scope: scope.map(build_scope).unwrap_or_default(),
        data_points: build_data_points(metric, verbose),
    }
}

fn build_scope(scope: &InstrumentationScope) -> Scope {
    Scope {
        name: scope.name.clone(),
        version: scope.version.clone(),
        attributes: attrs_to_json(&scope.attributes),
    }
}

fn metric_type_name(metric: &pmetric::Metric) -> &'static str {
    match metric.data {
        None => "Empty",
        Some(Data::Gauge(_)) => "Gauge",
        Some(Data::Sum(_)) => "Sum",
        Some(Data::Histogram(_)) => "Histogram",
        Some(Data::ExponentialHistogram(_)) => "ExponentialHistogram",
        Some(Data::Summary(_)) => "Summary",
    }
}

fn build_data_points(metric: &pmetric::Metric, verbose: bool) -> Vec<MetricDataPoint> {
    match &metric.data {
        None => Vec::new(),
        Some(Data::Gauge(gauge)) => gauge.data_points.iter().map(number_point).collect(),
        Some(Data::Sum(sum)) => sum.data_points.iter().map(number_point).collect(),
        Some(Data::Histogram(histogram)) => histogram
            .data_points
            .iter()
            .map(|dp| histogram_point(dp, verbose))
            .collect(),
        Some(Data::ExponentialHistogram(histogram)) => histogram
            .data_points
            .iter()
            .map(exponential_histogram_point)
            .collect(),
        Some(Data::Summary(summary)) => {
            summary.data_points.iter().map(summary_point).collect()
        }
    }
}

fn number_point(dp: &pmetric::NumberDataPoint) -> MetricDataPoint {
    use pmetric::number_data_point::Value as NumberValue;

    let value = match dp.value {
        Some(NumberValue::AsInt(i)) => Some(Value::from(i)),
        Some(NumberValue::AsDouble(d)) => Some(Value::from(d)),
        None => None,
    };

    MetricDataPoint {
        start_time_unix_nano: dp.start_time_unix_nano,
        time_unix_nano: dp.time_unix_nano,
        attributes: attrs_to_json(&dp.attributes),
        value,
        flags: dp.flags,
        ..MetricDataPoint::default()
    }
}

fn histogram_point(dp: &pmetric::HistogramDataPoint, verbose: bool) -> MetricDataPoint {
    MetricDataPoint {
        start_time_unix_nano: dp.start_time_unix_nano,
        time_unix_nano: dp.time_unix_nano,
        attributes: attrs_to_json(&dp.attributes),
        count: Some(dp.count),
        sum: dp.sum,
        bucket_counts: (verbose && !dp.bucket_counts.is_empty())
            .then(|| dp.bucket_counts.clone()),
        explicit_bounds: (verbose && !dp.explicit_bounds.is_empty())
            .then(|| dp.explicit_bounds.clone()),
        flags: dp.flags,
        ..MetricDataPoint::default()
    }
}

fn exponential_histogram_point(
    dp: &pmetric::ExponentialHistogramDataPoint,
) -> MetricDataPoint {
    MetricDataPoint {
        start_time_unix_nano: dp.start_time_unix_nano,
        time_unix_nano: dp.time_unix_nano,
        attributes: attrs_to_json(&dp.attributes),
        count: Some(dp.count),
        sum: dp.sum,
        flags: dp.flags,
        ..MetricDataPoint::default()
    }
}

fn summary_point(dp: &pmetric::SummaryDataPoint) -> MetricDataPoint {
    let quantile_values = dp
        .quantile_values
        .iter()
        .map(|qv| QuantileValue {
            quantile: qv.quantile,
            value: qv.value,
        })
        .collect();

    MetricDataPoint {
        start_time_unix_nano: dp.start_time_unix_nano,
        time_unix_nano: dp.time_unix_nano,
        attributes: attrs_to_json(&dp.attributes),
        count: Some(dp.count),
        sum: Some(dp.sum),
        quantile_values,
        flags: dp.flags,
        ..MetricDataPoint::default()
    }
}

/// Concise summary for a traces batch.
pub fn traces_payload(td: &ptrace::TracesData) -> TracesPayload {
    let mut names = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for rs in &td.resource_spans {
        for ss in &rs.scope_spans {
            for span in &ss.spans {
                if seen.insert(span.name.as_str()) {
                    names.push(span.name.clone());
                }
            }
        }
    }

    TracesPayload {
        resource_spans_count: td.resource_spans.len(),
        span_count: span_count(td),
        span_names: names,
    }
}

/// Concise summary for a logs batch.
///
/// Carries at most ten bodies in first-seen order; records without a body
/// value are skipped.
pub fn logs_payload(ld: &plog::LogsData) -> LogsPayload {
    let mut bodies = Vec::new();

    'scan: for rl in &ld.resource_logs {
        for sl in &rl.scope_logs {
            for record in &sl.log_records {
                if bodies.len() >= MAX_LOG_BODIES {
                    break 'scan;
                }
                let Some(body) = record.body.as_ref().filter(|b| b.value.is_some()) else {
                    continue;
                };
                bodies.push(value_to_string(body));
            }
        }
    }

    LogsPayload {
        resource_logs_count: ld.resource_logs.len(),
        log_count: log_record_count(ld),
        bodies,
    }
}

#[cfg(test)]
#[path = "build_test.rs"]
mod tests;
