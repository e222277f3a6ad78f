//! Matching conditions for one capture session
//!
//! A `Filter` is frozen when the session is registered. Every dimension is
//! optional: empty sets and empty strings mean "unconstrained". Dimensions
//! AND together; values inside one dimension OR together.
//!
//! Matching is per candidate, not per batch: when both a name set and an
//! attribute-name set are given, a single metric (or span, or log record)
//! must satisfy both. Exclusion sets are evaluated before inclusion and
//! reject a candidate when any listed key or name is present.
//!
//! All comparisons are exact; attribute values compare in stringified
//! form. Scans short-circuit on the first matching candidate.

use std::collections::{HashMap, HashSet};

use opentelemetry_proto::tonic::common::v1::KeyValue;
use opentelemetry_proto::tonic::logs::v1 as plog;
use opentelemetry_proto::tonic::metrics::v1 as pmetric;
use opentelemetry_proto::tonic::metrics::v1::metric::Data;
use opentelemetry_proto::tonic::trace::v1 as ptrace;

use otap_model::{SignalKind, value_to_string};

/// Matching conditions for one capture session.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Accepted signal families; empty means any.
    pub signals: HashSet<SignalKind>,
    /// Metric names to include; empty means any name.
    pub metric_names: HashSet<String>,
    /// Metric names that never match.
    pub metric_names_exclude: HashSet<String>,
    /// Span names to include; empty means any name.
    pub span_names: HashSet<String>,
    /// Span names that never match.
    pub span_names_exclude: HashSet<String>,
    /// Attribute keys of which at least one must be present somewhere on
    /// the candidate (resource, scope, data point, span, event, record).
    pub attribute_names: HashSet<String>,
    /// Attribute keys that reject the candidate wherever they appear.
    pub attribute_names_exclude: HashSet<String>,
    /// Histogram data points must have exactly this many buckets.
    pub bucket_counts_len: Option<usize>,
    /// Histogram data points must have exactly this many bounds.
    pub explicit_bounds_len: Option<usize>,
    /// Substring that must appear in the log body.
    pub log_body_contains: String,
    /// Minimum log severity; 0 means no constraint.
    pub min_severity_number: i32,
    /// Resource attributes that must all be present with equal values.
    pub resource_attributes: HashMap<String, String>,
}

impl Filter {
    /// Create an empty filter (matches every batch of every signal).
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether at least one metric in the batch matches.
    pub fn match_metrics(&self, md: &pmetric::MetricsData) -> bool {
        for rm in &md.resource_metrics {
            let resource_attrs = resource_attrs(&rm.resource);
            for sm in &rm.scope_metrics {
                let scope_attrs = scope_attrs(&sm.scope);
                for metric in &sm.metrics {
                    if self.match_metric(resource_attrs, scope_attrs, metric) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Check one metric candidate with its resource and scope context.
    pub fn match_metric(
        &self,
        resource_attrs: &[KeyValue],
        scope_attrs: &[KeyValue],
        metric: &pmetric::Metric,
    ) -> bool {
        if !self.accepts_signal(SignalKind::Metrics) {
            return false;
        }
        if !self.match_resource_attrs(resource_attrs) {
            return false;
        }
        if !self.metric_names.is_empty() && !self.metric_names.contains(&metric.name) {
            return false;
        }
        if self.metric_names_exclude.contains(&metric.name) {
            return false;
        }
        if !self.match_metric_attribute_names(resource_attrs, scope_attrs, metric) {
            return false;
        }
        self.match_histogram_shape(metric)
    }

    /// Check whether at least one span in the batch matches.
    pub fn match_traces(&self, td: &ptrace::TracesData) -> bool {
        if !self.accepts_signal(SignalKind::Traces) {
            return false;
        }

        for rs in &td.resource_spans {
            let res_attrs = resource_attrs(&rs.resource);
            if !self.match_resource_attrs(res_attrs) {
                continue;
            }
            for ss in &rs.scope_spans {
                let sc_attrs = scope_attrs(&ss.scope);
                for span in &ss.spans {
                    if !self.span_names.is_empty() && !self.span_names.contains(&span.name) {
                        continue;
                    }
                    if self.span_names_exclude.contains(&span.name) {
                        continue;
                    }
                    if !self.match_trace_attribute_names(res_attrs, sc_attrs, span) {
                        continue;
                    }
                    return true;
                }
            }
        }
        false
    }

    /// Check whether at least one log record in the batch matches.
    pub fn match_logs(&self, ld: &plog::LogsData) -> bool {
        if !self.accepts_signal(SignalKind::Logs) {
            return false;
        }

        for rl in &ld.resource_logs {
            let res_attrs = resource_attrs(&rl.resource);
            if !self.match_resource_attrs(res_attrs) {
                continue;
            }
            for sl in &rl.scope_logs {
                let sc_attrs = scope_attrs(&sl.scope);
                for record in &sl.log_records {
                    if !self.match_log_attribute_names(res_attrs, sc_attrs, &record.attributes) {
                        continue;
                    }
                    if self.min_severity_number > 0
                        && record.severity_number < self.min_severity_number
                    {
                        continue;
                    }
                    if !self.log_body_contains.is_empty()
                        && !log_body(record).contains(&self.log_body_contains)
                    {
                        continue;
                    }
                    return true;
                }
            }
        }
        false
    }

    fn accepts_signal(&self, signal: SignalKind) -> bool {
        self.signals.is_empty() || self.signals.contains(&signal)
    }

    fn match_resource_attrs(&self, attrs: &[KeyValue]) -> bool {
        self.resource_attributes.iter().all(|(key, expected)| {
            attrs
                .iter()
                .find(|kv| kv.key == *key)
                .and_then(|kv| kv.value.as_ref())
                .is_some_and(|value| value_to_string(value) == *expected)
        })
    }

    fn match_metric_attribute_names(
        &self,
        resource_attrs: &[KeyValue],
        scope_attrs: &[KeyValue],
        metric: &pmetric::Metric,
    ) -> bool {
        if contains_any_key(resource_attrs, &self.attribute_names_exclude)
            || contains_any_key(scope_attrs, &self.attribute_names_exclude)
            || data_points_contain_any_key(metric, &self.attribute_names_exclude)
        {
            return false;
        }
        if self.attribute_names.is_empty() {
            return true;
        }
        contains_any_key(resource_attrs, &self.attribute_names)
            || contains_any_key(scope_attrs, &self.attribute_names)
            || data_points_contain_any_key(metric, &self.attribute_names)
    }

    fn match_trace_attribute_names(
        &self,
        resource_attrs: &[KeyValue],
        scope_attrs: &[KeyValue],
        span: &ptrace::Span,
    ) -> bool {
        if contains_any_key(resource_attrs, &self.attribute_names_exclude)
            || contains_any_key(scope_attrs, &self.attribute_names_exclude)
            || contains_any_key(&span.attributes, &self.attribute_names_exclude)
            || span
                .events
                .iter()
                .any(|event| contains_any_key(&event.attributes, &self.attribute_names_exclude))
        {
            return false;
        }
        if self.attribute_names.is_empty() {
            return true;
        }
        contains_any_key(resource_attrs, &self.attribute_names)
            || contains_any_key(scope_attrs, &self.attribute_names)
            || contains_any_key(&span.attributes, &self.attribute_names)
            || span
                .events
                .iter()
                .any(|event| contains_any_key(&event.attributes, &self.attribute_names))
    }

    fn match_log_attribute_names(
        &self,
        resource_attrs: &[KeyValue],
        scope_attrs: &[KeyValue],
        record_attrs: &[KeyValue],
    ) -> bool {
        if contains_any_key(resource_attrs, &self.attribute_names_exclude)
            || contains_any_key(scope_attrs, &self.attribute_names_exclude)
            || contains_any_key(record_attrs, &self.attribute_names_exclude)
        {
            return false;
        }
        if self.attribute_names.is_empty() {
            return true;
        }
        contains_any_key(resource_attrs, &self.attribute_names)
            || contains_any_key(scope_attrs, &self.attribute_names)
            || contains_any_key(record_attrs, &self.attribute_names)
    }

    fn match_histogram_shape(&self, metric: &pmetric::Metric) -> bool {
        if self.bucket_counts_len.is_none() && self.explicit_bounds_len.is_none() {
            return true;
        }
        let Some(Data::Histogram(histogram)) = &metric.data else {
            return false;
        };

        histogram.data_points.iter().any(|dp| {
            self.bucket_counts_len
                .is_none_or(|len| dp.bucket_counts.len() == len)
                && self
                    .explicit_bounds_len
                    .is_none_or(|len| dp.explicit_bounds.len() == len)
        })
    }
}

fn resource_attrs(
    resource: &Option<opentelemetry_proto::tonic::resource::v1::Resource>,
) -> &[KeyValue] {
    resource.as_ref().map(|r| r.attributes.as_slice()).unwrap_or(&[])
}

fn scope_attrs(
    scope: &Option<opentelemetry_proto::tonic::common::v1::InstrumentationScope>,
) -> &[KeyValue] {
    scope.as_ref().map(|s| s.attributes.as_slice()).unwrap_or(&[])
}

fn log_body(record: &plog::LogRecord) -> String {
    record.body.as_ref().map(value_to_string).unwrap_or_default()
}

fn contains_any_key(attrs: &[KeyValue], keys: &HashSet<String>) -> bool {
    if keys.is_empty() {
        return false;
    }
    attrs.iter().any(|kv| keys.contains(&kv.key))
}

fn data_points_contain_any_key(metric: &pmetric::Metric, keys: &HashSet<String>) -> bool {
    if keys.is_empty() {
        return false;
    }
    match &metric.data {
        None => false,
        Some(Data::Gauge(gauge)) => gauge
            .data_points
            .iter()
            .any(|dp| contains_any_key(&dp.attributes, keys)),
        Some(Data::Sum(sum)) => sum
            .data_points
            .iter()
            .any(|dp| contains_any_key(&dp.attributes, keys)),
        Some(Data::Histogram(histogram)) => histogram
            .data_points
            .iter()
            .any(|dp| contains_any_key(&dp.attributes, keys)),
        Some(Data::ExponentialHistogram(histogram)) => histogram
            .data_points
            .iter()
            .any(|dp| contains_any_key(&dp.attributes, keys)),
        Some(Data::Summary(summary)) => summary
            .data_points
            .iter()
            .any(|dp| contains_any_key(&dp.attributes, keys)),
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
