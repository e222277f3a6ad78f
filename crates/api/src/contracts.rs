//! Request and error contracts for the capture API

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use otap_capture::Filter;
use otap_model::SignalKind;

/// Filters and limits for one on-demand capture session.
///
/// Every field except `max_batches` is optional; absent filter dimensions
/// are unconstrained.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StreamRequest {
    pub signals: Vec<SignalKind>,
    pub metric_names: Vec<String>,
    pub metric_names_exclude: Vec<String>,
    pub span_names: Vec<String>,
    pub span_names_exclude: Vec<String>,
    pub attribute_names: Vec<String>,
    pub attribute_names_exclude: Vec<String>,
    pub bucket_counts_len: Option<usize>,
    pub explicit_bounds_len: Option<usize>,
    pub log_body_contains: String,
    pub min_severity_number: i32,
    pub resource_attributes: HashMap<String, String>,
    pub verbose_metrics: bool,
    pub max_batches: i64,
    /// 0 falls back to the server default.
    pub timeout_seconds: i64,
}

impl StreamRequest {
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.max_batches <= 0 {
            return Err("max_batches must be > 0");
        }
        if self.timeout_seconds < 0 {
            return Err("timeout_seconds must be >= 0");
        }
        Ok(())
    }

    /// Freeze the request's filter dimensions into a session filter.
    pub(crate) fn filter(&self) -> Filter {
        Filter {
            signals: self.signals.iter().copied().collect(),
            metric_names: to_set(&self.metric_names),
            metric_names_exclude: to_set(&self.metric_names_exclude),
            span_names: to_set(&self.span_names),
            span_names_exclude: to_set(&self.span_names_exclude),
            attribute_names: to_set(&self.attribute_names),
            attribute_names_exclude: to_set(&self.attribute_names_exclude),
            bucket_counts_len: self.bucket_counts_len,
            explicit_bounds_len: self.explicit_bounds_len,
            log_body_contains: self.log_body_contains.clone(),
            min_severity_number: self.min_severity_number,
            resource_attributes: self.resource_attributes.clone(),
        }
    }
}

fn to_set(values: &[String]) -> std::collections::HashSet<String> {
    values.iter().cloned().collect()
}

/// Serialized body for API-level failures.
#[derive(Debug, Clone, Serialize)]
pub struct StreamError {
    pub error: String,
}

#[cfg(test)]
#[path = "contracts_test.rs"]
mod tests;
