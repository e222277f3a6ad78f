//! otap Model - wire types for live capture streams
//!
//! This crate defines everything that crosses the NDJSON stream boundary:
//! the envelope wrapping each captured batch, the end-of-stream marker, and
//! the per-signal payload projections. It also owns the conversion rules
//! from OTLP attribute values into plain JSON.
//!
//! Projections are deliberately asymmetric:
//!
//! - Metrics are projected element-wise (one [`Metric`] entry per matched
//!   metric, with resource and scope context inlined).
//! - Traces and logs are projected as whole-batch summaries; the payload
//!   describes the batch, the filter only decides whether to emit it.
//!
//! Nothing in this crate knows about filters or sessions - the builders
//! here are pure functions over borrowed OTLP batches.

mod attrs;
mod build;
mod envelope;
mod payload;
mod signal;
pub mod testing;

pub use attrs::{attrs_to_json, value_to_json, value_to_string};
pub use build::{build_metric, logs_payload, traces_payload};
pub use envelope::{Envelope, Payload, StreamEnd};
pub use payload::{
    LogsPayload, Metric, MetricDataPoint, MetricsPayload, QuantileValue, Scope, TracesPayload,
};
pub use signal::SignalKind;
