//! Stream envelope and end-of-stream marker

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::payload::{LogsPayload, MetricsPayload, TracesPayload};
use crate::signal::SignalKind;

/// One streamed NDJSON event.
///
/// `batch_index` is a per-session monotonic tag over successfully enqueued
/// envelopes; drops consume neither an index nor a queue slot.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub session_id: String,
    pub signal: SignalKind,
    pub batch_index: u64,
    pub captured_at: DateTime<Utc>,
    pub payload: Payload,
}

/// Signal-specific envelope payload.
///
/// Traces and logs summaries are built at most once per publish call and
/// shared across every matching session, hence the `Arc` variants.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Metrics(MetricsPayload),
    Traces(Arc<TracesPayload>),
    Logs(Arc<LogsPayload>),
}

/// Final line written when a capture session ends.
#[derive(Debug, Clone, Serialize)]
pub struct StreamEnd {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub session_id: String,
    pub sent: u64,
    pub dropped: u64,
}

impl StreamEnd {
    /// Build the `end` marker for a finished session.
    pub fn new(session_id: String, sent: u64, dropped: u64) -> Self {
        Self {
            kind: "end",
            session_id,
            sent,
            dropped,
        }
    }
}
