//! Terminal pipeline sink feeding the capture registry

use std::sync::Arc;

use opentelemetry_proto::tonic::logs::v1::LogsData;
use opentelemetry_proto::tonic::metrics::v1::MetricsData;
use opentelemetry_proto::tonic::trace::v1::TracesData;
use tokio_util::sync::CancellationToken;

use otap_capture::Registry;

use crate::config::{ConfigError, SinkConfig};
use crate::runtime::{CaptureRuntime, RuntimeIndex};

/// Terminal sink handed to the pipeline, one instance per signal.
///
/// The push operations never fail, never block, and treat the batch as
/// read-only; with no active session they cost one atomic load.
pub struct CaptureSink {
    index: Arc<RuntimeIndex>,
    runtime: Arc<CaptureRuntime>,
}

impl CaptureSink {
    /// Create a sink against the process-wide runtime index.
    pub fn new(cfg: &SinkConfig) -> Result<Self, ConfigError> {
        Self::with_index(RuntimeIndex::global(), cfg)
    }

    /// Create a sink against a caller-owned index (test isolation).
    pub fn with_index(index: Arc<RuntimeIndex>, cfg: &SinkConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let runtime = index.acquire(cfg);
        Ok(Self { index, runtime })
    }

    /// Registry shared with every sink on the same address.
    pub fn registry(&self) -> &Arc<Registry> {
        self.runtime.registry()
    }

    /// Launch the shared HTTP server; idempotent across attachments.
    pub fn start(&self) {
        self.runtime.start();
    }

    /// Release this attachment; the last one shuts the server down.
    pub async fn shutdown(&self, cancel: CancellationToken) {
        self.runtime.release(&self.index, cancel).await;
    }

    /// Route one metrics batch to matching sessions.
    pub fn push_metrics(&self, md: &MetricsData) {
        self.runtime.registry().publish_metrics(md);
    }

    /// Route one traces batch to matching sessions.
    pub fn push_traces(&self, td: &TracesData) {
        self.runtime.registry().publish_traces(td);
    }

    /// Route one logs batch to matching sessions.
    pub fn push_logs(&self, ld: &LogsData) {
        self.runtime.registry().publish_logs(ld);
    }
}

#[cfg(test)]
#[path = "sink_test.rs"]
mod tests;
