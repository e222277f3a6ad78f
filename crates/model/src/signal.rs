//! Signal families recognized by the capture pipeline

use std::fmt;

use serde::{Deserialize, Serialize};

/// One OpenTelemetry signal family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Metrics,
    Traces,
    Logs,
}

impl SignalKind {
    /// Stable lowercase name, identical to the wire encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Metrics => "metrics",
            SignalKind::Traces => "traces",
            SignalKind::Logs => "logs",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
