//! otap Sink - pipeline attachment for live capture
//!
//! The telemetry pipeline instantiates the capture sink once per signal
//! (metrics, traces, logs) with the same configuration. All attachments
//! on one bind address must share a single registry - a subscriber to
//! "metrics or logs" has to see both - and a single HTTP server, so the
//! address is not contended. This crate provides that sharing:
//!
//! ```text
//! CaptureSink (metrics) ──┐
//! CaptureSink (traces) ───┼──→ CaptureRuntime { Registry, HTTP server }
//! CaptureSink (logs) ─────┘         │
//!                                   └── RuntimeIndex (addr → runtime, refcounted)
//! ```
//!
//! The last sink released on an address shuts its server down and drops
//! the runtime from the index.

mod config;
mod runtime;
mod sink;

pub use config::{ConfigError, SinkConfig};
pub use runtime::{CaptureRuntime, RuntimeIndex};
pub use sink::CaptureSink;
