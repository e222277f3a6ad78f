//! otap Capture - registry and session engine for live capture
//!
//! This crate is the concurrent core of the sidecar: it holds active
//! filter subscriptions and is invoked on every batch leaving the
//! telemetry pipeline. It provides:
//!
//! - Zero cost when no session is registered (one atomic load)
//! - Per-candidate filter evaluation with first-match short-circuit
//! - Non-blocking delivery with observable drops, never backpressure
//! - Auto-removal on batch cap, cancellation, or consumer disconnect
//!
//! # Architecture
//!
//! ```text
//! Pipeline.push_*()
//!     │
//!     ▼
//! Registry.publish_*() ◄── has_active fast path (atomic)
//!     │
//!     ├── snapshot sessions (shared lock, released before any work)
//!     ▼
//! Filter.match_*() ──→ projection ──→ Session.emit (try_send)
//!                                         │
//!                                         ▼
//!                                   HTTP streaming clients
//! ```
//!
//! The publish path never returns errors and never blocks; its only
//! failure mode is a drop, visible through the session's counters.

mod error;
mod filter;
mod registry;
mod session;

pub use error::{CaptureError, Result};
pub use filter::Filter;
pub use registry::{RegisterRequest, RegisteredSession, Registry};
pub use session::{Emit, Session};
