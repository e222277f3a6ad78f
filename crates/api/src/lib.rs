//! otap API - HTTP surface for live capture sessions
//!
//! # Endpoints
//!
//! - `POST /v1/capture/stream` - open a capture session, stream matches as
//!   newline-delimited JSON (`application/x-ndjson`)
//! - `GET /healthz` - health check
//! - `GET /ui` - static debugging page
//! - `GET /` - redirect to `/ui`
//!
//! # Streaming contract
//!
//! A stream carries one JSON envelope per line and always terminates with
//! a `{"type":"end","session_id":...,"sent":...,"dropped":...}` line when
//! the write side is still open. Streams end on batch cap, timeout, or
//! client disconnect; the session is deregistered on every exit path.
//!
//! The router is served by the sink runtime; tests drive it directly with
//! `tower::ServiceExt::oneshot`.

mod contracts;
mod stream;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};

use otap_capture::Registry;

pub use contracts::{StreamError, StreamRequest};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<Registry>,
    /// Session lifetime applied when a request does not set one.
    pub default_session_timeout: Duration,
}

/// Build the axum router for the capture API.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(ui::root))
        .route("/ui", get(ui::page))
        .route("/healthz", get(health))
        .route("/v1/capture/stream", post(stream::stream))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
