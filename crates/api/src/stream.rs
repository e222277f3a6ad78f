//! NDJSON streaming handler
//!
//! The handler registers a session, hands the response a streaming body,
//! and drains the session's envelope queue from a background task. The
//! drain ends on the effective timeout, the queue closing (cap reached),
//! cancellation, or the client going away, writes the final `end` line if
//! the client is still there, and deregisters the session.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use futures::stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use otap_capture::{CaptureError, RegisterRequest, RegisteredSession, Registry};
use otap_model::StreamEnd;

use crate::ApiState;
use crate::contracts::{StreamError, StreamRequest};

/// NDJSON lines buffered between the drain task and the response body
const LINE_CHANNEL_CAPACITY: usize = 16;

pub(crate) async fn stream(
    State(state): State<ApiState>,
    body: Result<Json<StreamRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = body else {
        return error_response(StatusCode::BAD_REQUEST, "invalid JSON body");
    };
    if let Err(message) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, message);
    }

    let timeout = if req.timeout_seconds > 0 {
        Duration::from_secs(req.timeout_seconds as u64)
    } else {
        state.default_session_timeout
    };

    let cancel = CancellationToken::new();
    let registered = state.registry.register(
        &cancel,
        RegisterRequest {
            filter: req.filter(),
            verbose_metrics: req.verbose_metrics,
            max_batches: req.max_batches as u64,
            buffer_size: req.max_batches as usize,
        },
    );
    let registered = match registered {
        Ok(registered) => registered,
        Err(error @ CaptureError::SessionLimitReached { .. }) => {
            cancel.cancel();
            return error_response(StatusCode::TOO_MANY_REQUESTS, &error.to_string());
        }
    };

    let (line_tx, mut line_rx) = mpsc::channel::<Bytes>(LINE_CHANNEL_CAPACITY);
    tokio::spawn(drain_session(
        Arc::clone(&state.registry),
        registered,
        cancel,
        timeout,
        line_tx,
    ));

    let body = Body::from_stream(
        stream::poll_fn(move |cx| line_rx.poll_recv(cx)).map(Ok::<_, Infallible>),
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/x-ndjson"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
        .into_response()
}

/// Forward envelopes to the client until the session ends, then write the
/// end marker and deregister.
async fn drain_session(
    registry: Arc<Registry>,
    registered: RegisteredSession,
    cancel: CancellationToken,
    timeout: Duration,
    lines: mpsc::Sender<Bytes>,
) {
    let RegisteredSession { session, mut events } = registered;
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = &mut deadline => break,
            _ = lines.closed() => {
                debug!(session_id = %session.id(), "client disconnected");
                break;
            }
            event = events.recv() => {
                let Some(envelope) = event else { break };
                let line = match encode_line(&envelope) {
                    Ok(line) => line,
                    Err(error) => {
                        debug!(session_id = %session.id(), %error, "failed to encode capture event");
                        break;
                    }
                };
                if lines.send(line).await.is_err() {
                    debug!(session_id = %session.id(), "client disconnected mid-stream");
                    break;
                }
            }
        }
    }

    // Write the end marker when the client is still listening; a closed
    // line channel means it already went away.
    let end = StreamEnd::new(
        session.id().to_owned(),
        session.sent_batches(),
        session.dropped_batches(),
    );
    if let Ok(line) = encode_line(&end) {
        let _ = lines.send(line).await;
    }

    cancel.cancel();
    registry.deregister(session.id());
}

fn encode_line<T: serde::Serialize>(value: &T) -> serde_json::Result<Bytes> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    Ok(Bytes::from(line))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(StreamError {
            error: message.to_owned(),
        }),
    )
        .into_response()
}
