//! Registry of active capture sessions
//!
//! The registry is consulted on every outgoing batch. The common case in
//! a running pipeline is zero subscribers, so the publish operations exit
//! on one relaxed atomic load before touching any lock.
//!
//! Locking discipline: the exclusive lock covers only session-map
//! mutation; publishing snapshots the session set under the shared lock
//! and releases it before any filter evaluation, projection, or enqueue.
//! Sessions are never closed while a registry lock is held.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use opentelemetry_proto::tonic::logs::v1 as plog;
use opentelemetry_proto::tonic::metrics::v1 as pmetric;
use opentelemetry_proto::tonic::trace::v1 as ptrace;

use otap_model::{Envelope, MetricsPayload, Payload, SignalKind, build_metric, logs_payload, traces_payload};

use crate::error::{CaptureError, Result};
use crate::filter::Filter;
use crate::session::{DEFAULT_BUFFER_SIZE, Session};

/// Session cap applied when a non-positive one is configured
const DEFAULT_MAX_SESSIONS: usize = 128;

/// Runtime knobs for creating one session.
#[derive(Debug, Clone, Default)]
pub struct RegisterRequest {
    pub filter: Filter,
    pub verbose_metrics: bool,
    /// Session ends after this many streamed batches; clamped to >= 1.
    pub max_batches: u64,
    /// Envelope queue capacity; 0 uses the registry default.
    pub buffer_size: usize,
}

/// A freshly registered session and the read end of its envelope queue.
#[derive(Debug)]
pub struct RegisteredSession {
    pub session: Arc<Session>,
    pub events: mpsc::Receiver<Envelope>,
}

/// Stores active capture sessions and routes matching telemetry batches.
#[derive(Debug)]
pub struct Registry {
    /// Widened, never shrunk, while runtimes share this registry.
    max_sessions: AtomicUsize,
    default_buffer_size: usize,

    sessions: RwLock<HashMap<String, Arc<Session>>>,

    /// Quick check flag for the publish hot path.
    has_active: AtomicBool,
}

impl Registry {
    /// Create a registry with a hard cap on active sessions.
    pub fn new(max_sessions: usize) -> Self {
        Self::with_default_buffer(max_sessions, DEFAULT_BUFFER_SIZE)
    }

    /// Create a registry with a custom fallback envelope queue capacity.
    pub fn with_default_buffer(max_sessions: usize, default_buffer_size: usize) -> Self {
        let max_sessions = if max_sessions == 0 {
            DEFAULT_MAX_SESSIONS
        } else {
            max_sessions
        };
        Self {
            max_sessions: AtomicUsize::new(max_sessions),
            default_buffer_size,
            sessions: RwLock::new(HashMap::new()),
            has_active: AtomicBool::new(false),
        }
    }

    /// True if at least one session is currently registered.
    #[inline]
    pub fn has_active_sessions(&self) -> bool {
        self.has_active.load(Ordering::Relaxed)
    }

    /// Current session cap.
    pub fn max_sessions(&self) -> usize {
        self.max_sessions.load(Ordering::Relaxed)
    }

    /// Raise the session cap to `max_sessions` if it is higher.
    pub fn widen_max_sessions(&self, max_sessions: usize) {
        self.max_sessions.fetch_max(max_sessions, Ordering::Relaxed);
    }

    /// Number of currently registered sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Create a session, removed automatically when `cancel` fires.
    pub fn register(
        self: &Arc<Self>,
        cancel: &CancellationToken,
        req: RegisterRequest,
    ) -> Result<RegisteredSession> {
        let max_batches = req.max_batches.max(1);
        let buffer_size = if req.buffer_size == 0 {
            self.default_buffer_size
        } else {
            req.buffer_size
        };

        let registered = {
            let mut sessions = self.sessions.write();
            let max_sessions = self.max_sessions.load(Ordering::Relaxed);
            if sessions.len() >= max_sessions {
                return Err(CaptureError::SessionLimitReached { max: max_sessions });
            }

            let id = Uuid::new_v4().to_string();
            let (session, events) =
                Session::new(id.clone(), req.filter, req.verbose_metrics, max_batches, buffer_size);
            let session = Arc::new(session);
            sessions.insert(id, Arc::clone(&session));
            self.has_active.store(true, Ordering::Relaxed);

            RegisteredSession { session, events }
        };

        let session = &registered.session;
        debug!(session_id = %session.id(), "capture session registered");
        self.spawn_watcher(session.id().to_owned(), cancel.clone(), session.done());

        Ok(registered)
    }

    /// Close and remove a session. Safe to call for unknown ids.
    pub fn deregister(&self, session_id: &str) {
        let session = {
            let mut sessions = self.sessions.write();
            let session = sessions.remove(session_id);
            self.has_active.store(!sessions.is_empty(), Ordering::Relaxed);
            session
        };

        // Closing happens outside the lock; close may wake consumers.
        if let Some(session) = session {
            session.close();
            debug!(session_id, "capture session removed");
        }
    }

    /// Route one metrics batch to all matching sessions.
    ///
    /// Metrics payloads are per-session: each carries only the metrics that
    /// matched that session's filter, shaped by its verbosity flag.
    pub fn publish_metrics(&self, md: &pmetric::MetricsData) {
        if !self.has_active_sessions() {
            return;
        }

        for session in self.snapshot() {
            let Some(payload) =
                matching_metrics_payload(session.filter(), session.verbose_metrics(), md)
            else {
                continue;
            };
            let outcome = session.emit(SignalKind::Metrics, Payload::Metrics(payload));
            if outcome.completed {
                self.deregister(session.id());
            }
        }
    }

    /// Route one traces batch to all matching sessions.
    ///
    /// The summary payload is built at most once and shared.
    pub fn publish_traces(&self, td: &ptrace::TracesData) {
        if !self.has_active_sessions() {
            return;
        }

        let mut payload = None;
        for session in self.snapshot() {
            if !session.filter().match_traces(td) {
                continue;
            }
            let shared = payload.get_or_insert_with(|| Arc::new(traces_payload(td)));
            let outcome = session.emit(SignalKind::Traces, Payload::Traces(Arc::clone(shared)));
            if outcome.completed {
                self.deregister(session.id());
            }
        }
    }

    /// Route one logs batch to all matching sessions.
    ///
    /// The summary payload is built at most once and shared.
    pub fn publish_logs(&self, ld: &plog::LogsData) {
        if !self.has_active_sessions() {
            return;
        }

        let mut payload = None;
        for session in self.snapshot() {
            if !session.filter().match_logs(ld) {
                continue;
            }
            let shared = payload.get_or_insert_with(|| Arc::new(logs_payload(ld)));
            let outcome = session.emit(SignalKind::Logs, Payload::Logs(Arc::clone(shared)));
            if outcome.completed {
                self.deregister(session.id());
            }
        }
    }

    fn snapshot(&self) -> Vec<Arc<Session>> {
        self.sessions.read().values().map(Arc::clone).collect()
    }

    fn spawn_watcher(
        self: &Arc<Self>,
        session_id: String,
        cancel: CancellationToken,
        done: CancellationToken,
    ) {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = done.cancelled() => {}
            }
            registry.deregister(&session_id);
        });
    }
}

/// Project the metrics that individually match `filter` into a payload.
///
/// Returns `None` when nothing matched; non-matching neighbours in the
/// same scope are never included.
fn matching_metrics_payload(
    filter: &Filter,
    verbose: bool,
    md: &pmetric::MetricsData,
) -> Option<MetricsPayload> {
    let mut payload = MetricsPayload::default();

    for rm in &md.resource_metrics {
        let resource_attrs = rm
            .resource
            .as_ref()
            .map(|r| r.attributes.as_slice())
            .unwrap_or(&[]);
        let mut resource_matched = false;

        for sm in &rm.scope_metrics {
            let scope_attrs = sm
                .scope
                .as_ref()
                .map(|s| s.attributes.as_slice())
                .unwrap_or(&[]);
            for metric in &sm.metrics {
                if !filter.match_metric(resource_attrs, scope_attrs, metric) {
                    continue;
                }
                payload
                    .metrics
                    .push(build_metric(resource_attrs, sm.scope.as_ref(), metric, verbose));
                payload.metric_count += 1;
                resource_matched = true;
            }
        }

        if resource_matched {
            payload.resource_metrics_count += 1;
        }
    }

    (payload.metric_count > 0).then_some(payload)
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
