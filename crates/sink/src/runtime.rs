//! Process-wide shared capture runtime
//!
//! One `CaptureRuntime` per bind address: the registry plus the HTTP
//! server serving it. Runtimes live in a reference-counted index so the
//! three per-signal pipeline attachments share one instance; the index is
//! injectable so tests never leak global state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use otap_api::{ApiState, build_router};
use otap_capture::Registry;

use crate::config::SinkConfig;

static GLOBAL_RUNTIMES: LazyLock<Arc<RuntimeIndex>> =
    LazyLock::new(|| Arc::new(RuntimeIndex::new()));

/// Address-keyed index of shared capture runtimes.
#[derive(Debug, Default)]
pub struct RuntimeIndex {
    runtimes: Mutex<HashMap<String, Arc<CaptureRuntime>>>,
}

impl RuntimeIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide index used by real pipeline attachments.
    pub fn global() -> Arc<RuntimeIndex> {
        Arc::clone(&GLOBAL_RUNTIMES)
    }

    /// Get or create the runtime for `cfg.http_addr` and take a reference
    /// on it.
    ///
    /// A later acquisition asking for more concurrent sessions widens the
    /// existing registry's cap; the cap never shrinks mid-life.
    pub fn acquire(&self, cfg: &SinkConfig) -> Arc<CaptureRuntime> {
        let mut runtimes = self.runtimes.lock();
        let runtime = runtimes
            .entry(cfg.http_addr.clone())
            .or_insert_with(|| Arc::new(CaptureRuntime::new(cfg.clone())))
            .clone();
        runtime.registry.widen_max_sessions(cfg.max_concurrent_sessions);
        runtime.refs.fetch_add(1, Ordering::AcqRel);
        runtime
    }

    /// Number of live runtimes.
    pub fn len(&self) -> usize {
        self.runtimes.lock().len()
    }

    /// True when no runtime is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, addr: &str) {
        self.runtimes.lock().remove(addr);
    }
}

/// One registry plus one HTTP server, shared by every sink on an address.
#[derive(Debug)]
pub struct CaptureRuntime {
    cfg: SinkConfig,
    registry: Arc<Registry>,

    refs: AtomicI64,
    started: AtomicBool,
    shutdown: CancellationToken,
    server: Mutex<Option<JoinHandle<()>>>,
}

impl CaptureRuntime {
    fn new(cfg: SinkConfig) -> Self {
        let registry = Arc::new(Registry::with_default_buffer(
            cfg.max_concurrent_sessions,
            cfg.session_buffer_size,
        ));
        Self {
            cfg,
            registry,
            refs: AtomicI64::new(0),
            started: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
            server: Mutex::new(None),
        }
    }

    /// Registry shared by all attachments on this address.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Launch the HTTP server exactly once.
    ///
    /// Bind or serve failures are logged, not propagated: the pipeline
    /// keeps flowing even when the capture API is unavailable.
    pub fn start(&self) {
        if self.started.swap(true, Ordering::AcqRel) {
            return;
        }

        let addr = self.cfg.bind_address();
        let state = ApiState {
            registry: Arc::clone(&self.registry),
            default_session_timeout: self.cfg.default_session_timeout,
        };
        let shutdown = self.shutdown.clone();

        let handle = tokio::spawn(async move {
            let listener = match TcpListener::bind(&addr).await {
                Ok(listener) => listener,
                Err(err) => {
                    error!(%addr, error = %err, "capture API failed to bind");
                    return;
                }
            };
            info!(%addr, "capture API listening");

            let app = build_router(state);
            if let Err(err) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
            {
                error!(%addr, error = %err, "capture API server failed");
            }
        });
        *self.server.lock() = Some(handle);
    }

    /// Drop one reference; the last release shuts the server down and
    /// removes the runtime from `index`. `cancel` bounds how long the
    /// shutdown waits for the server task.
    pub async fn release(&self, index: &RuntimeIndex, cancel: CancellationToken) {
        if self.refs.fetch_sub(1, Ordering::AcqRel) > 1 {
            return;
        }

        self.shutdown.cancel();
        index.remove(&self.cfg.http_addr);

        let handle = self.server.lock().take();
        if let Some(handle) = handle {
            tokio::select! {
                _ = handle => {}
                _ = cancel.cancelled() => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "runtime_test.rs"]
mod tests;
