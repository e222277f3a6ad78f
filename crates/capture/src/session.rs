//! A single active capture stream
//!
//! Each session owns a bounded envelope queue. `emit` is on the pipeline
//! hot path: it never blocks, and when the queue is full it drops the
//! envelope and counts the drop instead of applying backpressure.
//!
//! Emits serialize through the sender lock, which is what makes
//! `batch_index` strictly increasing: the index is read and written back
//! under the same critical section as the enqueue.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;

use otap_model::{Envelope, Payload, SignalKind};

use crate::filter::Filter;

/// Queue capacity used when the register request does not size one
pub(crate) const DEFAULT_BUFFER_SIZE: usize = 32;

/// Outcome of one non-blocking emit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emit {
    /// The envelope was enqueued.
    pub streamed: bool,
    /// The session is finished (cap reached, closed, or consumer gone).
    pub completed: bool,
}

/// A single active capture stream.
#[derive(Debug)]
pub struct Session {
    id: String,
    filter: Filter,
    verbose_metrics: bool,
    max_batches: u64,

    /// Taken on close so consumers observe end-of-stream.
    sender: Mutex<Option<mpsc::Sender<Envelope>>>,
    done: CancellationToken,

    sent_batches: AtomicU64,
    dropped_batches: AtomicU64,
}

impl Session {
    pub(crate) fn new(
        id: String,
        filter: Filter,
        verbose_metrics: bool,
        max_batches: u64,
        buffer_size: usize,
    ) -> (Self, mpsc::Receiver<Envelope>) {
        let buffer_size = if buffer_size == 0 {
            DEFAULT_BUFFER_SIZE
        } else {
            buffer_size
        };
        let (sender, receiver) = mpsc::channel(buffer_size);

        let session = Self {
            id,
            filter,
            verbose_metrics,
            max_batches,
            sender: Mutex::new(Some(sender)),
            done: CancellationToken::new(),
            sent_batches: AtomicU64::new(0),
            dropped_batches: AtomicU64::new(0),
        };
        (session, receiver)
    }

    /// Immutable session identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Filter snapshot frozen at registration.
    #[inline]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Whether histogram data points stream with full bucket detail.
    #[inline]
    pub fn verbose_metrics(&self) -> bool {
        self.verbose_metrics
    }

    /// Token cancelled when the session terminates.
    pub fn done(&self) -> CancellationToken {
        self.done.child_token()
    }

    /// Number of successfully streamed batches.
    pub fn sent_batches(&self) -> u64 {
        self.sent_batches.load(Ordering::Relaxed)
    }

    /// Number of batches dropped due to a full queue.
    pub fn dropped_batches(&self) -> u64 {
        self.dropped_batches.load(Ordering::Relaxed)
    }

    /// Try to enqueue one envelope without blocking.
    ///
    /// Reaching `max_batches` closes the session from inside the emit.
    pub fn emit(&self, signal: SignalKind, payload: Payload) -> Emit {
        let mut sender = self.sender.lock();
        let Some(tx) = sender.as_ref() else {
            return Emit {
                streamed: false,
                completed: true,
            };
        };

        let sent = self.sent_batches.load(Ordering::Relaxed);
        let envelope = Envelope {
            session_id: self.id.clone(),
            signal,
            batch_index: sent + 1,
            captured_at: Utc::now(),
            payload,
        };

        match tx.try_send(envelope) {
            Ok(()) => {
                let sent = sent + 1;
                self.sent_batches.store(sent, Ordering::Relaxed);
                if self.max_batches > 0 && sent >= self.max_batches {
                    *sender = None;
                    self.done.cancel();
                    return Emit {
                        streamed: true,
                        completed: true,
                    };
                }
                Emit {
                    streamed: true,
                    completed: false,
                }
            }
            Err(TrySendError::Full(_)) => {
                self.dropped_batches.fetch_add(1, Ordering::Relaxed);
                Emit {
                    streamed: false,
                    completed: false,
                }
            }
            Err(TrySendError::Closed(_)) => {
                // Consumer dropped the receiver; finish the session.
                *sender = None;
                self.done.cancel();
                Emit {
                    streamed: false,
                    completed: true,
                }
            }
        }
    }

    /// End the session and release stream resources. Idempotent.
    pub fn close(&self) {
        *self.sender.lock() = None;
        self.done.cancel();
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
