// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Predictor facade: the public submit/shutdown surface of the scheduler.
//!
//! The facade ties the ingress queue, the batch worker, and the
//! pending-result store together. Any number of callers may `submit`
//! concurrently; each waits on its own completion slot, so callers never
//! contend with each other while waiting and can never observe someone
//! else's result.
//!
//! # Timeout semantics
//!
//! A timeout is not an error. `submit` returns `Ok(None)` when the deadline
//! passes, when the backend fails for the batch carrying the request, or
//! when shutdown wins the race. `Err` is reserved for requests that are
//! rejected before they are enqueued (currently: dimension validation).
//! A timed-out request is not retracted from the queue — the worker may
//! still score it — but the late result finds no slot and is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::PredictorConfig;
use crate::engine::results::PendingResults;
use crate::engine::worker::{BatchWorker, QueuedRequest};
use crate::errors::PredictorError;
use crate::observability::messages::predictor::{ShutdownStarted, WorkerJoinTimedOut};
use crate::observability::messages::StructuredLog;
use crate::traits::ScoringBackend;

/// Micro-batching scheduler around a single scoring backend.
///
/// Construction spawns the batch worker, so a `Predictor` must be created
/// inside a tokio runtime. The backend is assumed loaded and ready; the
/// worker starts pulling from the ingress queue immediately.
pub struct Predictor {
    backend: Arc<dyn ScoringBackend>,
    queue: mpsc::UnboundedSender<QueuedRequest>,
    pending: Arc<PendingResults>,
    next_correlation_id: AtomicU64,
    cancel: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
    shutdown_timeout: Duration,
}

impl Predictor {
    /// Create a predictor with the given batch bound and default tuning.
    ///
    /// `max_batch_size` is clamped to a minimum of 1.
    pub fn new(backend: Arc<dyn ScoringBackend>, max_batch_size: usize) -> Self {
        let config = PredictorConfig {
            max_batch_size,
            ..PredictorConfig::default()
        };
        Self::with_config(backend, config)
    }

    /// Create a predictor from a full [`PredictorConfig`].
    pub fn with_config(backend: Arc<dyn ScoringBackend>, config: PredictorConfig) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let pending = Arc::new(PendingResults::new());
        let cancel = CancellationToken::new();

        let worker = BatchWorker::new(
            backend.clone(),
            queue_rx,
            pending.clone(),
            config.max_batch_size.max(1), // ensure at least 1
            config.failure_backoff(),
            cancel.clone(),
        );
        let handle = tokio::spawn(worker.run());

        Self {
            backend,
            queue: queue_tx,
            pending,
            next_correlation_id: AtomicU64::new(0),
            cancel,
            worker: Mutex::new(Some(handle)),
            shutdown_timeout: config.shutdown_timeout(),
        }
    }

    /// Feature dimension accepted by `submit`.
    pub fn input_dim(&self) -> usize {
        self.backend.input_dim()
    }

    /// Length of the output rows returned by `submit`.
    pub fn output_dim(&self) -> usize {
        self.backend.output_dim()
    }

    /// Score one feature vector, waiting up to `timeout` for the result.
    ///
    /// Returns `Ok(Some(output))` when the result arrives in time,
    /// `Ok(None)` on timeout, backend failure, or shutdown, and
    /// `Err(PredictorError::DimensionMismatch)` when `features` does not
    /// match the backend's input dimension (the request is never enqueued).
    pub async fn submit(
        &self,
        features: Vec<f32>,
        timeout: Duration,
    ) -> Result<Option<Vec<f32>>, PredictorError> {
        let expected = self.backend.input_dim();
        if features.len() != expected {
            return Err(PredictorError::DimensionMismatch {
                expected,
                actual: features.len(),
            });
        }

        if self.cancel.is_cancelled() {
            return Ok(None);
        }

        // Fresh monotonic id: unique among outstanding requests for the
        // lifetime of this facade.
        let id = self.next_correlation_id.fetch_add(1, Ordering::Relaxed);

        let (slot, result) = oneshot::channel();
        self.pending.register(id, slot).await;

        if self.queue.send(QueuedRequest { id, features }).is_err() {
            // Worker already exited; reclaim the slot we just registered.
            self.pending.abandon(id).await;
            return Ok(None);
        }

        match tokio::time::timeout(timeout, result).await {
            Ok(Ok(output)) => Ok(Some(output)),
            // Slot dropped: the batch failed or shutdown released us.
            Ok(Err(_)) => Ok(None),
            Err(_elapsed) => {
                // Deadline passed. Abandon our slot so a late result is
                // discarded instead of accumulating.
                self.pending.abandon(id).await;
                Ok(None)
            }
        }
    }

    /// Stop the batch worker and release every waiting caller.
    ///
    /// Signals cancellation, then waits up to the configured join window
    /// for the worker task to finish. An in-flight backend call is allowed
    /// to complete (its callers may still receive results); requests still
    /// queued behind it are never scored and resolve to "no result".
    /// Idempotent: later calls return immediately.
    pub async fn shutdown(&self) {
        ShutdownStarted {
            pending_waiters: self.pending.len().await,
        }
        .log();

        self.cancel.cancel();

        let handle = self.worker.lock().await.take();
        if let Some(handle) = handle {
            if tokio::time::timeout(self.shutdown_timeout, handle)
                .await
                .is_err()
            {
                WorkerJoinTimedOut {
                    waited: self.shutdown_timeout,
                }
                .log();
            }
        }
    }
}
