//! Batch worker: the single background loop that owns the scoring backend.
//!
//! The worker is the only task that ever invokes the backend, which keeps
//! invocations strictly sequential for backends that are not reentrant. Each
//! iteration suspends on the ingress channel until at least one request
//! arrives, then greedily drains whatever else is already queued — up to the
//! configured maximum batch size — and scores the whole batch in one call.
//! Requests that happened to arrive together ride along "for free"; nobody
//! waits for a batch to fill.
//!
//! A failed invocation condemns the whole batch: every member's completion
//! slot is dropped so its caller resolves to "no result" immediately, the
//! failure is logged, and the loop continues after a short backoff. The
//! worker never terminates because of a backend error; it exits only on
//! cancellation or when the facade side of the queue is gone.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::engine::results::PendingResults;
use crate::observability::messages::engine::{
    BackendCallFailed, BackendRowCountMismatch, OrphanedResult, WorkerStarted, WorkerStopped,
};
use crate::observability::messages::StructuredLog;
use crate::traits::ScoringBackend;

/// A request as it travels through the ingress queue.
pub(crate) struct QueuedRequest {
    pub id: u64,
    pub features: Vec<f32>,
}

pub(crate) struct BatchWorker {
    backend: Arc<dyn ScoringBackend>,
    queue: mpsc::UnboundedReceiver<QueuedRequest>,
    pending: Arc<PendingResults>,
    max_batch_size: usize,
    failure_backoff: Duration,
    cancel: CancellationToken,
}

impl BatchWorker {
    pub fn new(
        backend: Arc<dyn ScoringBackend>,
        queue: mpsc::UnboundedReceiver<QueuedRequest>,
        pending: Arc<PendingResults>,
        max_batch_size: usize,
        failure_backoff: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            backend,
            queue,
            pending,
            max_batch_size,
            failure_backoff,
            cancel,
        }
    }

    pub async fn run(mut self) {
        WorkerStarted {
            backend: self.backend.name(),
            max_batch_size: self.max_batch_size,
        }
        .log();

        let mut batches_dispatched = 0u64;

        loop {
            // Suspend until a request arrives or shutdown is signalled.
            // `biased` checks cancellation first so a shutdown issued between
            // batches never starts another backend call.
            let first = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                request = self.queue.recv() => match request {
                    Some(request) => request,
                    None => break, // facade dropped, nothing will ever arrive
                },
            };

            let mut batch = Vec::with_capacity(self.max_batch_size);
            batch.push(first);
            while batch.len() < self.max_batch_size {
                match self.queue.try_recv() {
                    Ok(request) => batch.push(request),
                    Err(_) => break,
                }
            }

            self.dispatch(batch).await;
            batches_dispatched += 1;
        }

        // Refuse new requests, then wake every caller still waiting. Anything
        // left in the queue at this point will never be scored.
        self.queue.close();
        self.pending.clear().await;

        WorkerStopped {
            backend: self.backend.name(),
            batches_dispatched,
        }
        .log();
    }

    /// Score one assembled batch and publish its results index-for-index.
    async fn dispatch(&self, batch: Vec<QueuedRequest>) {
        let (ids, rows): (Vec<u64>, Vec<Vec<f32>>) = batch
            .into_iter()
            .map(|request| (request.id, request.features))
            .unzip();

        match self.backend.score(&rows).await {
            Ok(outputs) if outputs.len() == ids.len() => {
                // output[i] belongs to input[i]; the correlation ids carry
                // that pairing through to the per-caller slots.
                for (id, output) in ids.into_iter().zip(outputs) {
                    if !self.pending.publish(id, output).await {
                        OrphanedResult { correlation_id: id }.log();
                    }
                }
            }
            Ok(outputs) => {
                BackendRowCountMismatch {
                    backend: self.backend.name(),
                    expected: ids.len(),
                    actual: outputs.len(),
                }
                .log();
                self.drop_batch(&ids).await;
                tokio::time::sleep(self.failure_backoff).await;
            }
            Err(error) => {
                BackendCallFailed {
                    backend: self.backend.name(),
                    batch_size: ids.len(),
                    error: &error,
                }
                .log();
                self.drop_batch(&ids).await;
                tokio::time::sleep(self.failure_backoff).await;
            }
        }
    }

    /// Release the callers of a condemned batch so they stop waiting now
    /// rather than at their individual deadlines.
    async fn drop_batch(&self, ids: &[u64]) {
        for &id in ids {
            self.pending.abandon(id).await;
        }
    }
}
