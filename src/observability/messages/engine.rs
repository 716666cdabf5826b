// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for batch worker lifecycle and dispatch events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// Batch worker loop started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct WorkerStarted {
    pub backend: &'static str,
    pub max_batch_size: usize,
}

impl Display for WorkerStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Batch worker started for backend '{}', max_batch_size={}",
            self.backend, self.max_batch_size
        )
    }
}

impl StructuredLog for WorkerStarted {
    fn log(&self) {
        tracing::info!(
            backend = self.backend,
            max_batch_size = self.max_batch_size,
            "{}",
            self
        );
    }
}

/// Batch worker loop exited.
///
/// # Log Level
/// `info!` - Important operational event
pub struct WorkerStopped {
    pub backend: &'static str,
    pub batches_dispatched: u64,
}

impl Display for WorkerStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Batch worker for backend '{}' stopped after {} batches",
            self.backend, self.batches_dispatched
        )
    }
}

impl StructuredLog for WorkerStopped {
    fn log(&self) {
        tracing::info!(
            backend = self.backend,
            batches_dispatched = self.batches_dispatched,
            "{}",
            self
        );
    }
}

/// A backend invocation failed; the whole batch is dropped.
///
/// # Log Level
/// `warn!` - Degraded but recoverable; the worker continues
pub struct BackendCallFailed<'a> {
    pub backend: &'static str,
    pub batch_size: usize,
    pub error: &'a dyn std::error::Error,
}

impl Display for BackendCallFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Backend '{}' failed for a batch of {}: {} (dropping batch)",
            self.backend, self.batch_size, self.error
        )
    }
}

impl StructuredLog for BackendCallFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            backend = self.backend,
            batch_size = self.batch_size,
            error = %self.error,
            "{}",
            self
        );
    }
}

/// A backend returned a different number of rows than it was given.
///
/// Treated exactly like an invocation failure: no result of the batch can
/// be trusted to line up with its request, so all of it is dropped.
///
/// # Log Level
/// `error!` - Contract violation by the backend
pub struct BackendRowCountMismatch {
    pub backend: &'static str,
    pub expected: usize,
    pub actual: usize,
}

impl Display for BackendRowCountMismatch {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Backend '{}' returned {} rows for a batch of {} (dropping batch)",
            self.backend, self.actual, self.expected
        )
    }
}

impl StructuredLog for BackendRowCountMismatch {
    fn log(&self) {
        tracing::error!(
            backend = self.backend,
            expected = self.expected,
            actual = self.actual,
            "{}",
            self
        );
    }
}

/// A result arrived after its caller had already given up waiting.
///
/// # Log Level
/// `debug!` - Expected under caller timeouts, useful when tuning them
pub struct OrphanedResult {
    pub correlation_id: u64,
}

impl Display for OrphanedResult {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Result for request {} discarded: caller no longer waiting",
            self.correlation_id
        )
    }
}

impl StructuredLog for OrphanedResult {
    fn log(&self) {
        tracing::debug!(correlation_id = self.correlation_id, "{}", self);
    }
}
