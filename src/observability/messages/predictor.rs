// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for predictor facade lifecycle events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Shutdown requested; the worker is being signalled and joined.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ShutdownStarted {
    pub pending_waiters: usize,
}

impl Display for ShutdownStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Predictor shutdown started, {} callers still waiting",
            self.pending_waiters
        )
    }
}

impl StructuredLog for ShutdownStarted {
    fn log(&self) {
        tracing::info!(pending_waiters = self.pending_waiters, "{}", self);
    }
}

/// The worker did not terminate within the configured join window.
///
/// # Log Level
/// `warn!` - The worker task is detached, not leaked forever; it exits
/// as soon as its current backend call returns
pub struct WorkerJoinTimedOut {
    pub waited: Duration,
}

impl Display for WorkerJoinTimedOut {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Batch worker did not stop within {:?}; detaching",
            self.waited
        )
    }
}

impl StructuredLog for WorkerJoinTimedOut {
    fn log(&self) {
        tracing::warn!(waited_ms = self.waited.as_millis() as u64, "{}", self);
    }
}
