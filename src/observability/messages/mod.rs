// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for human-readable output and
//! `StructuredLog` to emit itself at its intended level with structured
//! fields attached.
//!
//! # Usage Pattern
//!
//! ```rust
//! use batchwise::observability::messages::engine::WorkerStarted;
//! use batchwise::observability::messages::StructuredLog;
//!
//! let msg = WorkerStarted {
//!     backend: "stub",
//!     max_batch_size: 32,
//! };
//!
//! msg.log();
//! ```

pub mod engine;
pub mod predictor;

/// Emit a message at its intended log level with structured fields.
pub trait StructuredLog {
    fn log(&self);
}
