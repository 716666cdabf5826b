// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors a scoring backend can report for a batch invocation.
///
/// A `BackendError` always condemns the whole batch: the worker drops every
/// member request and the affected callers resolve to "no result". The
/// worker itself survives any of these.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The underlying model/session rejected or failed the invocation.
    #[error("backend invocation failed: {0}")]
    InvocationFailed(String),

    /// A row did not match the backend's declared input dimension.
    ///
    /// Backends may rely on the facade's submit-time validation and never
    /// raise this; it exists for backends that re-check their inputs.
    #[error("row {row} has {actual} features, backend expects {expected}")]
    RowShape {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// File I/O error while a backend loads auxiliary data.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
