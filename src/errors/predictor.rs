// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors surfaced synchronously by the predictor facade.
///
/// Note the asymmetry with timeouts: a request that times out or is caught
/// by shutdown resolves to `Ok(None)`, never to a `PredictorError`. Only
/// requests that can be rejected before enqueueing produce an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictorError {
    /// The submitted feature vector does not match the backend's input
    /// dimension. Rejected at submit time, never enqueued.
    #[error("feature vector has {actual} dimensions, backend expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}
