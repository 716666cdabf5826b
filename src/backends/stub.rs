// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Test and placeholder backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::BackendError;
use crate::traits::ScoringBackend;

/// Pure per-row backend for tests: `output = [sum(features), max(features)]`.
///
/// Records every invocation so tests can assert on how requests were
/// coalesced into batches.
pub struct StubBackend {
    input_dim: usize,
    batch_sizes: Mutex<Vec<usize>>,
    calls: AtomicUsize,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::with_input_dim(3)
    }

    pub fn with_input_dim(input_dim: usize) -> Self {
        Self {
            input_dim,
            batch_sizes: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of backend invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Batch size of each invocation, in invocation order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().expect("batch_sizes lock poisoned").clone()
    }

    /// The per-row function this backend applies, usable directly by tests.
    pub fn expected_output(features: &[f32]) -> Vec<f32> {
        let sum: f32 = features.iter().sum();
        let max = features.iter().cloned().fold(f32::MIN, f32::max);
        vec![sum, max]
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScoringBackend for StubBackend {
    async fn score(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batch_sizes
            .lock()
            .expect("batch_sizes lock poisoned")
            .push(batch.len());
        Ok(batch
            .iter()
            .map(|features| Self::expected_output(features))
            .collect())
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// A backend that always fails, for exercising drop-batch behavior.
pub struct FailingBackend {
    input_dim: usize,
}

impl FailingBackend {
    pub fn new(input_dim: usize) -> Self {
        Self { input_dim }
    }
}

#[async_trait]
impl ScoringBackend for FailingBackend {
    async fn score(&self, _batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, BackendError> {
        Err(BackendError::InvocationFailed(
            "simulated backend failure".to_string(),
        ))
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Delays every invocation before delegating, for timeout tests.
pub struct SlowBackend<B> {
    inner: B,
    delay: Duration,
}

impl<B: ScoringBackend> SlowBackend<B> {
    pub fn new(inner: B, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl<B: ScoringBackend> ScoringBackend for SlowBackend<B> {
    async fn score(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, BackendError> {
        tokio::time::sleep(self.delay).await;
        self.inner.score(batch).await
    }

    fn input_dim(&self) -> usize {
        self.inner.input_dim()
    }

    fn output_dim(&self) -> usize {
        self.inner.output_dim()
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}
