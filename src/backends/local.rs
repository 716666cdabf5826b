// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process scoring backends implemented in native Rust.

use async_trait::async_trait;

use crate::errors::BackendError;
use crate::traits::ScoringBackend;

/// Affine per-row model: `output = W · features + bias`.
///
/// A ready-to-call stand-in for an exported model when wiring up the
/// scheduler without a real inference runtime. Deterministic and pure
/// per row, so batching never changes an individual result.
pub struct LinearBackend {
    /// Row-major weights, one row per output value.
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

impl LinearBackend {
    /// Build a linear model from row-major weights and a bias vector.
    ///
    /// # Panics
    ///
    /// Panics if `weights` is empty, its rows are ragged, or `bias` does
    /// not have one entry per weight row. These are construction-time
    /// programming errors, not runtime scoring conditions.
    pub fn new(weights: Vec<Vec<f32>>, bias: Vec<f32>) -> Self {
        assert!(!weights.is_empty(), "LinearBackend needs at least one output row");
        let input_dim = weights[0].len();
        assert!(input_dim > 0, "LinearBackend needs at least one input feature");
        assert!(
            weights.iter().all(|row| row.len() == input_dim),
            "LinearBackend weight rows must all have the same length"
        );
        assert_eq!(
            bias.len(),
            weights.len(),
            "LinearBackend bias must have one entry per output row"
        );
        Self { weights, bias }
    }

    fn score_row(&self, features: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| {
                row.iter()
                    .zip(features)
                    .map(|(w, x)| w * x)
                    .sum::<f32>()
                    + b
            })
            .collect()
    }
}

#[async_trait]
impl ScoringBackend for LinearBackend {
    async fn score(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, BackendError> {
        for (row, features) in batch.iter().enumerate() {
            if features.len() != self.input_dim() {
                return Err(BackendError::RowShape {
                    row,
                    expected: self.input_dim(),
                    actual: features.len(),
                });
            }
        }
        Ok(batch.iter().map(|features| self.score_row(features)).collect())
    }

    fn input_dim(&self) -> usize {
        self.weights[0].len()
    }

    fn output_dim(&self) -> usize {
        self.weights.len()
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}
