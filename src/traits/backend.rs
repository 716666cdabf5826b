use async_trait::async_trait;

use crate::errors::BackendError;

/// Contract for an opaque, pre-loaded scoring backend.
///
/// A backend maps an ordered batch of fixed-dimension feature vectors to an
/// ordered batch of fixed-dimension output vectors, index for index:
/// `output[i]` is the score for `batch[i]`, and the output length equals the
/// input length. Loading, optimization, and file formats are the concern of
/// whatever built the backend, not of this crate.
///
/// Backends are not assumed reentrant. The engine guarantees that exactly
/// one worker invokes `score`, strictly serially, so implementations only
/// need interior mutability if they mutate state across calls.
#[async_trait]
pub trait ScoringBackend: Send + Sync {
    /// Score an ordered batch of feature vectors.
    ///
    /// Every row is guaranteed by the caller to have exactly `input_dim()`
    /// elements. Implementations must return exactly one `output_dim()`-length
    /// row per input row, in the same order.
    async fn score(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, BackendError>;

    /// Number of features per input row.
    fn input_dim(&self) -> usize;

    /// Number of values per output row.
    fn output_dim(&self) -> usize;

    fn name(&self) -> &'static str;
}
