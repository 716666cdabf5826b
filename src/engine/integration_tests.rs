//! End-to-end tests for the predictor facade and batch worker.
//!
//! Batching behavior is made deterministic with a gated backend: the worker
//! blocks inside `score` until the test releases a permit, so the test
//! controls exactly which requests are queued when each batch is assembled.
//! No test depends on requests racing a wall-clock window.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::backends::stub::{FailingBackend, SlowBackend, StubBackend};
use crate::config::PredictorConfig;
use crate::engine::Predictor;
use crate::errors::{BackendError, PredictorError};
use crate::traits::ScoringBackend;

/// Stub backend whose invocations block until the test releases them.
struct GatedBackend {
    inner: StubBackend,
    gate: Semaphore,
}

impl GatedBackend {
    fn new() -> Self {
        Self {
            inner: StubBackend::new(),
            gate: Semaphore::new(0),
        }
    }

    /// Allow `n` further invocations to proceed.
    fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    fn batch_sizes(&self) -> Vec<usize> {
        self.inner.batch_sizes()
    }

    fn calls(&self) -> usize {
        self.inner.calls()
    }
}

#[async_trait]
impl ScoringBackend for GatedBackend {
    async fn score(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, BackendError> {
        self.gate.acquire().await.expect("gate closed").forget();
        self.inner.score(batch).await
    }

    fn input_dim(&self) -> usize {
        self.inner.input_dim()
    }

    fn output_dim(&self) -> usize {
        self.inner.output_dim()
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

fn features(i: usize) -> Vec<f32> {
    vec![i as f32, i as f32 * 0.5, -(i as f32)]
}

const GENEROUS: Duration = Duration::from_secs(5);

/// Let spawned submits reach the ingress queue while the worker is blocked
/// inside the gated backend.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn five_concurrent_requests_coalesce_into_one_batch() {
    let backend = Arc::new(GatedBackend::new());
    let predictor = Arc::new(Predictor::new(backend.clone(), 32));

    // Sacrificial request that parks the worker inside the backend.
    let warmup = {
        let predictor = predictor.clone();
        tokio::spawn(async move { predictor.submit(features(0), GENEROUS).await })
    };
    settle().await;

    let callers: Vec<_> = (1..=5)
        .map(|i| {
            let predictor = predictor.clone();
            tokio::spawn(async move { (i, predictor.submit(features(i), GENEROUS).await) })
        })
        .collect();
    settle().await;

    // One permit for the warmup batch, one for the coalesced batch.
    backend.release(2);

    assert!(warmup.await.unwrap().unwrap().is_some());
    for caller in callers {
        let (i, result) = caller.await.unwrap();
        let output = result.unwrap().expect("caller should receive its result");
        assert_eq!(output, StubBackend::expected_output(&features(i)));
    }

    assert_eq!(backend.batch_sizes(), vec![1, 5]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn no_batch_exceeds_the_configured_maximum() {
    let backend = Arc::new(GatedBackend::new());
    let predictor = Arc::new(Predictor::new(backend.clone(), 2));

    let warmup = {
        let predictor = predictor.clone();
        tokio::spawn(async move { predictor.submit(features(0), GENEROUS).await })
    };
    settle().await;

    let callers: Vec<_> = (1..=5)
        .map(|i| {
            let predictor = predictor.clone();
            tokio::spawn(async move { predictor.submit(features(i), GENEROUS).await })
        })
        .collect();
    settle().await;

    backend.release(10);

    assert!(warmup.await.unwrap().unwrap().is_some());
    for caller in callers {
        assert!(caller.await.unwrap().unwrap().is_some());
    }

    let sizes = backend.batch_sizes();
    assert!(sizes.iter().all(|&size| size <= 2), "batch sizes: {sizes:?}");
    assert_eq!(sizes.iter().sum::<usize>(), 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn each_caller_receives_only_its_own_result() {
    let backend = Arc::new(StubBackend::new());
    let predictor = Arc::new(Predictor::new(backend, 8));

    let callers: Vec<_> = (0..32)
        .map(|i| {
            let predictor = predictor.clone();
            tokio::spawn(async move { (i, predictor.submit(features(i), GENEROUS).await) })
        })
        .collect();

    for caller in callers {
        let (i, result) = caller.await.unwrap();
        let output = result.unwrap().expect("caller should receive its result");
        assert_eq!(
            output,
            StubBackend::expected_output(&features(i)),
            "caller {i} received someone else's result"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn scoring_alone_equals_scoring_inside_a_batch() {
    let backend = Arc::new(GatedBackend::new());
    let predictor = Arc::new(Predictor::new(backend.clone(), 32));

    // Alone: the request is drained and scored as a batch of one.
    backend.release(1);
    let solo = predictor
        .submit(features(3), GENEROUS)
        .await
        .unwrap()
        .expect("solo request should be scored");

    // Batched: the same vector rides in a multi-row batch.
    let warmup = {
        let predictor = predictor.clone();
        tokio::spawn(async move { predictor.submit(features(0), GENEROUS).await })
    };
    settle().await;
    let callers: Vec<_> = [7usize, 3, 11]
        .into_iter()
        .map(|i| {
            let predictor = predictor.clone();
            tokio::spawn(async move { (i, predictor.submit(features(i), GENEROUS).await) })
        })
        .collect();
    settle().await;
    backend.release(2);

    assert!(warmup.await.unwrap().unwrap().is_some());
    for caller in callers {
        let (i, result) = caller.await.unwrap();
        let output = result.unwrap().unwrap();
        if i == 3 {
            assert_eq!(output, solo, "batching changed a per-row result");
        }
    }

    assert_eq!(backend.batch_sizes(), vec![1, 1, 3]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn backend_failure_resolves_to_none_well_before_the_deadline() {
    let backend = Arc::new(FailingBackend::new(3));
    let predictor = Predictor::new(backend, 32);

    let start = Instant::now();
    let result = predictor.submit(features(1), GENEROUS).await;

    assert_eq!(result, Ok(None));
    assert!(
        start.elapsed() < Duration::from_secs(1),
        "caller should be released when the batch is dropped, not at its deadline"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn short_timeout_wins_against_a_slow_backend() {
    let backend = Arc::new(SlowBackend::new(
        StubBackend::new(),
        Duration::from_millis(500),
    ));
    let predictor = Predictor::new(backend, 32);

    let start = Instant::now();
    let result = predictor
        .submit(features(1), Duration::from_millis(20))
        .await;

    assert_eq!(result, Ok(None));
    assert!(
        start.elapsed() < Duration::from_millis(300),
        "submit must return at its own deadline, not the backend's pace"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn wrong_dimensionality_is_rejected_before_enqueueing() {
    let backend = Arc::new(StubBackend::new());
    let predictor = Predictor::new(backend.clone(), 32);

    let result = predictor.submit(vec![0.1, 0.2], GENEROUS).await;

    assert_eq!(
        result,
        Err(PredictorError::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(backend.calls(), 0, "rejected request must never reach the backend");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shutdown_stops_the_worker_and_later_submits() {
    let backend = Arc::new(StubBackend::new());
    let predictor = Predictor::new(backend.clone(), 32);

    assert!(predictor
        .submit(features(1), GENEROUS)
        .await
        .unwrap()
        .is_some());
    let calls_before = backend.calls();

    predictor.shutdown().await;

    assert_eq!(predictor.submit(features(2), GENEROUS).await, Ok(None));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(backend.calls(), calls_before, "no backend calls after shutdown");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shutdown_abandons_requests_not_yet_drained() {
    let backend = Arc::new(GatedBackend::new());
    let config = PredictorConfig {
        max_batch_size: 32,
        shutdown_timeout_ms: 50,
        ..PredictorConfig::default()
    };
    let predictor = Arc::new(Predictor::with_config(backend.clone(), config));

    // In-flight request, parked inside the backend.
    let in_flight = {
        let predictor = predictor.clone();
        tokio::spawn(async move { predictor.submit(features(0), GENEROUS).await })
    };
    settle().await;

    // Queued behind the in-flight batch; never drained once shutdown lands.
    let queued: Vec<_> = (1..=4)
        .map(|i| {
            let predictor = predictor.clone();
            tokio::spawn(async move { predictor.submit(features(i), GENEROUS).await })
        })
        .collect();
    settle().await;

    // Join window (50ms) elapses while the worker is still parked.
    predictor.shutdown().await;
    backend.release(10);

    // The in-flight batch is allowed to complete and deliver its result.
    assert!(in_flight.await.unwrap().unwrap().is_some());

    // Everything still queued resolves to "no result" without being scored.
    for caller in queued {
        assert_eq!(caller.await.unwrap(), Ok(None));
    }
    assert_eq!(backend.calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shutdown_is_idempotent() {
    let backend = Arc::new(StubBackend::new());
    let predictor = Predictor::new(backend, 32);

    predictor.shutdown().await;
    predictor.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn zero_max_batch_size_is_clamped_to_one() {
    let backend = Arc::new(StubBackend::new());
    let predictor = Predictor::new(backend.clone(), 0);

    assert!(predictor
        .submit(features(1), GENEROUS)
        .await
        .unwrap()
        .is_some());
    assert_eq!(backend.batch_sizes(), vec![1]);
}
