// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};

use batchwise::backends::local::LinearBackend;
use batchwise::config::{load_and_validate_config, PredictorConfig};
use batchwise::engine::Predictor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => load_and_validate_config(path)?,
        None => PredictorConfig::default(),
    };

    println!("🚀 batchwise micro-batching demo");
    println!("Config: {:?}", config);

    // A small 3-feature → 2-output linear model standing in for a real
    // exported model.
    let backend = Arc::new(LinearBackend::new(
        vec![vec![0.8, -0.3, 0.1], vec![0.2, 0.5, -0.7]],
        vec![0.05, -0.02],
    ));
    let predictor = Arc::new(Predictor::with_config(backend, config));

    let inputs: Vec<Vec<f32>> = (0..10)
        .map(|i| {
            let x = i as f32 / 10.0;
            vec![x, 1.0 - x, x * x]
        })
        .collect();

    let start = Instant::now();
    let callers: Vec<_> = inputs
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, features)| {
            let predictor = predictor.clone();
            tokio::spawn(async move {
                (i, predictor.submit(features, Duration::from_millis(250)).await)
            })
        })
        .collect();

    for caller in callers {
        let (i, result) = caller.await?;
        match result? {
            Some(output) => println!("  caller {:>2}: {:?} → {:?}", i, inputs[i], output),
            None => println!("  caller {:>2}: no result within deadline", i),
        }
    }
    println!("⏱️  {} requests in {:?}", inputs.len(), start.elapsed());

    predictor.shutdown().await;
    println!("✅ shut down cleanly");

    Ok(())
}
