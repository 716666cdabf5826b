// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::consts::{
    DEFAULT_FAILURE_BACKOFF_MS, DEFAULT_MAX_BATCH_SIZE, DEFAULT_SHUTDOWN_TIMEOUT_MS,
    MAX_BATCH_SIZE_LIMIT,
};
use crate::errors::ConfigError;

/// Tuning knobs for the micro-batching predictor.
///
/// Typically loaded from a YAML file, with every field optional:
///
/// ```yaml
/// max_batch_size: 64
/// failure_backoff_ms: 5
/// shutdown_timeout_ms: 2000
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PredictorConfig {
    /// Maximum number of queued requests coalesced into one backend call.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Pause after a failed backend invocation, in milliseconds. Keeps a
    /// persistently failing backend from spinning the worker loop.
    #[serde(default = "default_failure_backoff_ms")]
    pub failure_backoff_ms: u64,

    /// Bound on how long `shutdown` waits for the worker to join, in
    /// milliseconds.
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
}

fn default_max_batch_size() -> usize {
    DEFAULT_MAX_BATCH_SIZE
}

fn default_failure_backoff_ms() -> u64 {
    DEFAULT_FAILURE_BACKOFF_MS
}

fn default_shutdown_timeout_ms() -> u64 {
    DEFAULT_SHUTDOWN_TIMEOUT_MS
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            failure_backoff_ms: DEFAULT_FAILURE_BACKOFF_MS,
            shutdown_timeout_ms: DEFAULT_SHUTDOWN_TIMEOUT_MS,
        }
    }
}

impl PredictorConfig {
    /// Validate field values that serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_batch_size == 0 || self.max_batch_size > MAX_BATCH_SIZE_LIMIT {
            return Err(ConfigError::InvalidMaxBatchSize {
                value: self.max_batch_size,
            });
        }
        Ok(())
    }

    pub fn failure_backoff(&self) -> Duration {
        Duration::from_millis(self.failure_backoff_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

/// Load a config from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PredictorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: PredictorConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load and validate a config from a YAML file.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<PredictorConfig, ConfigError> {
    let cfg = load_config(path)?;
    cfg.validate()?;
    Ok(cfg)
}
