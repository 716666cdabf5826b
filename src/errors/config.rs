// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::config::consts::MAX_BATCH_SIZE_LIMIT;

/// Errors that can occur while loading or validating a predictor config.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// The config file is not valid YAML or has the wrong shape.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// `max_batch_size` must be between 1 and `MAX_BATCH_SIZE_LIMIT`.
    #[error("invalid max_batch_size {value}: must be between 1 and {}", MAX_BATCH_SIZE_LIMIT)]
    InvalidMaxBatchSize { value: usize },
}
