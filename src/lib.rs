// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // concrete scoring backends
pub mod config;     // config + loader
pub mod engine;     // micro-batching worker + predictor facade
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // unified abstractions
