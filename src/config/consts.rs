// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Default maximum number of requests coalesced into one backend call.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 32;

/// Hard upper bound on `max_batch_size`; larger values are a config error.
pub const MAX_BATCH_SIZE_LIMIT: usize = 4096;

/// Default pause after a failed backend invocation before the worker
/// resumes draining the queue.
pub const DEFAULT_FAILURE_BACKOFF_MS: u64 = 1;

/// Default bound on how long `shutdown` waits for the worker to terminate.
pub const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 1_000;
