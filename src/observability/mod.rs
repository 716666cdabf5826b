// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! Centralized message types for diagnostic and operational logging. Message
//! types follow a struct-based pattern with `Display` implementations to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Enable future internationalization without code changes
//! * Provide consistent, structured logging output
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - batch worker lifecycle and dispatch events
//! * `messages::predictor` - facade lifecycle events

pub mod messages;
