// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types follow a struct-based pattern with a `Display` implementation
//! so log text lives in one place instead of string literals at call sites.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::scheduler` - Run lifecycle and shutdown
//! * `messages::emitter` - Emitter lifecycle and per-record outcomes
//! * `messages::backend` - Output construction, reuse, teardown
//!
//! The binary installs a `tracing-subscriber` fmt layer filtered by `RUST_LOG`
//! (default `info`); see [`init_tracing`].

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
