// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it at the right level with structured fields.
//!
//! # Organization
//!
//! * `scheduler` - Run lifecycle and shutdown
//! * `emitter` - Emitter lifecycle and per-record events
//! * `backend` - Output construction, reuse, teardown, and module loading
//!
//! # Usage Pattern
//!
//! ```rust
//! use synthgen::observability::messages::{emitter::ProduceFailed, StructuredLog};
//!
//! let error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
//! ProduceFailed {
//!     emitter: "users",
//!     output: "console",
//!     error: &error,
//! }
//! .log();
//! ```

pub mod backend;
pub mod emitter;
pub mod scheduler;

/// Emit a message as a tracing event with structured fields.
pub trait StructuredLog {
    fn log(&self);
}
