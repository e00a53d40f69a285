// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the scheduler run lifecycle.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// All outputs resolved and emitters about to start.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use synthgen::observability::messages::scheduler::RunStarted;
///
/// let msg = RunStarted {
///     emitter_count: 3,
///     output_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted {
    pub emitter_count: usize,
    pub output_count: usize,
}

impl Display for RunStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting run: {} emitters across {} outputs",
            self.emitter_count, self.output_count
        )
    }
}

impl RunStarted {
    /// Span covering the whole run, from spawning the emitters to closing outputs.
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "run",
            emitter_count = self.emitter_count,
            output_count = self.output_count,
        )
    }
}

impl StructuredLog for RunStarted {
    fn log(&self) {
        tracing::info!(
            emitter_count = self.emitter_count,
            output_count = self.output_count,
            "{}", self
        );
    }
}

/// Every emitter stopped and every output closed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunCompleted {
    pub objects: u64,
    pub bytes: u64,
    pub duration: Duration,
    pub close_failures: usize,
}

impl Display for RunCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Run completed: {} objects, {} bytes in {:?}",
            self.objects, self.bytes, self.duration
        )?;
        if self.close_failures > 0 {
            write!(f, " ({} outputs failed to close)", self.close_failures)?;
        }
        Ok(())
    }
}

impl StructuredLog for RunCompleted {
    fn log(&self) {
        tracing::info!(
            objects = self.objects,
            bytes = self.bytes,
            duration_ms = self.duration.as_millis() as u64,
            close_failures = self.close_failures,
            "{}", self
        );
    }
}

/// Run aborted before any emitter started.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct RunFailed<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Run failed during startup: {}", self.error)
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }
}

/// Operator interrupt received; cancellation is being broadcast.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ShutdownRequested<'a> {
    pub signal: &'a str,
}

impl Display for ShutdownRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Received {}, stopping all emitters", self.signal)
    }
}

impl StructuredLog for ShutdownRequested<'_> {
    fn log(&self) {
        tracing::info!(signal = self.signal, "{}", self);
    }
}
