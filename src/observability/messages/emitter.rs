// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for emitter lifecycle and per-record events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Emitter task started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use synthgen::observability::messages::emitter::EmitterStarted;
/// use std::time::Duration;
///
/// let msg = EmitterStarted {
///     emitter: "users",
///     output: "console",
///     frequency: Some(Duration::from_millis(500)),
///     num: 10,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Emitter 'users' started: output=console, every 500ms, 10 per tick"
/// );
/// ```
pub struct EmitterStarted<'a> {
    pub emitter: &'a str,
    pub output: &'a str,
    pub frequency: Option<Duration>,
    pub num: usize,
}

impl Display for EmitterStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.frequency {
            Some(period) => write!(
                f,
                "Emitter '{}' started: output={}, every {:?}, {} per tick",
                self.emitter, self.output, period, self.num
            ),
            None => write!(
                f,
                "Emitter '{}' started: output={}, once, {} records",
                self.emitter, self.output, self.num
            ),
        }
    }
}

impl EmitterStarted<'_> {
    /// Span an emitter task runs in; per-record events inherit its fields.
    pub fn span(&self) -> Span {
        tracing::info_span!("emitter", emitter = self.emitter, output = self.output)
    }
}

impl StructuredLog for EmitterStarted<'_> {
    fn log(&self) {
        tracing::info!(
            emitter = self.emitter,
            output = self.output,
            frequency_ms = self.frequency.map(|d| d.as_millis() as u64),
            num = self.num,
            "{}", self
        );
    }
}

/// Why an emitter left the running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Completed,
    Cancelled,
    StopSignal,
}

impl Display for StopReason {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let text = match self {
            StopReason::Completed => "completed",
            StopReason::Cancelled => "cancelled",
            StopReason::StopSignal => "stop signal",
        };
        f.write_str(text)
    }
}

/// Emitter task finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EmitterStopped<'a> {
    pub emitter: &'a str,
    pub reason: StopReason,
    pub records: u64,
}

impl Display for EmitterStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Emitter '{}' stopped ({}) after {} records",
            self.emitter, self.reason, self.records
        )
    }
}

impl StructuredLog for EmitterStopped<'_> {
    fn log(&self) {
        tracing::info!(
            emitter = self.emitter,
            reason = %self.reason,
            records = self.records,
            "{}", self
        );
    }
}

/// A record was delivered.
///
/// # Log Level
/// `debug!` - Per-record detail
pub struct RecordProduced<'a> {
    pub emitter: &'a str,
    pub iteration: u64,
    pub bytes: u64,
}

impl Display for RecordProduced<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Emitter '{}' produced record {} ({} bytes)",
            self.emitter, self.iteration, self.bytes
        )
    }
}

impl StructuredLog for RecordProduced<'_> {
    fn log(&self) {
        tracing::debug!(
            emitter = self.emitter,
            iteration = self.iteration,
            bytes = self.bytes,
            "{}", self
        );
    }
}

/// A record could not be delivered; the emitter carries on.
///
/// # Log Level
/// `warn!` - Recoverable failure
pub struct ProduceFailed<'a> {
    pub emitter: &'a str,
    pub output: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ProduceFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Emitter '{}' failed to produce to '{}': {}",
            self.emitter, self.output, self.error
        )
    }
}

impl StructuredLog for ProduceFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            emitter = self.emitter,
            output = self.output,
            error = %self.error,
            "{}", self
        );
    }
}

/// A template failed to render; the record is skipped.
///
/// # Log Level
/// `warn!` - Recoverable failure
pub struct RenderFailed<'a> {
    pub emitter: &'a str,
    pub template: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for RenderFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Emitter '{}' skipped a record, {} template failed: {}",
            self.emitter, self.template, self.error
        )
    }
}

impl StructuredLog for RenderFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            emitter = self.emitter,
            template = self.template,
            error = %self.error,
            "{}", self
        );
    }
}

/// An emitter task ended without returning, e.g. a panic inside a backend.
///
/// # Log Level
/// `error!` - The emitter stopped early; the run still completes
pub struct EmitterAborted<'a> {
    pub emitter: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for EmitterAborted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Emitter '{}' aborted: {}", self.emitter, self.error)
    }
}

impl StructuredLog for EmitterAborted<'_> {
    fn log(&self) {
        tracing::error!(
            emitter = self.emitter,
            error = %self.error,
            "{}", self
        );
    }
}
