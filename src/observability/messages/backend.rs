// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for output backend construction, reuse, and teardown.
//!
//! This module contains message types for logging events related to:
//! * Output instantiation and reuse across emitters
//! * Script compilation and WASM module loading
//! * Output teardown

use crate::config::BackendKind;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// New output instance constructed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct BackendCreated<'a> {
    pub output: &'a str,
    pub kind: BackendKind,
}

impl Display for BackendCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Created {:?} output '{}'", self.kind, self.output)
    }
}

impl StructuredLog for BackendCreated<'_> {
    fn log(&self) {
        tracing::info!(
            output = self.output,
            kind = ?self.kind,
            "{}", self
        );
    }
}

/// Existing output instance handed to another emitter.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct BackendReused<'a> {
    pub output: &'a str,
    pub emitter: &'a str,
}

impl Display for BackendReused<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Reusing output '{}' for emitter '{}'",
            self.output, self.emitter
        )
    }
}

impl StructuredLog for BackendReused<'_> {
    fn log(&self) {
        tracing::debug!(output = self.output, emitter = self.emitter, "{}", self);
    }
}

/// Output construction failed; the run will not start.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct BackendCreationFailed<'a> {
    pub output: &'a str,
    pub kind: BackendKind,
    pub error: &'a dyn std::error::Error,
}

impl Display for BackendCreationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to create {:?} output '{}': {}",
            self.kind, self.output, self.error
        )
    }
}

impl StructuredLog for BackendCreationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            output = self.output,
            kind = ?self.kind,
            error = %self.error,
            "{}", self
        );
    }
}

/// Output closed.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct BackendClosed<'a> {
    pub output: &'a str,
}

impl Display for BackendClosed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Closed output '{}'", self.output)
    }
}

impl StructuredLog for BackendClosed<'_> {
    fn log(&self) {
        tracing::debug!(output = self.output, "{}", self);
    }
}

/// Output teardown failed; shutdown continues.
///
/// # Log Level
/// `warn!` - Recoverable failure
///
/// # Example
/// ```
/// use synthgen::errors::BackendError;
/// use synthgen::observability::messages::backend::BackendCloseFailed;
///
/// let error = BackendError::Close {
///     output: "audit".to_string(),
///     reason: "flush failed".to_string(),
/// };
/// let msg = BackendCloseFailed {
///     output: "audit",
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct BackendCloseFailed<'a> {
    pub output: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for BackendCloseFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to close output '{}': {}", self.output, self.error)
    }
}

impl StructuredLog for BackendCloseFailed<'_> {
    fn log(&self) {
        tracing::warn!(output = self.output, error = %self.error, "{}", self);
    }
}

/// Script compiled for a script output.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ScriptCompiled<'a> {
    pub output: &'a str,
    pub source: &'a str,
}

impl Display for ScriptCompiled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Compiled script for output '{}' from {}",
            self.output, self.source
        )
    }
}

impl StructuredLog for ScriptCompiled<'_> {
    fn log(&self) {
        tracing::info!(output = self.output, source = self.source, "{}", self);
    }
}

/// WASM module read from disk.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ModuleLoaded<'a> {
    pub module_path: &'a str,
    pub size_bytes: usize,
}

impl Display for ModuleLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded WASM module: {} ({} bytes)",
            self.module_path, self.size_bytes
        )
    }
}

impl StructuredLog for ModuleLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            module_path = self.module_path,
            size_bytes = self.size_bytes,
            "{}", self
        );
    }
}

/// WASM module could not be read or validated.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ModuleLoadFailed<'a> {
    pub module_path: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ModuleLoadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to load WASM module '{}': {}",
            self.module_path, self.error
        )
    }
}

impl StructuredLog for ModuleLoadFailed<'_> {
    fn log(&self) {
        tracing::error!(
            module_path = self.module_path,
            error = %self.error,
            "{}", self
        );
    }
}
