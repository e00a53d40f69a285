// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by output backends.
//!
//! Construction-time variants (`Configuration`, `Compile`, `Load`, `UnknownNative`)
//! abort scheduler startup. `Produce` is contained to a single record and `Close`
//! is only ever logged.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    /// Missing or unparsable backend configuration payload.
    #[error("Invalid configuration for output '{output}': {reason}")]
    Configuration { output: String, reason: String },

    /// Script source failed to parse or compile.
    #[error("Failed to compile script for output '{output}': {reason}")]
    Compile { output: String, reason: String },

    /// Bytecode module failed to load, validate, or link.
    #[error("Failed to load module for output '{output}': {reason}")]
    Load { output: String, reason: String },

    /// No native producer is registered under this implementation name.
    #[error("Unknown native producer implementation: '{0}'")]
    UnknownNative(String),

    /// A single record could not be delivered.
    #[error("Produce failed on output '{output}': {reason}")]
    Produce { output: String, reason: String },

    /// Backend teardown failed.
    #[error("Close failed on output '{output}': {reason}")]
    Close { output: String, reason: String },
}

impl BackendError {
    pub fn produce(output: &str, reason: impl ToString) -> Self {
        BackendError::Produce {
            output: output.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for errors that can only happen while an output is being constructed.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            BackendError::Configuration { .. }
                | BackendError::Compile { .. }
                | BackendError::Load { .. }
                | BackendError::UnknownNative(_)
        )
    }
}
