// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for WASM backend operations.
//!
//! These stay internal to the backend; at the `Producer` boundary they are
//! mapped onto [`BackendError`] (`Load` during construction, `Produce` per call).

use thiserror::Error;

use crate::errors::BackendError;

/// Error message for binaries that are not core modules.
pub const WASM_UNSUPPORTED_ENCODING: &str = "Unsupported WASM binary: only core modules exporting \
'memory', 'allocate' and 'produce' can be used as outputs.";

#[derive(Error, Debug)]
pub enum WasmError {
    /// Invalid or malformed WASM binary format.
    #[error("Invalid WASM binary: {0}")]
    InvalidWasmBinary(String),

    /// Component-model or legacy component binaries.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Module lacks a required export or has the wrong signature.
    #[error("WASM module error: {0}")]
    ModuleError(String),

    /// Allocation failed or a write fell outside linear memory.
    #[error("Memory error: {0}")]
    MemoryError(String),

    /// Input validation error (size limits, format, etc.).
    #[error("Invalid input: {0}")]
    ValidationError(String),

    /// Wasmtime engine creation or configuration error.
    #[error("Engine creation error: {0}")]
    EngineError(String),

    /// The module's `produce` export reported failure.
    #[error("Module returned status {0}")]
    NonZeroStatus(i32),

    /// File I/O error during module loading.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Wasmtime runtime execution error (traps, fuel exhaustion, linking).
    #[error("WASM execution error: {0}")]
    ExecutionError(#[from] wasmtime::Error),

    /// WASM binary parsing error from wasmparser.
    #[error("WASM parser error: {0}")]
    ParserError(#[from] wasmparser::BinaryReaderError),
}

pub type WasmResult<T> = Result<T, WasmError>;

impl WasmError {
    pub fn into_load_error(self, output: &str) -> BackendError {
        BackendError::Load {
            output: output.to_string(),
            reason: self.to_string(),
        }
    }

    pub fn into_produce_error(self, output: &str) -> BackendError {
        BackendError::produce(output, self)
    }
}
