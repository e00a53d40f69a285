// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASM file loading and engine configuration
//!
//! Reads module bytes from disk with a size limit and builds the sandboxed
//! wasmtime engine every WASM output runs on.

use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::observability::messages::backend::{ModuleLoadFailed, ModuleLoaded};
use crate::observability::messages::StructuredLog;
use std::path::Path;
use wasmtime::{Config, Engine};

/// Maximum allowed size for WASM binaries (16 MB)
const MAX_WASM_SIZE: usize = 16 * 1024 * 1024;

/// Loads WASM bytes from a file and validates the size.
///
/// Does not parse the binary; see `detector::detect_binary_kind` for that.
pub fn load_wasm_bytes<P: AsRef<Path>>(path: P) -> WasmResult<Vec<u8>> {
    let path = path.as_ref();
    let module_path = path.display().to_string();

    let bytes = std::fs::read(path).map_err(|e| {
        let error = WasmError::IoError(e);
        ModuleLoadFailed {
            module_path: &module_path,
            error: &error,
        }
        .log();
        error
    })?;

    if bytes.len() > MAX_WASM_SIZE {
        let error = WasmError::ValidationError(format!(
            "WASM file too large: {} bytes (max: {} bytes)",
            bytes.len(),
            MAX_WASM_SIZE
        ));
        ModuleLoadFailed {
            module_path: &module_path,
            error: &error,
        }
        .log();
        return Err(error);
    }

    ModuleLoaded {
        module_path: &module_path,
        size_bytes: bytes.len(),
    }
    .log();

    Ok(bytes)
}

/// Engine for core modules: fuel metering on, threads/SIMD/multi-memory/memory64 off.
pub fn create_engine() -> WasmResult<Engine> {
    let mut config = Config::new();

    config.wasm_component_model(false);
    config.wasm_threads(false);
    config.wasm_simd(false);
    config.wasm_relaxed_simd(false);
    config.wasm_multi_memory(false);
    config.wasm_memory64(false);
    config.consume_fuel(true);
    config.epoch_interruption(false);

    Engine::new(&config).map_err(|e| WasmError::EngineError(e.to_string()))
}
