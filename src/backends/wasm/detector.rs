// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASM binary encoding detection
//!
//! Standards-compliant classification of WASM binaries using wasmparser, so that
//! component-model binaries can be rejected with a clear message before
//! wasmtime tries to compile them as core modules.

use crate::backends::wasm::error::{WasmError, WASM_UNSUPPORTED_ENCODING};

use wasmparser::{Encoding, Parser, Payload};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryKind {
    /// Core WASM module (version 1, no component section)
    CoreModule,
    /// Component Model binary (layer 1)
    Component,
}

/// Classify a WASM binary by its version header and custom sections.
///
/// # Errors
/// Returns an error if the input is empty, truncated, or otherwise invalid, or
/// if it is a legacy core module carrying a `component` custom section.
pub fn detect_binary_kind(bytes: &[u8]) -> Result<BinaryKind, WasmError> {
    let parser = Parser::new(0);
    let mut encoding = None;
    let mut has_component_section = false;

    for payload in parser.parse_all(bytes) {
        let payload = payload?;
        match payload {
            Payload::Version { encoding: enc, .. } => {
                encoding = Some(enc);
            }
            Payload::CustomSection(reader) if reader.name() == "component" => {
                has_component_section = true;
            }
            _ => {}
        }
    }

    let encoding =
        encoding.ok_or_else(|| WasmError::InvalidWasmBinary("Invalid WASM binary".to_string()))?;

    match encoding {
        Encoding::Component => Ok(BinaryKind::Component),
        Encoding::Module if has_component_section => Err(WasmError::UnsupportedEncoding(
            WASM_UNSUPPORTED_ENCODING.to_string(),
        )),
        Encoding::Module => Ok(BinaryKind::CoreModule),
    }
}
