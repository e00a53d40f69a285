// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sandboxed WebAssembly backend.
//!
//! Loading flow: `loader::load_wasm_bytes` reads the file, `detector`
//! classifies it, and `producer::WasmProducer` compiles it on a fuel-metered
//! engine and pre-links WASI preview1.

pub mod detector;
pub mod error;
pub mod loader;
pub mod producer;

pub use error::{WasmError, WasmResult};
pub use producer::WasmProducer;
