// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Embedded Rhai sandbox backend.

pub mod producer;

pub use producer::ScriptProducer;
