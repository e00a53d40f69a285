// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Output backends.
//!
//! Every backend implements [`Producer`](crate::traits::Producer) and is built
//! from an output's configuration by a [`BackendFactory`]. The scheduler keeps
//! one instance per output name in a [`ProducerRegistry`].
//!
//! # Available Backends
//!
//! ## Native
//! In-process Rust producers selected by implementation name:
//! - **console**: `key value` lines on stdout
//! - **discard**: accepts and counts
//! - **file**: appends values to a file
//!
//! ## Script
//! Rhai scripts compiled once; every record runs in a fresh interpreter with
//! `k`, `v`, `headers` and `params` bound.
//!
//! ## WASM
//! Core WebAssembly modules run under fuel metering with WASI preview1 linked;
//! a fresh store per record.
//!
//! ## Stub Backend (Test-Only)
//! Recording producers and counting factories for scheduler tests.

pub mod factory;
pub mod native;
pub mod registry;
pub mod script;
pub mod wasm;

#[cfg(test)]
pub mod stub;

pub use factory::{BackendFactory, DefaultBackendFactory};
pub use registry::ProducerRegistry;
