// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Emitters and the scheduler that runs them.
//!
//! Each emitter is one tokio task ticking on its own period. All of them
//! share one [`GenerationState`](crate::state::GenerationState) and resolve
//! their outputs through a single per-run producer registry.

pub mod emitter;
pub mod params;
pub mod scheduler;

#[cfg(test)]
pub mod integration_tests;

pub use emitter::{Emitter, EmitterHandle, EmitterState};
pub use params::merge_parameters;
pub use scheduler::{PreparedRun, RunSummary, Scheduler};
