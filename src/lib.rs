// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // output backends
pub mod config;     // config + validation
pub mod engine;     // emitters + scheduler
pub mod errors;     // error handling
pub mod observability;
pub mod signals;
pub mod state;      // shared generation state
pub mod templates;  // template capability
pub mod traits;     // unified abstractions
