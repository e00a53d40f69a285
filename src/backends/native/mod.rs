// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process producers, called directly with no marshaling.

pub mod factory;
pub mod producers;

pub use factory::{NativeConstructor, NativeProducerFactory};
