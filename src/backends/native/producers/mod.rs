// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod console;
pub mod discard;
pub mod file;

pub use console::ConsoleProducer;
pub use discard::DiscardProducer;
pub use file::FileProducer;
