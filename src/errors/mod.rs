// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod backend;
mod config;
mod scheduler;
mod template;

pub use backend::BackendError;
pub use config::ValidationError;
pub use scheduler::SchedulerError;
pub use template::TemplateError;
