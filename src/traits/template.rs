// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::TemplateError;
use crate::templates::RenderContext;

/// Text producer bound to generation state.
pub trait Template: Send + Sync {
    /// Render without a per-record context (key templates).
    fn execute(&self) -> Result<String, TemplateError>;

    /// Render against a per-record context; side effects such as setting the
    /// record key or headers land in `context`.
    fn execute_with(&self, context: &RenderContext) -> Result<String, TemplateError>;

    fn name(&self) -> &str;
}
