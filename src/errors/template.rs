// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors from compiling or rendering a template.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// A `{{` without a matching `}}`.
    #[error("Template '{template}': unterminated expression block starting at byte {offset}")]
    Unterminated { template: String, offset: usize },

    #[error("Template '{template}': failed to compile expression '{expression}': {reason}")]
    Parse {
        template: String,
        expression: String,
        reason: String,
    },

    #[error("Template '{template}': failed to evaluate expression '{expression}': {reason}")]
    Render {
        template: String,
        expression: String,
        reason: String,
    },

    #[error("Failed to read template file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
