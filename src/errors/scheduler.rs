// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::{BackendError, TemplateError, ValidationError};

/// Errors that stop a scheduler run before any emitter starts.
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Configuration validation failed:\n{}", format_validation(.0))]
    Validation(Vec<ValidationError>),

    #[error("Emitter '{emitter}' has an invalid template: {source}")]
    Template {
        emitter: String,
        #[source]
        source: TemplateError,
    },

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
