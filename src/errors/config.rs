// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::config::consts::MAX_TICK_FREQUENCY;

/// Errors that can occur during emitter configuration validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two emitters share the same name
    DuplicateEmitterName {
        /// The duplicated emitter name
        name: String,
    },
    /// An emitter declares neither an inline value template nor a template file
    MissingValueTemplate {
        /// The emitter without a value template
        emitter: String,
    },
    /// An emitter declares both an inline value template and a template file
    ConflictingValueTemplate {
        /// The emitter with two value template sources
        emitter: String,
    },
    /// An emitter would produce nothing on each tick
    ZeroIterations {
        /// The emitter with `tick.num == 0`
        emitter: String,
    },
    /// An emitter's tick frequency exceeds the supported maximum
    FrequencyTooLarge {
        /// The emitter with the oversized frequency
        emitter: String,
    },
    /// An emitter targets an output that is neither declared nor a built-in native producer
    UnknownOutput {
        /// The emitter referencing the output
        emitter: String,
        /// The output name that couldn't be resolved
        output: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateEmitterName { name } => {
                write!(f, "Duplicate emitter name: '{}'", name)
            }
            ValidationError::MissingValueTemplate { emitter } => {
                write!(
                    f,
                    "Emitter '{}' has no value template (set 'value_template' or 'value_template_file')",
                    emitter
                )
            }
            ValidationError::ConflictingValueTemplate { emitter } => {
                write!(
                    f,
                    "Emitter '{}' sets both 'value_template' and 'value_template_file'",
                    emitter
                )
            }
            ValidationError::ZeroIterations { emitter } => {
                write!(f, "Emitter '{}' has tick.num = 0 and would never produce", emitter)
            }
            ValidationError::FrequencyTooLarge { emitter } => {
                write!(
                    f,
                    "Emitter '{}' has a tick.frequency longer than {:?}",
                    emitter, MAX_TICK_FREQUENCY
                )
            }
            ValidationError::UnknownOutput { emitter, output } => {
                write!(
                    f,
                    "Emitter '{}' targets output '{}' which is not declared and is not a built-in producer",
                    emitter, output
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
