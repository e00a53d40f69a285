// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use crate::config::consts::MAX_TICK_FREQUENCY;
use crate::config::Config;
use crate::errors::ValidationError;

/// Validate emitter definitions against the declared outputs.
///
/// `native_outputs` lists the native producer implementations that can be used
/// without declaring an output. Every problem is collected so the operator sees
/// all of them in one pass.
pub fn validate_config(
    config: &Config,
    native_outputs: &[String],
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for emitter in &config.emitters {
        if !seen.insert(emitter.name.as_str()) {
            errors.push(ValidationError::DuplicateEmitterName {
                name: emitter.name.clone(),
            });
        }

        match (&emitter.value_template, &emitter.value_template_file) {
            (None, None) => errors.push(ValidationError::MissingValueTemplate {
                emitter: emitter.name.clone(),
            }),
            (Some(_), Some(_)) => errors.push(ValidationError::ConflictingValueTemplate {
                emitter: emitter.name.clone(),
            }),
            _ => {}
        }

        if emitter.tick.num == 0 {
            errors.push(ValidationError::ZeroIterations {
                emitter: emitter.name.clone(),
            });
        }

        if emitter.tick.frequency.is_some_and(|f| f > MAX_TICK_FREQUENCY) {
            errors.push(ValidationError::FrequencyTooLarge {
                emitter: emitter.name.clone(),
            });
        }

        let declared = config.outputs.contains_key(&emitter.output);
        if !declared && !native_outputs.iter().any(|n| n == &emitter.output) {
            errors.push(ValidationError::UnknownOutput {
                emitter: emitter.name.clone(),
                output: emitter.output.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
