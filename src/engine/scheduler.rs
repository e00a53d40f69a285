// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::backends::{BackendFactory, ProducerRegistry};
use crate::config::consts::MAX_TICK_FREQUENCY;
use crate::config::{Config, EmitterConfig, OutputConfig};
use crate::engine::emitter::{Emitter, EmitterHandle};
use crate::errors::{SchedulerError, TemplateError, ValidationError};
use crate::observability::messages::emitter::EmitterAborted;
use crate::observability::messages::scheduler::{RunCompleted, RunStarted};
use crate::observability::messages::StructuredLog;
use crate::state::GenerationState;
use crate::templates::ExpressionTemplate;
use crate::traits::Template;

/// Totals for one scheduler run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Records accepted by a backend during this run
    pub objects: u64,
    /// Bytes reported by backends during this run
    pub bytes: u64,
    pub elapsed: Duration,
    /// Emitters that were started
    pub emitters: usize,
    /// Backends whose close failed
    pub close_failures: usize,
}

/// Builds emitters from configuration and drives them concurrently.
///
/// Outputs are resolved through a [`ProducerRegistry`], so every output name
/// is constructed at most once per run and closed once when the run ends.
pub struct Scheduler {
    state: Arc<GenerationState>,
    factory: Arc<dyn BackendFactory>,
    outputs: HashMap<String, OutputConfig>,
    output_override: Option<String>,
    external_params: Arc<HashMap<String, String>>,
}

impl Scheduler {
    pub fn new(state: Arc<GenerationState>, factory: Arc<dyn BackendFactory>) -> Self {
        Self {
            state,
            factory,
            outputs: HashMap::new(),
            output_override: None,
            external_params: Arc::default(),
        }
    }

    /// Scheduler using the outputs declared in `config`.
    pub fn from_config(
        config: &Config,
        state: Arc<GenerationState>,
        factory: Arc<dyn BackendFactory>,
    ) -> Self {
        Self::new(state, factory).with_outputs(config.outputs.clone())
    }

    pub fn with_outputs(mut self, outputs: HashMap<String, OutputConfig>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Send every emitter's records to `output`, ignoring their own `output`.
    pub fn with_output_override(mut self, output: Option<String>) -> Self {
        self.output_override = output;
        self
    }

    /// Parameters supplied from outside the config file. See
    /// [`merge_parameters`](crate::engine::merge_parameters) for prefix rules.
    pub fn with_external_params(mut self, params: HashMap<String, String>) -> Self {
        self.external_params = Arc::new(params);
        self
    }

    pub fn state(&self) -> &Arc<GenerationState> {
        &self.state
    }

    /// Load reference rows from a CSV file into the shared state.
    pub fn load_reference_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize, SchedulerError> {
        let path = path.as_ref();
        self.state
            .load_reference_csv(path)
            .map_err(|error| SchedulerError::Io {
                path: path.display().to_string(),
                source: error.into(),
            })
    }

    /// Undeclared names fall back to a native producer whose implementation
    /// name is the output name itself, so `console` needs no declaration.
    fn output_config(&self, name: &str) -> OutputConfig {
        self.outputs
            .get(name)
            .cloned()
            .unwrap_or_else(|| OutputConfig::native(name))
    }

    /// Compile templates and construct backends for every emitter.
    ///
    /// Any failure closes the backends built so far and aborts; nothing runs.
    pub async fn prepare(&self, emitters: &[EmitterConfig]) -> Result<PreparedRun, SchedulerError> {
        let mut registry = ProducerRegistry::new();
        let mut prepared = Vec::with_capacity(emitters.len());

        for config in emitters {
            match self.build_emitter(config, &mut registry) {
                Ok(emitter) => prepared.push(emitter),
                Err(error) => {
                    registry.close_all().await;
                    return Err(error);
                }
            }
        }

        Ok(PreparedRun {
            emitters: prepared,
            registry,
            state: self.state.clone(),
        })
    }

    /// Prepare and run `emitters` until they finish or `cancel` fires.
    pub async fn run(
        &self,
        emitters: &[EmitterConfig],
        cancel: CancellationToken,
    ) -> Result<RunSummary, SchedulerError> {
        let prepared = self.prepare(emitters).await?;
        Ok(prepared.run(cancel).await)
    }

    fn build_emitter(
        &self,
        config: &EmitterConfig,
        registry: &mut ProducerRegistry,
    ) -> Result<Emitter, SchedulerError> {
        if config.tick.frequency.is_some_and(|f| f > MAX_TICK_FREQUENCY) {
            return Err(SchedulerError::Validation(vec![
                ValidationError::FrequencyTooLarge {
                    emitter: config.name.clone(),
                },
            ]));
        }

        let template_error = |source: TemplateError| SchedulerError::Template {
            emitter: config.name.clone(),
            source,
        };

        let value_template: Arc<dyn Template> =
            match (&config.value_template, &config.value_template_file) {
                (Some(source), None) => Arc::new(
                    ExpressionTemplate::new(&config.name, source, self.state.clone())
                        .map_err(template_error)?,
                ),
                (None, Some(path)) => Arc::new(
                    ExpressionTemplate::from_file(&config.name, path, self.state.clone())
                        .map_err(template_error)?,
                ),
                (None, None) => {
                    return Err(SchedulerError::Validation(vec![
                        ValidationError::MissingValueTemplate {
                            emitter: config.name.clone(),
                        },
                    ]))
                }
                (Some(_), Some(_)) => {
                    return Err(SchedulerError::Validation(vec![
                        ValidationError::ConflictingValueTemplate {
                            emitter: config.name.clone(),
                        },
                    ]))
                }
            };

        let key_template: Option<Arc<dyn Template>> = match &config.key_template {
            Some(source) => Some(Arc::new(
                ExpressionTemplate::new(&format!("{}.key", config.name), source, self.state.clone())
                    .map_err(template_error)?,
            )),
            None => None,
        };

        let output = self
            .output_override
            .as_deref()
            .unwrap_or(&config.output);
        let producer = registry.get_or_create(
            output,
            &config.name,
            &self.output_config(output),
            self.factory.as_ref(),
        )?;

        Ok(Emitter::new(
            config,
            output,
            value_template,
            key_template,
            producer,
            self.state.clone(),
        )
        .with_external_params(self.external_params.clone()))
    }
}

/// Emitters with their backends constructed, ready to start.
pub struct PreparedRun {
    emitters: Vec<Emitter>,
    registry: ProducerRegistry,
    state: Arc<GenerationState>,
}

impl PreparedRun {
    /// Handles for stopping individual emitters once the run starts.
    pub fn handles(&self) -> Vec<EmitterHandle> {
        self.emitters.iter().map(Emitter::handle).collect()
    }

    /// Run every emitter as its own task, wait for all of them, then close
    /// every backend.
    pub async fn run(self, cancel: CancellationToken) -> RunSummary {
        let span = RunStarted {
            emitter_count: self.emitters.len(),
            output_count: self.registry.len(),
        }
        .span();

        self.drive(cancel).instrument(span).await
    }

    async fn drive(mut self, cancel: CancellationToken) -> RunSummary {
        let started = Instant::now();
        let objects_before = self.state.stats().objects();
        let bytes_before = self.state.stats().bytes();
        let emitter_count = self.emitters.len();

        RunStarted {
            emitter_count,
            output_count: self.registry.len(),
        }
        .log();

        let tasks: Vec<_> = self
            .emitters
            .drain(..)
            .map(|emitter| {
                let name = emitter.name().to_string();
                (name, tokio::spawn(emitter.run(cancel.clone()).in_current_span()))
            })
            .collect();

        for (name, task) in tasks {
            if let Err(join_error) = task.await {
                EmitterAborted {
                    emitter: &name,
                    error: &join_error,
                }
                .log();
            }
        }

        let close_failures = self.registry.close_all().await;

        let summary = RunSummary {
            objects: self.state.stats().objects() - objects_before,
            bytes: self.state.stats().bytes() - bytes_before,
            elapsed: started.elapsed(),
            emitters: emitter_count,
            close_failures,
        };

        RunCompleted {
            objects: summary.objects,
            bytes: summary.bytes,
            duration: summary.elapsed,
            close_failures,
        }
        .log();

        summary
    }
}
