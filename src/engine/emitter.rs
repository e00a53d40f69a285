// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::{EmitterConfig, TickConfig};
use crate::engine::params::merge_parameters;
use crate::errors::TemplateError;
use crate::observability::messages::emitter::{
    EmitterStarted, EmitterStopped, ProduceFailed, RecordProduced, RenderFailed, StopReason,
};
use crate::observability::messages::StructuredLog;
use crate::state::GenerationState;
use crate::templates::RenderContext;
use crate::traits::{ProduceRequest, Producer, Template};

/// Lifecycle of one emitter. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterState {
    Idle,
    Running,
    Stopped,
}

impl EmitterState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => EmitterState::Idle,
            1 => EmitterState::Running,
            _ => EmitterState::Stopped,
        }
    }
}

/// Marks the emitter `Stopped` when dropped, whether `run` returned or panicked.
struct StoppedOnDrop(Arc<AtomicU8>);

impl Drop for StoppedOnDrop {
    fn drop(&mut self) {
        self.0.store(EmitterState::Stopped as u8, Ordering::SeqCst);
    }
}

/// Control handle for a single emitter, usable while the scheduler runs it.
#[derive(Debug, Clone)]
pub struct EmitterHandle {
    name: String,
    stop: CancellationToken,
    state: Arc<AtomicU8>,
}

impl EmitterHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop this emitter only. The record in progress completes first.
    pub fn stop(&self) {
        self.stop.cancel();
    }

    pub fn state(&self) -> EmitterState {
        EmitterState::from_u8(self.state.load(Ordering::SeqCst))
    }
}

/// One configured source of records bound to its templates and producer.
pub struct Emitter {
    name: String,
    output: String,
    value_template: Arc<dyn Template>,
    key_template: Option<Arc<dyn Template>>,
    producer: Arc<dyn Producer>,
    tick: TickConfig,
    oneline: bool,
    static_params: HashMap<String, String>,
    external_params: Arc<HashMap<String, String>>,
    state: Arc<GenerationState>,
    stop: CancellationToken,
    status: Arc<AtomicU8>,
}

impl Emitter {
    /// Bind an emitter definition to its compiled templates and resolved producer.
    ///
    /// `output` is the name the producer was resolved under, which differs from
    /// `config.output` when an output override is active.
    pub fn new(
        config: &EmitterConfig,
        output: &str,
        value_template: Arc<dyn Template>,
        key_template: Option<Arc<dyn Template>>,
        producer: Arc<dyn Producer>,
        state: Arc<GenerationState>,
    ) -> Self {
        Self {
            name: config.name.clone(),
            output: output.to_string(),
            value_template,
            key_template,
            producer,
            tick: config.tick.clone(),
            oneline: config.oneline,
            static_params: config.config_parameters.clone(),
            external_params: Arc::default(),
            state,
            stop: CancellationToken::new(),
            status: Arc::new(AtomicU8::new(EmitterState::Idle as u8)),
        }
    }

    pub fn with_external_params(mut self, params: Arc<HashMap<String, String>>) -> Self {
        self.external_params = params;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> EmitterHandle {
        EmitterHandle {
            name: self.name.clone(),
            stop: self.stop.clone(),
            state: self.status.clone(),
        }
    }

    fn period(&self) -> Option<Duration> {
        self.tick.frequency.filter(|period| !period.is_zero())
    }

    /// Drive the emitter until it finishes, is stopped, or `cancel` fires.
    ///
    /// Returns the number of records the producer accepted. The handle reports
    /// `Stopped` once this returns, or once the task is dropped after a panic.
    pub async fn run(self, cancel: CancellationToken) -> u64 {
        let started = EmitterStarted {
            emitter: &self.name,
            output: &self.output,
            frequency: self.period(),
            num: self.tick.num,
        };
        let span = started.span();

        self.drive(started, cancel).instrument(span).await
    }

    async fn drive(&self, started: EmitterStarted<'_>, cancel: CancellationToken) -> u64 {
        self.status.store(EmitterState::Running as u8, Ordering::SeqCst);
        let _stopped = StoppedOnDrop(self.status.clone());
        started.log();

        let mut records = 0;
        let reason = match self.period() {
            None => self
                .produce_tick(&cancel, &mut records)
                .await
                .unwrap_or(StopReason::Completed),
            Some(period) => self.run_periodic(period, &cancel, &mut records).await,
        };

        EmitterStopped {
            emitter: &self.name,
            reason,
            records,
        }
        .log();

        records
    }

    async fn run_periodic(
        &self,
        period: Duration,
        cancel: &CancellationToken,
        records: &mut u64,
    ) -> StopReason {
        // A first tick past the clock's range never fires.
        let Some(first_tick) = Instant::now().checked_add(period) else {
            return tokio::select! {
                biased;
                _ = cancel.cancelled() => StopReason::Cancelled,
                _ = self.stop.cancelled() => StopReason::StopSignal,
            };
        };

        let mut ticker = interval_at(first_tick, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return StopReason::Cancelled,
                _ = self.stop.cancelled() => return StopReason::StopSignal,
                _ = ticker.tick() => {
                    if let Some(reason) = self.produce_tick(cancel, records).await {
                        return reason;
                    }
                }
            }
        }
    }

    /// Produce `tick.num` records in sequence.
    ///
    /// Returns the stop reason when cancellation is observed between records.
    async fn produce_tick(&self, cancel: &CancellationToken, records: &mut u64) -> Option<StopReason> {
        for _ in 0..self.tick.num {
            if cancel.is_cancelled() {
                return Some(StopReason::Cancelled);
            }
            if self.stop.is_cancelled() {
                return Some(StopReason::StopSignal);
            }

            if self.produce_record(cancel).await {
                *records += 1;
            }
        }
        None
    }

    async fn produce_record(&self, cancel: &CancellationToken) -> bool {
        let iteration = self.state.begin_iteration();
        let context = RenderContext::new(self.state.clone(), iteration);

        let request = match self.render(&context) {
            Ok(request) => request,
            Err((template, error)) => {
                RenderFailed {
                    emitter: &self.name,
                    template,
                    error: &error,
                }
                .log();
                return false;
            }
        };

        match self.producer.produce(cancel, &request).await {
            Ok(response) => {
                self.state.record_produced(response.bytes);
                RecordProduced {
                    emitter: &self.name,
                    iteration,
                    bytes: response.bytes,
                }
                .log();
                true
            }
            Err(error) => {
                ProduceFailed {
                    emitter: &self.name,
                    output: &self.output,
                    error: &error,
                }
                .log();
                false
            }
        }
    }

    fn render(&self, context: &RenderContext) -> Result<ProduceRequest, (&'static str, TemplateError)> {
        let mut value = self
            .value_template
            .execute_with(context)
            .map_err(|e| ("value", e))?;
        if self.oneline {
            value.retain(|c| c != '\n');
        }

        let key = match &self.key_template {
            Some(template) => template.execute().map_err(|e| ("key", e))?,
            None => context.key().unwrap_or_default(),
        };

        Ok(ProduceRequest {
            key: key.into_bytes(),
            value: value.into_bytes(),
            headers: context.headers(),
            params: merge_parameters(&self.name, &self.static_params, &self.external_params),
        })
    }
}
