// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::backends::BackendFactory;
use crate::config::OutputConfig;
use crate::errors::BackendError;
use crate::observability::messages::backend::{
    BackendCloseFailed, BackendClosed, BackendCreated, BackendCreationFailed, BackendReused,
};
use crate::observability::messages::StructuredLog;
use crate::traits::Producer;

/// Live producers keyed by output name.
///
/// Holds at most one instance per output name: the first emitter that names
/// an output causes it to be constructed, later emitters share it.
#[derive(Default)]
pub struct ProducerRegistry(HashMap<String, Arc<dyn Producer>>);

impl ProducerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the producer for `output`, constructing it on first use.
    pub fn get_or_create(
        &mut self,
        output: &str,
        emitter: &str,
        config: &OutputConfig,
        factory: &dyn BackendFactory,
    ) -> Result<Arc<dyn Producer>, BackendError> {
        if let Some(existing) = self.0.get(output) {
            BackendReused { output, emitter }.log();
            return Ok(existing.clone());
        }

        let producer = factory.create(output, config).map_err(|error| {
            BackendCreationFailed {
                output,
                kind: config.kind,
                error: &error,
            }
            .log();
            error
        })?;

        BackendCreated {
            output,
            kind: config.kind,
        }
        .log();

        self.0.insert(output.to_string(), producer.clone());
        Ok(producer)
    }

    pub fn get(&self, output: &str) -> Option<&Arc<dyn Producer>> {
        self.0.get(output)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Close every producer once, draining the registry.
    ///
    /// Failures are logged and counted; every producer is attempted.
    pub async fn close_all(&mut self) -> usize {
        let mut failures = 0;

        for (output, producer) in self.0.drain() {
            match producer.close().await {
                Ok(()) => BackendClosed { output: &output }.log(),
                Err(error) => {
                    BackendCloseFailed {
                        output: &output,
                        error: &error,
                    }
                    .log();
                    failures += 1;
                }
            }
        }

        failures
    }
}

impl std::fmt::Debug for ProducerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProducerRegistry")
            .field("outputs", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}
