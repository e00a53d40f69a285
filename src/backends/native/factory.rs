// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use super::producers::{ConsoleProducer, DiscardProducer, FileProducer};
use crate::errors::BackendError;
use crate::traits::Producer;

/// Builds a native producer for an output from its configuration payload.
pub type NativeConstructor =
    Arc<dyn Fn(&str, &serde_json::Value) -> Result<Arc<dyn Producer>, BackendError> + Send + Sync>;

/// Factory for in-process producers, keyed by implementation name.
///
/// The implementation name is taken from the `impl` field of the output's
/// configuration payload and defaults to the output name:
/// - "console" -> [`ConsoleProducer`]
/// - "discard" -> [`DiscardProducer`]
/// - "file" -> [`FileProducer`] (requires `path`)
///
/// Embedders can [`register`](Self::register) further implementations.
#[derive(Clone, Default)]
pub struct NativeProducerFactory {
    constructors: HashMap<String, NativeConstructor>,
}

impl NativeProducerFactory {
    /// Factory with no implementations registered.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.register("console", console);
        factory.register("discard", discard);
        factory.register("file", file);
        factory
    }

    /// Register (or replace) an implementation.
    pub fn register<F>(&mut self, impl_name: &str, constructor: F)
    where
        F: Fn(&str, &serde_json::Value) -> Result<Arc<dyn Producer>, BackendError>
            + Send
            + Sync
            + 'static,
    {
        self.constructors
            .insert(impl_name.to_string(), Arc::new(constructor));
    }

    /// Create the producer for `output`.
    pub fn create_producer(
        &self,
        output: &str,
        config: &serde_json::Value,
    ) -> Result<Arc<dyn Producer>, BackendError> {
        let impl_name = config
            .get("impl")
            .and_then(|v| v.as_str())
            .unwrap_or(output);

        let constructor = self
            .constructors
            .get(impl_name)
            .ok_or_else(|| BackendError::UnknownNative(impl_name.to_string()))?;

        constructor(output, config)
    }

    /// Registered implementation names, sorted.
    pub fn list_available_implementations(&self) -> Vec<String> {
        let mut names: Vec<String> = self.constructors.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_implementation_available(&self, impl_name: &str) -> bool {
        self.constructors.contains_key(impl_name)
    }
}

fn console(output: &str, _: &serde_json::Value) -> Result<Arc<dyn Producer>, BackendError> {
    Ok(Arc::new(ConsoleProducer::new(output)))
}

fn discard(_: &str, _: &serde_json::Value) -> Result<Arc<dyn Producer>, BackendError> {
    Ok(Arc::new(DiscardProducer::new()))
}

fn file(output: &str, config: &serde_json::Value) -> Result<Arc<dyn Producer>, BackendError> {
    Ok(Arc::new(FileProducer::from_config(output, config)?))
}
