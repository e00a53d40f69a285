// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::backends::native::NativeProducerFactory;
use crate::backends::script::ScriptProducer;
use crate::backends::wasm::WasmProducer;
use crate::config::{BackendKind, OutputConfig};
use crate::errors::BackendError;
use crate::traits::Producer;

/// Turns an output's configuration into a live producer.
pub trait BackendFactory: Send + Sync {
    fn create(&self, output: &str, config: &OutputConfig) -> Result<Arc<dyn Producer>, BackendError>;
}

/// Dispatches on [`BackendKind`]: native implementations by name, Rhai
/// scripts, or WASM modules.
#[derive(Clone)]
pub struct DefaultBackendFactory {
    native: NativeProducerFactory,
}

impl DefaultBackendFactory {
    pub fn new(native: NativeProducerFactory) -> Self {
        Self { native }
    }

    pub fn native(&self) -> &NativeProducerFactory {
        &self.native
    }
}

impl Default for DefaultBackendFactory {
    fn default() -> Self {
        Self::new(NativeProducerFactory::with_builtins())
    }
}

impl BackendFactory for DefaultBackendFactory {
    fn create(&self, output: &str, config: &OutputConfig) -> Result<Arc<dyn Producer>, BackendError> {
        match config.kind {
            BackendKind::Native => self.native.create_producer(output, &config.config),
            BackendKind::Script => Ok(Arc::new(ScriptProducer::from_config(output, &config.config)?)),
            BackendKind::Wasm => Ok(Arc::new(WasmProducer::from_config(output, &config.config)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dispatch_by_kind() {
        let factory = DefaultBackendFactory::default();

        let native = factory
            .create("console", &OutputConfig::native("console"))
            .unwrap();
        assert_eq!(native.kind(), BackendKind::Native);

        let script = factory
            .create(
                "audit",
                &OutputConfig {
                    kind: BackendKind::Script,
                    config: json!({ "script": "v" }),
                },
            )
            .unwrap();
        assert_eq!(script.kind(), BackendKind::Script);
    }

    #[test]
    fn test_construction_errors_surface() {
        let factory = DefaultBackendFactory::default();
        let cases = vec![
            OutputConfig::native("kafka"),
            OutputConfig {
                kind: BackendKind::Script,
                config: json!({}),
            },
            OutputConfig {
                kind: BackendKind::Wasm,
                config: json!({ "module_path": "/no/such/module.wasm" }),
            },
        ];

        for config in cases {
            let error = factory.create("out", &config).err().unwrap();
            assert!(error.is_construction_error(), "{}", error);
        }
    }
}
