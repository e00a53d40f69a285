// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use rhai::{Dynamic, Engine, Map, Scope, AST};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::config::BackendKind;
use crate::errors::BackendError;
use crate::observability::messages::{backend::ScriptCompiled, StructuredLog};
use crate::traits::{ProduceRequest, ProduceResponse, Producer};

#[derive(Debug, Default, Deserialize)]
struct ScriptConfig {
    #[serde(default)]
    script: Option<String>,
    #[serde(default)]
    script_file: Option<PathBuf>,
}

/// Runs a Rhai script once per record.
///
/// The script is compiled once. Every `produce` builds a fresh engine and
/// scope binding `k`, `v` (strings), `headers` and `params` (maps), so nothing
/// a script does in one call is visible to the next. The script's final value
/// becomes the response message.
pub struct ScriptProducer {
    output: String,
    ast: AST,
}

impl ScriptProducer {
    /// `script_file` takes precedence over an inline `script`.
    pub fn from_config(output: &str, config: &serde_json::Value) -> Result<Self, BackendError> {
        let cfg: ScriptConfig = if config.is_null() {
            ScriptConfig::default()
        } else {
            serde_json::from_value(config.clone()).map_err(|e| BackendError::Configuration {
                output: output.to_string(),
                reason: e.to_string(),
            })?
        };

        let (source, origin) = match (cfg.script_file, cfg.script) {
            (Some(path), _) => {
                let source = std::fs::read_to_string(&path).map_err(|e| {
                    BackendError::Configuration {
                        output: output.to_string(),
                        reason: format!("cannot read script file '{}': {}", path.display(), e),
                    }
                })?;
                (source, path.display().to_string())
            }
            (None, Some(source)) => (source, "inline script".to_string()),
            (None, None) => {
                return Err(BackendError::Configuration {
                    output: output.to_string(),
                    reason: "script output needs 'script' or 'script_file'".to_string(),
                })
            }
        };

        Self::compile(output, &source, &origin)
    }

    pub fn compile(output: &str, source: &str, origin: &str) -> Result<Self, BackendError> {
        let ast = sandbox_engine()
            .compile(source)
            .map_err(|e| BackendError::Compile {
                output: output.to_string(),
                reason: e.to_string(),
            })?;

        ScriptCompiled {
            output,
            source: origin,
        }
        .log();

        Ok(Self {
            output: output.to_string(),
            ast,
        })
    }
}

fn sandbox_engine() -> Engine {
    let mut engine = Engine::new();
    engine.set_max_expr_depths(64, 64);
    engine.set_max_call_levels(32);
    engine.set_max_operations(1_000_000);
    engine.set_max_string_size(10_000_000);
    engine
}

fn to_map(entries: &HashMap<String, String>) -> Map {
    entries
        .iter()
        .map(|(k, v)| (k.as_str().into(), Dynamic::from(v.clone())))
        .collect()
}

#[async_trait]
impl Producer for ScriptProducer {
    async fn produce(
        &self,
        _cancel: &CancellationToken,
        request: &ProduceRequest,
    ) -> Result<ProduceResponse, BackendError> {
        let engine = sandbox_engine();
        let mut scope = Scope::new();
        scope.push("k", String::from_utf8_lossy(&request.key).into_owned());
        scope.push("v", String::from_utf8_lossy(&request.value).into_owned());
        scope.push("headers", to_map(&request.headers));
        scope.push("params", to_map(&request.params));

        let result = engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, &self.ast)
            .map_err(|e| BackendError::produce(&self.output, e))?;

        let message = if result.is_unit() {
            String::new()
        } else {
            result.to_string()
        };

        Ok(ProduceResponse {
            bytes: request.value.len() as u64,
            message,
        })
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Script
    }
}
