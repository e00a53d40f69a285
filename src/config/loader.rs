// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::native::NativeProducerFactory;
use crate::config::consts::DEFAULT_OUTPUT;
use crate::config::duration::deserialize_frequency;
use crate::errors::SchedulerError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for a generation run.
///
/// It declares the outputs records can be sent to and the emitters that
/// produce them. It is typically loaded from a YAML configuration file.
///
/// # Example
/// ```yaml
/// outputs:
///   audit:
///     kind: script
///     config:
///       script: 'print(k + " " + v)'
/// emitters:
///   - name: users
///     value_template: '{"id": {{ counter("user", 1, 1) }}}'
///     output: audit
///     tick:
///       frequency: 1s
///       num: 5
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub outputs: HashMap<String, OutputConfig>,
    #[serde(default)]
    pub emitters: Vec<EmitterConfig>,
}

/// Backend execution model for an output.
///
/// # Variants
/// * `Native` - In-process Rust producer
/// * `Script` - Rhai script evaluated in a fresh interpreter per record
/// * `Wasm` - WebAssembly module instantiated in a fresh store per record
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Native,
    Script,
    Wasm,
}

/// Configuration for one named output.
///
/// `config` is opaque here; each backend kind decodes its own shape from it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputConfig {
    pub kind: BackendKind,
    #[serde(default)]
    pub config: serde_json::Value,
}

impl OutputConfig {
    /// Native output bound to a registered implementation name.
    pub fn native(impl_name: &str) -> Self {
        Self {
            kind: BackendKind::Native,
            config: serde_json::json!({ "impl": impl_name }),
        }
    }
}

/// Configuration for a single emitter.
///
/// # Fields
/// * `name` - Unique emitter name, also used to namespace external parameters
/// * `value_template` / `value_template_file` - Source of the value template (exactly one)
/// * `key_template` - Optional key template; without it the key comes from the render context
/// * `output` - Output name records are sent to (defaults to `console`)
/// * `tick` - Frequency and records per tick
/// * `oneline` - Strip newlines from rendered values
/// * `config_parameters` - Static parameters handed to the backend on every record
#[derive(Debug, Clone, Deserialize)]
pub struct EmitterConfig {
    pub name: String,
    #[serde(default)]
    pub value_template: Option<String>,
    #[serde(default)]
    pub value_template_file: Option<PathBuf>,
    #[serde(default)]
    pub key_template: Option<String>,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default)]
    pub tick: TickConfig,
    #[serde(default)]
    pub oneline: bool,
    #[serde(default)]
    pub config_parameters: HashMap<String, String>,
}

impl EmitterConfig {
    /// Emitter with an inline value template that runs once and produces one record.
    pub fn inline(name: &str, value_template: &str, output: &str) -> Self {
        Self {
            name: name.to_string(),
            value_template: Some(value_template.to_string()),
            value_template_file: None,
            key_template: None,
            output: output.to_string(),
            tick: TickConfig::default(),
            oneline: false,
            config_parameters: HashMap::new(),
        }
    }

    pub fn with_key_template(mut self, key_template: &str) -> Self {
        self.key_template = Some(key_template.to_string());
        self
    }

    pub fn with_tick(mut self, frequency: Option<Duration>, num: usize) -> Self {
        self.tick = TickConfig { frequency, num };
        self
    }

    pub fn with_oneline(mut self, oneline: bool) -> Self {
        self.oneline = oneline;
        self
    }

    pub fn with_parameter(mut self, key: &str, value: &str) -> Self {
        self.config_parameters
            .insert(key.to_string(), value.to_string());
        self
    }
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

/// How often an emitter fires and how many records it produces each time.
///
/// A missing or zero `frequency` means the emitter runs exactly once.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TickConfig {
    #[serde(default, deserialize_with = "deserialize_frequency")]
    pub frequency: Option<Duration>,
    #[serde(default = "default_num")]
    pub num: usize,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            frequency: None,
            num: default_num(),
        }
    }
}

fn default_num() -> usize {
    1
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load and validate a config from a YAML file
///
/// Outputs are checked against the built-in native producers; embedders that
/// register extra native producers should call `validate_config` themselves.
pub fn load_and_validate_config<P: AsRef<Path>>(
    path: P,
) -> Result<Config, Box<dyn std::error::Error>> {
    let cfg = load_config(path)?;

    let natives = NativeProducerFactory::with_builtins().list_available_implementations();
    if let Err(validation_errors) = crate::config::validate_config(&cfg, &natives) {
        return Err(SchedulerError::Validation(validation_errors).into());
    }

    Ok(cfg)
}
