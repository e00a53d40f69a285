// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use wasmtime::{Engine, InstancePre, Linker, Memory, Module, Store, TypedFunc};
use wasmtime_wasi::p1::{self, WasiP1Ctx};
use wasmtime_wasi::WasiCtxBuilder;

use super::detector::{detect_binary_kind, BinaryKind};
use super::error::{WasmError, WasmResult, WASM_UNSUPPORTED_ENCODING};
use super::loader::{create_engine, load_wasm_bytes};
use crate::config::consts::{DEFAULT_FUEL_LEVEL, MAX_FUEL_LEVEL, MIN_FUEL_LEVEL};
use crate::config::BackendKind;
use crate::errors::BackendError;
use crate::traits::{ProduceRequest, ProduceResponse, Producer};

const REQUIRED_EXPORTS: [&str; 3] = ["memory", "allocate", "produce"];

#[derive(Debug, Deserialize)]
struct WasmConfig {
    module_path: PathBuf,
    #[serde(default)]
    bind_stdout: bool,
    #[serde(default)]
    fuel: Option<u64>,
}

type ProduceFn = TypedFunc<(i32, i32, i32, i32, i32, i32), i32>;

/// Runs a core WASM module once per record.
///
/// Module contract:
/// - exports `memory`
/// - exports `allocate(len: i32) -> i32`, returning a pointer to `len` writable bytes
/// - exports `produce(key_ptr, key_len, value_ptr, value_len, headers_ptr, headers_len) -> i32`,
///   returning 0 on success; headers arrive as a JSON object
///
/// The module is compiled and linked against WASI preview1 once. Each call
/// gets its own store, instance and fuel budget. The module's stdout reaches
/// the host only with `bind_stdout`.
pub struct WasmProducer {
    output: String,
    engine: Engine,
    instance_pre: InstancePre<WasiP1Ctx>,
    bind_stdout: bool,
    fuel: u64,
}

impl WasmProducer {
    pub fn from_config(output: &str, config: &serde_json::Value) -> Result<Self, BackendError> {
        let cfg: WasmConfig =
            serde_json::from_value(config.clone()).map_err(|e| BackendError::Configuration {
                output: output.to_string(),
                reason: format!("wasm output needs a 'module_path': {}", e),
            })?;

        let bytes = load_wasm_bytes(&cfg.module_path).map_err(|e| e.into_load_error(output))?;
        Self::from_bytes(output, &bytes, cfg.bind_stdout, cfg.fuel)
    }

    pub fn from_bytes(
        output: &str,
        bytes: &[u8],
        bind_stdout: bool,
        fuel: Option<u64>,
    ) -> Result<Self, BackendError> {
        let (engine, instance_pre) =
            Self::prepare(bytes).map_err(|e| e.into_load_error(output))?;

        Ok(Self {
            output: output.to_string(),
            engine,
            instance_pre,
            bind_stdout,
            fuel: fuel
                .unwrap_or(DEFAULT_FUEL_LEVEL)
                .clamp(MIN_FUEL_LEVEL, MAX_FUEL_LEVEL),
        })
    }

    pub fn fuel(&self) -> u64 {
        self.fuel
    }

    fn prepare(bytes: &[u8]) -> WasmResult<(Engine, InstancePre<WasiP1Ctx>)> {
        if detect_binary_kind(bytes)? == BinaryKind::Component {
            return Err(WasmError::UnsupportedEncoding(
                WASM_UNSUPPORTED_ENCODING.to_string(),
            ));
        }

        let engine = create_engine()?;
        let module = Module::new(&engine, bytes)?;

        for name in REQUIRED_EXPORTS {
            if module.get_export(name).is_none() {
                return Err(WasmError::ModuleError(format!(
                    "module must export '{}'",
                    name
                )));
            }
        }

        let mut linker: Linker<WasiP1Ctx> = Linker::new(&engine);
        p1::add_to_linker_sync(&mut linker, |cx| cx)?;
        let instance_pre = linker.instantiate_pre(&module)?;

        Ok((engine, instance_pre))
    }

    fn call(&self, request: &ProduceRequest) -> WasmResult<()> {
        let mut wasi = WasiCtxBuilder::new();
        if self.bind_stdout {
            wasi.inherit_stdout();
        }

        let mut store = Store::new(&self.engine, wasi.build_p1());
        store.set_fuel(self.fuel)?;

        let instance = self.instance_pre.instantiate(&mut store)?;
        let memory = instance
            .get_memory(&mut store, "memory")
            .ok_or_else(|| WasmError::ModuleError("module must export 'memory'".to_string()))?;
        let allocate = instance.get_typed_func::<i32, i32>(&mut store, "allocate")?;
        let produce: ProduceFn = instance.get_typed_func(&mut store, "produce")?;

        let headers = serde_json::to_vec(&request.headers)
            .map_err(|e| WasmError::ValidationError(e.to_string()))?;

        let (key_ptr, key_len) = write_input(&mut store, &memory, &allocate, &request.key)?;
        let (value_ptr, value_len) = write_input(&mut store, &memory, &allocate, &request.value)?;
        let (headers_ptr, headers_len) = write_input(&mut store, &memory, &allocate, &headers)?;

        let status = produce.call(
            &mut store,
            (key_ptr, key_len, value_ptr, value_len, headers_ptr, headers_len),
        )?;

        match status {
            0 => Ok(()),
            other => Err(WasmError::NonZeroStatus(other)),
        }
    }
}

fn write_input(
    store: &mut Store<WasiP1Ctx>,
    memory: &Memory,
    allocate: &TypedFunc<i32, i32>,
    bytes: &[u8],
) -> WasmResult<(i32, i32)> {
    let len = i32::try_from(bytes.len())
        .map_err(|_| WasmError::ValidationError(format!("input of {} bytes", bytes.len())))?;

    let ptr = allocate.call(&mut *store, len)?;
    if ptr == 0 && len > 0 {
        return Err(WasmError::MemoryError(format!(
            "allocate({}) returned a null pointer",
            len
        )));
    }

    memory
        .write(&mut *store, ptr as usize, bytes)
        .map_err(|e| WasmError::MemoryError(e.to_string()))?;

    Ok((ptr, len))
}

#[async_trait]
impl Producer for WasmProducer {
    async fn produce(
        &self,
        _cancel: &CancellationToken,
        request: &ProduceRequest,
    ) -> Result<ProduceResponse, BackendError> {
        self.call(request)
            .map_err(|e| e.into_produce_error(&self.output))?;

        Ok(ProduceResponse::with_bytes(request.value.len() as u64))
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Wasm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BUMP_ALLOCATOR: &str = r#"
      (memory (export "memory") 1)
      (global $next (mut i32) (i32.const 1024))
      (func (export "allocate") (param $len i32) (result i32)
        (local $ptr i32)
        (local.set $ptr (global.get $next))
        (global.set $next (i32.add (global.get $next) (local.get $len)))
        (local.get $ptr))
    "#;

    /// Fails (status 1) on an empty value, succeeds otherwise.
    fn rejecting_empty_values() -> Vec<u8> {
        wat::parse_str(format!(
            r#"(module
              {}
              (func (export "produce")
                (param i32 i32 i32 i32 i32 i32) (result i32)
                (i32.eqz (local.get 3))))"#,
            BUMP_ALLOCATOR
        ))
        .unwrap()
    }

    fn request(value: &str) -> ProduceRequest {
        ProduceRequest {
            key: b"k".to_vec(),
            value: value.as_bytes().to_vec(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_produce_status_is_honoured() {
        let producer = WasmProducer::from_bytes("sink", &rejecting_empty_values(), false, None).unwrap();
        let cancel = CancellationToken::new();

        let ok = producer.produce(&cancel, &request("hello")).await.unwrap();
        assert_eq!(ok.bytes, 5);

        let failed = producer.produce(&cancel, &request("")).await;
        assert!(matches!(failed, Err(BackendError::Produce { .. })));
        assert_eq!(producer.kind(), BackendKind::Wasm);
    }

    #[tokio::test]
    async fn test_inputs_are_written_to_module_memory() {
        // Succeeds only if the first value byte is 'x' and headers start with '{'.
        let bytes = wat::parse_str(format!(
            r#"(module
              {}
              (func (export "produce")
                (param $kp i32) (param $kl i32) (param $vp i32) (param $vl i32)
                (param $hp i32) (param $hl i32) (result i32)
                (if (result i32)
                  (i32.and
                    (i32.eq (i32.load8_u (local.get $vp)) (i32.const 120))
                    (i32.eq (i32.load8_u (local.get $hp)) (i32.const 123)))
                  (then (i32.const 0))
                  (else (i32.const 2)))))"#,
            BUMP_ALLOCATOR
        ))
        .unwrap();
        let producer = WasmProducer::from_bytes("sink", &bytes, false, None).unwrap();
        let cancel = CancellationToken::new();

        assert!(producer.produce(&cancel, &request("xyz")).await.is_ok());
        assert!(producer.produce(&cancel, &request("abc")).await.is_err());
    }

    #[tokio::test]
    async fn test_wasi_stdout_is_linked() {
        let bytes = wat::parse_str(format!(
            r#"(module
              (import "wasi_snapshot_preview1" "fd_write"
                (func $fd_write (param i32 i32 i32 i32) (result i32)))
              {}
              (func (export "produce")
                (param $kp i32) (param $kl i32) (param $vp i32) (param $vl i32)
                (param $hp i32) (param $hl i32) (result i32)
                (i32.store (i32.const 0) (local.get $vp))
                (i32.store (i32.const 4) (local.get $vl))
                (drop (call $fd_write (i32.const 1) (i32.const 0) (i32.const 1) (i32.const 8)))
                (i32.const 0)))"#,
            BUMP_ALLOCATOR
        ))
        .unwrap();

        let producer = WasmProducer::from_bytes("sink", &bytes, false, None).unwrap();
        let response = producer
            .produce(&CancellationToken::new(), &request("quiet"))
            .await
            .unwrap();
        assert_eq!(response.bytes, 5);
    }

    #[tokio::test]
    async fn test_fuel_exhaustion_is_a_produce_error() {
        let bytes = wat::parse_str(format!(
            r#"(module
              {}
              (func (export "produce")
                (param i32 i32 i32 i32 i32 i32) (result i32)
                (loop $spin (br $spin))
                (i32.const 0)))"#,
            BUMP_ALLOCATOR
        ))
        .unwrap();

        let producer = WasmProducer::from_bytes("sink", &bytes, false, Some(1)).unwrap();
        assert_eq!(producer.fuel(), MIN_FUEL_LEVEL);

        let result = producer.produce(&CancellationToken::new(), &request("v")).await;
        assert!(matches!(result, Err(BackendError::Produce { .. })));
    }

    #[test]
    fn test_fuel_is_clamped() {
        let bytes = rejecting_empty_values();
        let cases = vec![
            (None, DEFAULT_FUEL_LEVEL),
            (Some(0), MIN_FUEL_LEVEL),
            (Some(u64::MAX), MAX_FUEL_LEVEL),
            (Some(2_000_000), 2_000_000),
        ];

        for (requested, expected) in cases {
            let producer = WasmProducer::from_bytes("sink", &bytes, false, requested).unwrap();
            assert_eq!(producer.fuel(), expected);
        }
    }

    #[test]
    fn test_missing_exports_fail_at_load() {
        let bytes = wat::parse_str(r#"(module (memory (export "memory") 1))"#).unwrap();
        let result = WasmProducer::from_bytes("sink", &bytes, false, None);

        match result {
            Err(BackendError::Load { reason, .. }) => assert!(reason.contains("allocate")),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected a load error"),
        }
    }

    #[test]
    fn test_component_is_rejected() {
        let bytes = wat::parse_str("(component)").unwrap();
        let result = WasmProducer::from_bytes("sink", &bytes, false, None);
        assert!(matches!(result, Err(BackendError::Load { .. })));
    }

    #[test]
    fn test_from_config_reads_module_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&rejecting_empty_values()).unwrap();

        let producer = WasmProducer::from_config(
            "sink",
            &json!({ "module_path": file.path(), "bind_stdout": true, "fuel": 5_000_000 }),
        )
        .unwrap();
        assert_eq!(producer.fuel(), 5_000_000);
    }

    #[test]
    fn test_from_config_errors() {
        let missing_path = WasmProducer::from_config("sink", &json!({}));
        assert!(matches!(missing_path, Err(BackendError::Configuration { .. })));

        let missing_file =
            WasmProducer::from_config("sink", &json!({ "module_path": "/no/such/module.wasm" }));
        assert!(matches!(missing_file, Err(BackendError::Load { .. })));
    }
}
