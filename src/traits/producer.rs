// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

use crate::config::BackendKind;
use crate::errors::BackendError;

/// One rendered record on its way to an output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProduceRequest {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub headers: HashMap<String, String>,
    pub params: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProduceResponse {
    /// Bytes accounted to the run's cumulative byte counter.
    pub bytes: u64,
    pub message: String,
}

impl ProduceResponse {
    pub fn with_bytes(bytes: u64) -> Self {
        Self {
            bytes,
            message: String::new(),
        }
    }
}

/// Uniform contract every output backend satisfies.
///
/// One instance exists per output name and is shared by every emitter that
/// targets it, so implementations must tolerate concurrent `produce` calls.
/// `close` is called exactly once, after the last `produce`.
#[async_trait]
pub trait Producer: Send + Sync {
    async fn produce(
        &self,
        cancel: &CancellationToken,
        request: &ProduceRequest,
    ) -> Result<ProduceResponse, BackendError>;

    async fn close(&self) -> Result<(), BackendError> {
        Ok(())
    }

    fn kind(&self) -> BackendKind;
}
