// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;

use crate::config::BackendKind;
use crate::errors::BackendError;
use crate::traits::{ProduceRequest, ProduceResponse, Producer};

/// Accepts every record and only counts it. Useful for load testing templates.
#[derive(Default)]
pub struct DiscardProducer {
    records: AtomicU64,
}

impl DiscardProducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> u64 {
        self.records.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Producer for DiscardProducer {
    async fn produce(
        &self,
        _cancel: &CancellationToken,
        request: &ProduceRequest,
    ) -> Result<ProduceResponse, BackendError> {
        let seen = self.records.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(ProduceResponse {
            bytes: request.value.len() as u64,
            message: format!("discarded {}", seen),
        })
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }
}
