// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Test doubles for producers and backend factories.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::backends::BackendFactory;
use crate::config::{BackendKind, OutputConfig};
use crate::errors::BackendError;
use crate::traits::{ProduceRequest, ProduceResponse, Producer};

/// One delivered record as seen by a [`RecordingProducer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub output: String,
    pub key: String,
    pub value: String,
    pub request: ProduceRequest,
    pub at: Instant,
}

pub type RecordLog = Arc<Mutex<Vec<Recorded>>>;

/// Records every request; fails any record whose value is `"fail"`.
pub struct RecordingProducer {
    output: String,
    log: RecordLog,
    closed: Arc<AtomicUsize>,
}

impl RecordingProducer {
    pub fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
            log: Arc::default(),
            closed: Arc::default(),
        }
    }

    pub fn records(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Producer for RecordingProducer {
    async fn produce(
        &self,
        _cancel: &CancellationToken,
        request: &ProduceRequest,
    ) -> Result<ProduceResponse, BackendError> {
        if request.value == b"fail" {
            return Err(BackendError::produce(&self.output, "rejected by test producer"));
        }

        self.log.lock().unwrap().push(Recorded {
            output: self.output.clone(),
            key: String::from_utf8_lossy(&request.key).into_owned(),
            value: String::from_utf8_lossy(&request.value).into_owned(),
            request: request.clone(),
            at: Instant::now(),
        });

        Ok(ProduceResponse::with_bytes(request.value.len() as u64))
    }

    async fn close(&self) -> Result<(), BackendError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }
}

/// Producer whose `close` always fails.
pub struct FailingCloseProducer;

#[async_trait]
impl Producer for FailingCloseProducer {
    async fn produce(
        &self,
        _cancel: &CancellationToken,
        _request: &ProduceRequest,
    ) -> Result<ProduceResponse, BackendError> {
        Ok(ProduceResponse::default())
    }

    async fn close(&self) -> Result<(), BackendError> {
        Err(BackendError::Close {
            output: "broken".to_string(),
            reason: "test close failure".to_string(),
        })
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }
}

/// Producer that panics on every record.
pub struct PanickingProducer;

#[async_trait]
impl Producer for PanickingProducer {
    async fn produce(
        &self,
        _cancel: &CancellationToken,
        _request: &ProduceRequest,
    ) -> Result<ProduceResponse, BackendError> {
        panic!("test producer panicked");
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }
}

/// Factory producing [`RecordingProducer`]s that share one record log and
/// count constructions and closes.
#[derive(Default)]
pub struct CountingFactory {
    constructed: AtomicUsize,
    closed: Arc<AtomicUsize>,
    log: RecordLog,
    fail_on: Option<String>,
}

impl CountingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every construction fails.
    pub fn failing() -> Self {
        Self::failing_for("")
    }

    /// Construction of `output` fails; an empty name fails every output.
    pub fn failing_for(output: &str) -> Self {
        Self {
            fail_on: Some(output.to_string()),
            ..Self::default()
        }
    }

    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }
}

impl BackendFactory for CountingFactory {
    fn create(&self, output: &str, _config: &OutputConfig) -> Result<Arc<dyn Producer>, BackendError> {
        if let Some(fail_on) = &self.fail_on {
            if fail_on.is_empty() || fail_on == output {
                return Err(BackendError::Configuration {
                    output: output.to_string(),
                    reason: "test construction failure".to_string(),
                });
            }
        }

        self.constructed.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(RecordingProducer {
            output: output.to_string(),
            log: self.log.clone(),
            closed: self.closed.clone(),
        }))
    }
}
