// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::BackendKind;
use crate::errors::BackendError;
use crate::traits::{ProduceRequest, ProduceResponse, Producer};

#[derive(Debug, Deserialize)]
struct FileConfig {
    path: PathBuf,
}

/// Appends each record's value as one line to `config.path`.
pub struct FileProducer {
    output: String,
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileProducer {
    pub fn from_config(output: &str, config: &serde_json::Value) -> Result<Self, BackendError> {
        let cfg: FileConfig =
            serde_json::from_value(config.clone()).map_err(|e| BackendError::Configuration {
                output: output.to_string(),
                reason: format!("file output needs a 'path': {}", e),
            })?;

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&cfg.path)
            .map_err(|e| BackendError::Configuration {
                output: output.to_string(),
                reason: format!("cannot open '{}': {}", cfg.path.display(), e),
            })?;

        Ok(Self {
            output: output.to_string(),
            path: cfg.path,
            writer: Mutex::new(BufWriter::new(File::from_std(file))),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl Producer for FileProducer {
    async fn produce(
        &self,
        _cancel: &CancellationToken,
        request: &ProduceRequest,
    ) -> Result<ProduceResponse, BackendError> {
        let mut writer = self.writer.lock().await;
        writer
            .write_all(&request.value)
            .await
            .map_err(|e| BackendError::produce(&self.output, e))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| BackendError::produce(&self.output, e))?;

        Ok(ProduceResponse::with_bytes(request.value.len() as u64))
    }

    async fn close(&self) -> Result<(), BackendError> {
        self.writer
            .lock()
            .await
            .flush()
            .await
            .map_err(|e| BackendError::Close {
                output: self.output.clone(),
                reason: e.to_string(),
            })
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }
}
