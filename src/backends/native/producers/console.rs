// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use tokio_util::sync::CancellationToken;

use crate::config::BackendKind;
use crate::errors::BackendError;
use crate::traits::{ProduceRequest, ProduceResponse, Producer};

/// Writes `key value` lines to stdout, prefixed by `[name=value,...]` when
/// the record carries headers.
pub struct ConsoleProducer {
    output: String,
}

impl ConsoleProducer {
    pub fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
        }
    }
}

pub(crate) fn format_line(request: &ProduceRequest) -> String {
    let key = String::from_utf8_lossy(&request.key);
    let value = String::from_utf8_lossy(&request.value);

    let mut line = String::new();
    if !request.headers.is_empty() {
        line.push('[');
        line.push_str(&format_headers(&request.headers));
        line.push_str("] ");
    }
    if !key.is_empty() {
        line.push_str(&key);
        line.push(' ');
    }
    line.push_str(&value);
    line
}

fn format_headers(headers: &HashMap<String, String>) -> String {
    let mut pairs: Vec<_> = headers.iter().collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl Producer for ConsoleProducer {
    async fn produce(
        &self,
        _cancel: &CancellationToken,
        request: &ProduceRequest,
    ) -> Result<ProduceResponse, BackendError> {
        let line = format_line(request);

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line).map_err(|e| BackendError::produce(&self.output, e))?;

        Ok(ProduceResponse::with_bytes(request.value.len() as u64))
    }

    async fn close(&self) -> Result<(), BackendError> {
        std::io::stdout().flush().map_err(|e| BackendError::Close {
            output: self.output.clone(),
            reason: e.to_string(),
        })
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }
}
