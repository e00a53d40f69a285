// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::state::GenerationState;

#[derive(Debug, Default)]
struct IterationLocal {
    key: Option<String>,
    headers: HashMap<String, String>,
}

/// Per-record binding handed to a template.
///
/// Layers record-local storage (key, headers) over the shared
/// [`GenerationState`] and remembers the global iteration index that was
/// current when the record began, so reference-row lookups stay on the
/// record's own row even while other emitters advance the index.
///
/// Clones share the same record-local storage.
#[derive(Debug, Clone)]
pub struct RenderContext {
    state: Arc<GenerationState>,
    iteration: u64,
    local: Arc<Mutex<IterationLocal>>,
}

impl RenderContext {
    pub fn new(state: Arc<GenerationState>, iteration: u64) -> Self {
        Self {
            state,
            iteration,
            local: Arc::new(Mutex::new(IterationLocal::default())),
        }
    }

    /// Context not tied to a started record; uses the latest iteration index.
    pub fn detached(state: Arc<GenerationState>) -> Self {
        let iteration = state.stats().current_iteration();
        Self::new(state, iteration)
    }

    pub fn state(&self) -> &Arc<GenerationState> {
        &self.state
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn set_key(&self, key: impl Into<String>) {
        self.local.lock().unwrap_or_else(PoisonError::into_inner).key = Some(key.into());
    }

    pub fn key(&self) -> Option<String> {
        self.local
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .key
            .clone()
    }

    pub fn set_header(&self, name: impl Into<String>, value: impl Into<String>) {
        self.local
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .headers
            .insert(name.into(), value.into());
    }

    pub fn headers(&self) -> HashMap<String, String> {
        self.local
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .headers
            .clone()
    }

    pub fn from_reference_row(&self, column: &str) -> Option<String> {
        self.state.from_reference_row_at(self.iteration, column)
    }
}
