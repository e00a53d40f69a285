// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Last-writer-wins cache of values produced earlier in a record, so related
/// generators (a name and an email built from it) stay consistent.
#[derive(Debug, Default)]
pub struct ContextCache {
    values: RwLock<HashMap<String, String>>,
}

impl ContextCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}
