// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Named monotonic counters.
///
/// The first read of a name registers it at `start`; every later read adds
/// `step` and returns the new value, wrapping at the `i64` bounds. Reads are
/// serialised by a single lock so concurrent callers never observe a lost
/// update.
#[derive(Debug, Default)]
pub struct CounterMap {
    counters: Mutex<HashMap<String, i64>>,
}

impl CounterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, name: &str, start: i64, step: i64) -> i64 {
        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        match counters.get_mut(name) {
            Some(value) => {
                *value = value.wrapping_add(step);
                *value
            }
            None => {
                counters.insert(name.to_string(), start);
                start
            }
        }
    }

    /// Last value handed out for `name`, without advancing it.
    pub fn current(&self, name: &str) -> Option<i64> {
        self.counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
    }
}
