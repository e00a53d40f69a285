// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use rand::Rng;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Append-only named lists with random and indexed draws.
///
/// Appends and draws on the same store are serialised, so a draw never sees
/// a list mid-append.
#[derive(Debug, Default)]
pub struct ListStore {
    lists: Mutex<HashMap<String, Vec<String>>>,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, name: &str, value: impl Into<String>) {
        self.lists
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .push(value.into());
    }

    pub fn len(&self, name: &str) -> usize {
        self.lists
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or(0, Vec::len)
    }

    /// Uniformly random item, `None` for a missing or empty list.
    pub fn random(&self, name: &str) -> Option<String> {
        let lists = self.lists.lock().unwrap_or_else(PoisonError::into_inner);
        let list = lists.get(name).filter(|l| !l.is_empty())?;
        let index = rand::rng().random_range(0..list.len());
        Some(list[index].clone())
    }

    pub fn at(&self, name: &str, index: usize) -> Option<String> {
        self.lists
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .and_then(|list| list.get(index))
            .cloned()
    }

    /// `min(n, len)` items drawn from distinct positions, uniformly without replacement.
    pub fn random_n(&self, name: &str, n: usize) -> Vec<String> {
        let lists = self.lists.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(list) = lists.get(name) else {
            return Vec::new();
        };

        let amount = n.min(list.len());
        rand::seq::index::sample(&mut rand::rng(), list.len(), amount)
            .into_iter()
            .map(|i| list[i].clone())
            .collect()
    }
}
