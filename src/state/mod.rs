// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Process-wide generation state shared by every running emitter.
//!
//! A single [`GenerationState`] is created by whoever drives a run and handed
//! out as `Arc<GenerationState>` to emitters and render contexts. Each concern
//! (counters, context values, lists, reference rows, stats) sits behind its own
//! lock, so a write to one never contends with another.
//!
//! # Example
//! ```
//! use synthgen::state::GenerationState;
//!
//! let state = GenerationState::new();
//! assert_eq!(state.counter("id", 100, 10), 100);
//! assert_eq!(state.counter("id", 100, 10), 110);
//!
//! state.add_value_to_list("cities", "Oslo");
//! assert_eq!(state.value_from_list_at("cities", 0).as_deref(), Some("Oslo"));
//! ```

mod context;
mod counters;
mod lists;
mod reference;
mod stats;

pub use context::ContextCache;
pub use counters::CounterMap;
pub use lists::ListStore;
pub use reference::{read_csv, ReferenceRow, ReferenceRows};
pub use stats::{ExecutionStats, StatsSnapshot};

use std::path::Path;

#[derive(Debug, Default)]
pub struct GenerationState {
    counters: CounterMap,
    context: ContextCache,
    lists: ListStore,
    reference: ReferenceRows,
    stats: ExecutionStats,
}

impl GenerationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `start` the first time `name` is seen, then advances by `step`.
    pub fn counter(&self, name: &str, start: i64, step: i64) -> i64 {
        self.counters.next(name, start, step)
    }

    pub fn set_value(&self, key: &str, value: impl Into<String>) {
        self.context.set(key, value);
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.context.get(key)
    }

    pub fn add_value_to_list(&self, name: &str, value: impl Into<String>) {
        self.lists.add(name, value);
    }

    pub fn random_value_from_list(&self, name: &str) -> Option<String> {
        self.lists.random(name)
    }

    pub fn value_from_list_at(&self, name: &str, index: usize) -> Option<String> {
        self.lists.at(name, index)
    }

    /// `min(n, len)` values from distinct random positions of the list.
    pub fn random_n_values_from_list(&self, name: &str, n: usize) -> Vec<String> {
        self.lists.random_n(name, n)
    }

    pub fn load_reference_rows(&self, rows: Vec<ReferenceRow>) {
        self.reference.load(rows);
    }

    /// Load reference rows from a CSV file, returning how many rows were read.
    pub fn load_reference_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize, csv::Error> {
        let rows = read_csv(path)?;
        let count = rows.len();
        self.reference.load(rows);
        Ok(count)
    }

    /// Column value from the row selected by the current global iteration index.
    pub fn from_reference_row(&self, column: &str) -> Option<String> {
        self.from_reference_row_at(self.stats.current_iteration(), column)
    }

    pub fn from_reference_row_at(&self, index: u64, column: &str) -> Option<String> {
        self.reference.value_at(index, column)
    }

    pub fn begin_iteration(&self) -> u64 {
        self.stats.begin_iteration()
    }

    pub fn record_produced(&self, bytes: u64) {
        self.stats.record_produced(bytes);
    }

    pub fn stats(&self) -> &ExecutionStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn city_row(city: &str) -> ReferenceRow {
        HashMap::from([("city".to_string(), city.to_string())])
    }

    #[test]
    fn test_reference_row_follows_global_iteration() {
        let state = GenerationState::new();
        state.load_reference_rows(vec![city_row("Oslo"), city_row("Lima"), city_row("Pune")]);

        let mut seen = Vec::new();
        for _ in 0..7 {
            state.begin_iteration();
            seen.push(state.from_reference_row("city").unwrap());
        }

        assert_eq!(seen, vec!["Oslo", "Lima", "Pune", "Oslo", "Lima", "Pune", "Oslo"]);
    }

    #[test]
    fn test_reference_row_without_rows_is_empty() {
        let state = GenerationState::new();
        state.begin_iteration();
        assert_eq!(state.from_reference_row("city"), None);
    }

    #[test]
    fn test_load_reference_csv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "city,country").unwrap();
        writeln!(file, "Oslo,Norway").unwrap();
        writeln!(file, "Lima,Peru").unwrap();

        let state = GenerationState::new();
        assert_eq!(state.load_reference_csv(file.path()).unwrap(), 2);
        assert_eq!(state.from_reference_row_at(1, "country").as_deref(), Some("Peru"));
        assert_eq!(state.from_reference_row_at(2, "country").as_deref(), Some("Norway"));
    }

    #[test]
    fn test_record_produced_updates_stats() {
        let state = GenerationState::new();
        state.record_produced(5);
        state.record_produced(7);

        assert_eq!(state.stats().objects(), 2);
        assert_eq!(state.stats().bytes(), 12);
    }

    #[test]
    fn test_context_values_round_trip() {
        let state = GenerationState::new();
        state.set_value("name", "Ada");
        assert_eq!(state.value("name").as_deref(), Some("Ada"));
        assert_eq!(state.value("surname"), None);
    }
}
