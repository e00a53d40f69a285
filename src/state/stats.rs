// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Running totals for one generation run.
#[derive(Debug)]
pub struct ExecutionStats {
    started: Instant,
    objects: AtomicU64,
    bytes: AtomicU64,
    iterations: AtomicU64,
}

impl Default for ExecutionStats {
    fn default() -> Self {
        Self {
            started: Instant::now(),
            objects: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            iterations: AtomicU64::new(0),
        }
    }
}

impl ExecutionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the global iteration index, returning the zero-based index of
    /// the record being started. Every caller gets a distinct value.
    pub fn begin_iteration(&self) -> u64 {
        self.iterations.fetch_add(1, Ordering::SeqCst)
    }

    /// Index of the most recently started record (0 before any record).
    pub fn current_iteration(&self) -> u64 {
        self.iterations.load(Ordering::SeqCst).saturating_sub(1)
    }

    pub fn record_produced(&self, bytes: u64) {
        self.objects.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn objects(&self) -> u64 {
        self.objects.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            elapsed: self.started.elapsed(),
            objects: self.objects(),
            bytes: self.bytes(),
            iterations: self.iterations.load(Ordering::SeqCst),
        }
    }
}

/// Point-in-time copy of [`ExecutionStats`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub elapsed: Duration,
    pub objects: u64,
    pub bytes: u64,
    pub iterations: u64,
}

impl StatsSnapshot {
    pub fn objects_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.objects as f64 / secs
        } else {
            0.0
        }
    }
}
