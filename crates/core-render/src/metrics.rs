//! Row stream counters.
//!
//! Shared between the `RowPipeline` (production side) and the
//! `RowStreamBuffer` (consumption side) through an `Arc`, so one snapshot
//! describes the whole stream. Relaxed atomics: the counters are diagnostic,
//! never used for synchronization.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct StreamMetrics {
    /// Artifacts successfully created and handed to the buffer.
    pub rows_created: AtomicU64,
    /// Rows dropped because the factory failed to create an artifact or the
    /// row came out zero pixels tall.
    pub rows_skipped: AtomicU64,
    /// Artifacts released (eviction, invalidate, or buffer drop).
    pub rows_disposed: AtomicU64,
    /// Programs left out of a row because they could not be placed in the window.
    pub programs_skipped: AtomicU64,
    /// Listing snapshots requested from the source.
    pub cycles: AtomicU64,
    /// Snapshot requests that failed (treated as empty).
    pub source_errors: AtomicU64,
    /// Fill attempts that ended in `NoContent`.
    pub starvations: AtomicU64,
    pub invalidations: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamMetricsSnapshot {
    pub rows_created: u64,
    pub rows_skipped: u64,
    pub rows_disposed: u64,
    pub programs_skipped: u64,
    pub cycles: u64,
    pub source_errors: u64,
    pub starvations: u64,
    pub invalidations: u64,
}

impl StreamMetricsSnapshot {
    /// Artifacts currently alive (created but not yet disposed).
    pub fn rows_live(&self) -> u64 {
        self.rows_created.saturating_sub(self.rows_disposed)
    }
}

impl StreamMetrics {
    pub fn snapshot(&self) -> StreamMetricsSnapshot {
        StreamMetricsSnapshot {
            rows_created: self.rows_created.load(Ordering::Relaxed),
            rows_skipped: self.rows_skipped.load(Ordering::Relaxed),
            rows_disposed: self.rows_disposed.load(Ordering::Relaxed),
            programs_skipped: self.programs_skipped.load(Ordering::Relaxed),
            cycles: self.cycles.load(Ordering::Relaxed),
            source_errors: self.source_errors.load(Ordering::Relaxed),
            starvations: self.starvations.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }
}
