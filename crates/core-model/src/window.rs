//! Visible half-hour column window.
//!
//! A window is derived, never stored: it is rebuilt from a row's
//! `first_column_start` and the effective layout each time a row is
//! assembled. Columns are fixed 30-minute spans; every column uses the
//! standard width except the last, which is wider.
//!
//! `column_count` counts every visible column, so the window covers
//! `[first_column_start, first_column_start + 30min * column_count)`.

use crate::time_grid::half_hour;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWindow {
    pub first_column_start: DateTime<Utc>,
    pub column_count: usize,
    pub standard_column_width: u32,
    pub last_column_width: u32,
}

impl ColumnWindow {
    /// `column_count` is clamped to at least one column.
    pub fn new(
        first_column_start: DateTime<Utc>,
        column_count: usize,
        standard_column_width: u32,
        last_column_width: u32,
    ) -> Self {
        Self {
            first_column_start,
            column_count: column_count.max(1),
            standard_column_width,
            last_column_width,
        }
    }

    /// Start instant of column `index` (may be past the window for `index >= column_count`).
    pub fn column_start(&self, index: usize) -> DateTime<Utc> {
        self.first_column_start + half_hour() * index as i32
    }

    pub fn last_column_end(&self) -> DateTime<Utc> {
        self.column_start(self.column_count)
    }

    pub fn column_width(&self, index: usize) -> u32 {
        if index + 1 == self.column_count {
            self.last_column_width
        } else if index < self.column_count {
            self.standard_column_width
        } else {
            0
        }
    }

    /// Summed width of the half-open column range `[from, to)`.
    pub fn range_width(&self, from: usize, to: usize) -> u32 {
        (from..to.min(self.column_count))
            .map(|i| self.column_width(i))
            .sum()
    }

    /// Pixel x-offset of column `index` relative to the first column.
    pub fn column_x(&self, index: usize) -> u32 {
        self.range_width(0, index)
    }

    pub fn total_width(&self) -> u32 {
        self.range_width(0, self.column_count)
    }
}
