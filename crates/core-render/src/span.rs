//! Column span resolution.
//!
//! Given a program and the visible `ColumnWindow`, decide how wide the
//! program's cell is and which overflow arrows it carries.
//!
//! Arrows:
//! - Left: `start < first_column_start` => `Single`; additionally
//!   `start < first_column_start - 30min` => `Double`.
//! - Right: `end > last_column_end` => `Single`; additionally
//!   `end > last_column_end + 30min` => `Double`.
//!
//! Width: the canonical coverage cases for an N-column window are the
//! contiguous column ranges (for the classic 3-column grid: all three, the
//! first two, the last two, or any single column). The program's interval,
//! clipped to the window, selects exactly one of them: the range of columns
//! it overlaps. Width is the sum of those column widths (last column wider).
//! A program overlapping no column resolves to width 0 and must not be drawn.
//!
//! `resolve_span` never fails. `resolve_checked` is the gate used by row
//! assembly: it reports programs that cannot be placed so the caller can log
//! and skip them.

use chrono::{DateTime, TimeDelta, Utc};
use core_config::EffectiveLayout;
use core_model::{ColumnWindow, HALF_HOUR_MINUTES, Program, half_hour};
use core_text::LineBudget;
use std::ops::Range;
use thiserror::Error;

const HALF_HOUR_SECS: i64 = HALF_HOUR_MINUTES * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrowKind {
    #[default]
    None,
    /// Overflow of at most 30 minutes.
    Single,
    /// Overflow of more than 30 minutes.
    Double,
}

/// Arrow + bevel geometry, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanMetrics {
    pub single_arrow_width: u32,
    pub double_arrow_width: u32,
    pub bevel_margin: u32,
}

impl SpanMetrics {
    pub fn margin_for(&self, arrow: ArrowKind) -> u32 {
        match arrow {
            ArrowKind::None => 0,
            ArrowKind::Single => self.single_arrow_width,
            ArrowKind::Double => self.double_arrow_width,
        }
    }
}

impl From<&EffectiveLayout> for SpanMetrics {
    fn from(l: &EffectiveLayout) -> Self {
        Self {
            single_arrow_width: l.single_arrow_width,
            double_arrow_width: l.double_arrow_width,
            bevel_margin: l.bevel_margin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    pub pixel_width: u32,
    pub left: ArrowKind,
    pub right: ArrowKind,
    pub left_margin: u32,
    pub right_margin: u32,
    pub bevel_margin: u32,
    /// Covered columns, half-open. Empty when the program is outside the window.
    pub columns: Range<usize>,
}

impl ResolvedSpan {
    pub fn is_renderable(&self) -> bool {
        self.pixel_width > 0 && !self.columns.is_empty()
    }

    /// Usable text width on the margined lines:
    /// `pixel_width - 2 * bevel - left_margin - right_margin`.
    pub fn content_width(&self) -> u32 {
        self.pixel_width
            .saturating_sub(self.bevel_margin.saturating_mul(2))
            .saturating_sub(self.left_margin)
            .saturating_sub(self.right_margin)
    }

    /// Wrap budget for this cell: bevel-inset width with the arrow margins
    /// applied to the first `margined_lines` lines.
    pub fn wrap_budget(&self, margined_lines: usize) -> LineBudget {
        let bevels = self.bevel_margin.saturating_mul(2);
        LineBudget::new(self.pixel_width.saturating_sub(bevels))
            .with_margins(self.left_margin, self.right_margin)
            .with_margined_lines(margined_lines)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpanError {
    #[error("program `{title}` ({start} - {end}) lies outside the visible window")]
    OutsideWindow {
        title: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("program `{title}` matches no coverage case with a drawable width")]
    Unresolvable { title: String },
}

fn floor_columns(d: TimeDelta) -> usize {
    (d.num_seconds().max(0) / HALF_HOUR_SECS) as usize
}

fn ceil_columns(d: TimeDelta) -> usize {
    let mut secs = d.num_seconds().max(0);
    if d.subsec_nanos() > 0 {
        secs += 1;
    }
    ((secs + HALF_HOUR_SECS - 1) / HALF_HOUR_SECS) as usize
}

/// Columns of `window` overlapped by `[start, end)`.
fn covered_columns(program: &Program, window: &ColumnWindow) -> Range<usize> {
    let first = window.first_column_start;
    let last_end = window.last_column_end();
    if program.end() <= first || program.start() >= last_end {
        return 0..0;
    }
    let start = program.start().max(first);
    let end = program.end().min(last_end);
    let from = floor_columns(start - first);
    let to = ceil_columns(end - first).min(window.column_count);
    from..to.max(from)
}

fn left_arrow(program: &Program, window: &ColumnWindow) -> ArrowKind {
    let first = window.first_column_start;
    if program.start() >= first {
        ArrowKind::None
    } else if program.start() < first - half_hour() {
        ArrowKind::Double
    } else {
        ArrowKind::Single
    }
}

fn right_arrow(program: &Program, window: &ColumnWindow) -> ArrowKind {
    let last_end = window.last_column_end();
    if program.end() <= last_end {
        ArrowKind::None
    } else if program.end() > last_end + half_hour() {
        ArrowKind::Double
    } else {
        ArrowKind::Single
    }
}

/// Best-effort span. Programs outside the window come back with width 0.
pub fn resolve_span(
    program: &Program,
    window: &ColumnWindow,
    metrics: &SpanMetrics,
) -> ResolvedSpan {
    let columns = covered_columns(program, window);
    let left = left_arrow(program, window);
    let right = right_arrow(program, window);
    ResolvedSpan {
        pixel_width: window.range_width(columns.start, columns.end),
        left,
        right,
        left_margin: metrics.margin_for(left),
        right_margin: metrics.margin_for(right),
        bevel_margin: metrics.bevel_margin,
        columns,
    }
}

pub fn resolve_checked(
    program: &Program,
    window: &ColumnWindow,
    metrics: &SpanMetrics,
) -> Result<ResolvedSpan, SpanError> {
    let span = resolve_span(program, window, metrics);
    if span.columns.is_empty() {
        return Err(SpanError::OutsideWindow {
            title: program.title().to_string(),
            start: program.start(),
            end: program.end(),
        });
    }
    if span.pixel_width == 0 {
        return Err(SpanError::Unresolvable {
            title: program.title().to_string(),
        });
    }
    Ok(span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, h, m, 0).unwrap()
    }

    fn window() -> ColumnWindow {
        ColumnWindow::new(t(18, 0), 3, 172, 208)
    }

    fn metrics() -> SpanMetrics {
        SpanMetrics {
            single_arrow_width: 14,
            double_arrow_width: 24,
            bevel_margin: 4,
        }
    }

    fn resolve(start: DateTime<Utc>, end: DateTime<Utc>) -> ResolvedSpan {
        let p = Program::new("p", start, end).unwrap();
        resolve_span(&p, &window(), &metrics())
    }

    #[test]
    fn exact_full_coverage_has_no_arrows() {
        let s = resolve(t(18, 0), t(19, 30));
        assert_eq!(s.pixel_width, 172 * 2 + 208);
        assert_eq!(s.columns, 0..3);
        assert_eq!((s.left, s.right), (ArrowKind::None, ArrowKind::None));
        assert_eq!(s.content_width(), 552 - 8);
    }

    #[test]
    fn overflow_on_both_sides() {
        let s = resolve(t(17, 29), t(20, 0));
        assert_eq!(s.left, ArrowKind::Double);
        assert_eq!(s.right, ArrowKind::Single);
        assert_eq!(s.left_margin, 24);
        assert_eq!(s.right_margin, 14);
        assert_eq!(s.pixel_width, 552);
        assert_eq!(s.content_width(), 552 - 8 - 24 - 14);
    }

    #[test]
    fn exactly_thirty_minutes_early_is_single() {
        assert_eq!(resolve(t(17, 30), t(18, 30)).left, ArrowKind::Single);
        assert_eq!(resolve(t(19, 0), t(20, 0)).right, ArrowKind::Single);
        assert_eq!(resolve(t(19, 0), t(20, 1)).right, ArrowKind::Double);
    }

    #[test]
    fn first_two_columns() {
        let s = resolve(t(17, 45), t(19, 0));
        assert_eq!(s.left, ArrowKind::Single);
        assert_eq!(s.right, ArrowKind::None);
        assert_eq!(s.columns, 0..2);
        assert_eq!(s.pixel_width, 344);
    }

    #[test]
    fn last_two_columns() {
        let s = resolve(t(18, 30), t(19, 30));
        assert_eq!(s.columns, 1..3);
        assert_eq!(s.pixel_width, 172 + 208);
    }

    #[test]
    fn each_single_column() {
        assert_eq!(resolve(t(18, 0), t(18, 30)).pixel_width, 172);
        assert_eq!(resolve(t(18, 30), t(19, 0)).pixel_width, 172);
        let last = resolve(t(19, 0), t(19, 30));
        assert_eq!(last.pixel_width, 208);
        assert_eq!(last.columns, 2..3);
    }

    #[test]
    fn unaligned_program_takes_overlapped_columns() {
        let s = resolve(t(18, 10), t(18, 40));
        assert_eq!(s.columns, 0..2);
        assert_eq!(s.pixel_width, 344);
    }

    #[test]
    fn outside_window_is_zero_width_and_checked_rejects() {
        let before = resolve(t(16, 0), t(18, 0));
        assert_eq!(before.pixel_width, 0);
        assert!(!before.is_renderable());
        let after = Program::new("late", t(19, 30), t(20, 0)).unwrap();
        assert!(matches!(
            resolve_checked(&after, &window(), &metrics()),
            Err(SpanError::OutsideWindow { .. })
        ));
    }

    #[test]
    fn zero_width_columns_are_unresolvable() {
        let w = ColumnWindow::new(t(18, 0), 3, 0, 0);
        let p = Program::new("p", t(18, 0), t(18, 30)).unwrap();
        assert!(matches!(
            resolve_checked(&p, &w, &metrics()),
            Err(SpanError::Unresolvable { .. })
        ));
    }

    #[test]
    fn wrap_budget_carries_margins() {
        let s = resolve(t(17, 45), t(19, 0));
        let b = s.wrap_budget(2);
        assert_eq!(b.width, 336);
        assert_eq!(b.line_width(0), 344 - 8 - 14);
        assert_eq!(b.line_width(2), 336);
    }
}
