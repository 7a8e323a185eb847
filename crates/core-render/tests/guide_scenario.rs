//! Window at 18:00 with three columns (172/172/208): a program running
//! 17:45-19:00 takes the first two columns with a single left arrow.

use chrono::{DateTime, TimeZone, Utc};
use core_config::{Config, RenderContext};
use core_model::{ChannelRow, ColumnWindow, Program, ProgramFlags, block_number};
use core_render::{ArrowKind, RowPolicy, SpanMetrics, assemble_row, resolve_span};
use core_text::{CellMetrics, GlyphMetrics, wrap_text};
use pretty_assertions::assert_eq;

fn t(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, h, m, 0).unwrap()
}

fn evening_news() -> Program {
    Program::new("Evening News", t(17, 45), t(19, 0))
        .unwrap()
        .with_flags(ProgramFlags::CLOSED_CAPTIONED)
}

#[test]
fn evening_news_spans_first_two_columns() {
    let layout = Config::default().apply_context(RenderContext::unscaled(640, 480));
    assert_eq!(layout.column_count, 3);
    let window = ColumnWindow::new(
        t(18, 0),
        layout.column_count,
        layout.standard_column_width,
        layout.last_column_width,
    );
    let span = resolve_span(&evening_news(), &window, &SpanMetrics::from(&layout));
    assert_eq!(span.left, ArrowKind::Single);
    assert_eq!(span.right, ArrowKind::None);
    assert_eq!(span.pixel_width, 344);
    assert_eq!(span.content_width(), 344 - 4 * 2 - 14);
}

#[test]
fn evening_news_text_fits_the_arrow_narrowed_budget() {
    let layout = Config::default().apply_context(RenderContext::unscaled(640, 480));
    let glyphs = CellMetrics::new(10, 20);
    let row = ChannelRow::new("5", "KPIX", t(18, 10), vec![evening_news()]);
    let assembled = assemble_row(&row, &layout, &RowPolicy::default(), &glyphs);

    let cell = &assembled.cells[0];
    let budget = cell.span.content_width();
    assert_eq!(cell.text.lines(), &["Evening News %CC%".to_string()]);
    let lines = cell.text.lines();
    assert!(lines.iter().all(|l| glyphs.text_width(l) <= budget));

    // Wider glyphs force the same text onto more lines, each
    // within the first-line budget.
    let wide = CellMetrics::new(30, 20);
    let wrapped = wrap_text("Evening News %CC%", &cell.span.wrap_budget(2), &wide);
    assert_eq!(
        wrapped.lines(),
        &["Evening".to_string(), "News %CC%".to_string()]
    );
    assert!(wrapped.lines().iter().all(|l| wide.text_width(l) <= budget));
}

#[test]
fn columns_follow_the_continuous_block_grid() {
    let first = block_number(t(18, 0));
    let last = block_number(t(19, 0));
    assert_eq!(last - first, 2);
    let next_midnight = t(0, 0) + chrono::TimeDelta::days(1);
    assert_eq!(block_number(t(23, 30)) + 1, block_number(next_midnight));
}
