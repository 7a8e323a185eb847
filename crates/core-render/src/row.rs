//! Row assembly: spans + wrapped text for one channel row.
//!
//! Layout only; no pixels. The resulting `RowLayout` is everything a
//! `RowFactory` needs to draw the row: the label column, each program cell's
//! x offset, width, arrows, and wrapped lines, plus the row's final size.
//!
//! Line-count policy: a row with exactly one program keeps up to
//! `single_program_max_lines` wrapped lines per cell, otherwise each cell is
//! cut to `multi_program_max_lines`. Row height is
//! `max(lines, 2) * line_height + row_padding`, taking the tallest of the
//! label and every cell.

use crate::span::{ResolvedSpan, SpanMetrics, resolve_checked};
use core_config::{EffectiveLayout, WrapTable};
use core_model::{ChannelRow, ColumnWindow};
use core_text::{GlyphMetrics, LineBudget, LineCountPolicy, WrappedText, row_height, wrap_text};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPolicy {
    pub margined_lines: usize,
    pub line_counts: LineCountPolicy,
}

impl Default for RowPolicy {
    fn default() -> Self {
        Self::from(&WrapTable::default())
    }
}

impl From<&WrapTable> for RowPolicy {
    fn from(w: &WrapTable) -> Self {
        Self {
            margined_lines: w.margined_lines,
            line_counts: LineCountPolicy {
                single_program_max_lines: w.single_program_max_lines,
                multi_program_max_lines: w.multi_program_max_lines,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramCell {
    /// Left edge relative to the row (label column included).
    pub x: u32,
    pub title: String,
    pub span: ResolvedSpan,
    pub text: WrappedText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    pub channel_number: String,
    pub call_sign: String,
    pub window: ColumnWindow,
    pub label: WrappedText,
    pub cells: Vec<ProgramCell>,
    /// Programs dropped because they could not be placed.
    pub skipped: usize,
    pub line_height: u32,
    pub width: u32,
    pub height: u32,
}

impl RowLayout {
    pub fn line_count(&self) -> usize {
        self.cells
            .iter()
            .map(|c| c.text.line_count())
            .chain(std::iter::once(self.label.line_count()))
            .max()
            .unwrap_or(1)
    }
}

pub fn assemble_row<M: GlyphMetrics + ?Sized>(
    row: &ChannelRow,
    layout: &EffectiveLayout,
    policy: &RowPolicy,
    glyphs: &M,
) -> RowLayout {
    let window = ColumnWindow::new(
        row.first_column_start(),
        layout.column_count,
        layout.standard_column_width,
        layout.last_column_width,
    );
    let span_metrics = SpanMetrics::from(layout);
    let max_lines = policy.line_counts.max_lines(row.programs().len());

    let mut cells = Vec::with_capacity(row.programs().len());
    let mut skipped = 0usize;
    for program in row.programs() {
        let span = match resolve_checked(program, &window, &span_metrics) {
            Ok(span) => span,
            Err(e) => {
                warn!(
                    target: "render.row",
                    call_sign = row.call_sign(),
                    error = %e,
                    "program_skipped"
                );
                skipped += 1;
                continue;
            }
        };
        let budget = span.wrap_budget(policy.margined_lines);
        let text = wrap_text(&program.listing_text(), &budget, glyphs).truncated(max_lines);
        cells.push(ProgramCell {
            x: layout.channel_column_width + window.column_x(span.columns.start),
            title: program.title().to_string(),
            span,
            text,
        });
    }

    let label_budget = LineBudget::new(
        layout
            .channel_column_width
            .saturating_sub(layout.bevel_margin.saturating_mul(2)),
    );
    let label = wrap_text(&row.label_text(), &label_budget, glyphs).truncated(max_lines);

    let line_height = glyphs.line_height();
    let mut out = RowLayout {
        channel_number: row.number().to_string(),
        call_sign: row.call_sign().to_string(),
        window,
        label,
        cells,
        skipped,
        line_height,
        width: layout.row_width(),
        height: 0,
    };
    out.height = row_height(out.line_count(), line_height, layout.row_padding);
    out
}
