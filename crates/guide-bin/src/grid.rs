//! Plain-text row surfaces.
//!
//! Stands in for the texture factory of a graphical front end: each row
//! layout becomes a block of fixed-width text lines, one character per
//! `cell_width` pixels. Overflow arrows are drawn as `<`/`<<` and `>`/`>>` on
//! the first line of a cell.

use core_render::{ArrowKind, ArtifactError, ProgramCell, RowFactory, RowLayout};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRow {
    pub lines: Vec<String>,
}

#[derive(Debug)]
pub struct TextGridFactory {
    cell_width: u32,
    live: usize,
}

impl TextGridFactory {
    pub fn new(cell_width: u32) -> Self {
        Self {
            cell_width,
            live: 0,
        }
    }

    /// Rows created and not yet disposed.
    pub fn live(&self) -> usize {
        self.live
    }

    fn cols(&self, px: u32) -> usize {
        (px / self.cell_width) as usize
    }
}

fn arrow(kind: ArrowKind, left: bool) -> &'static str {
    match (kind, left) {
        (ArrowKind::None, _) => "",
        (ArrowKind::Single, true) => "<",
        (ArrowKind::Double, true) => "<<",
        (ArrowKind::Single, false) => ">",
        (ArrowKind::Double, false) => ">>",
    }
}

/// Left-align `s` in exactly `cols` characters.
fn fit(s: &str, cols: usize) -> String {
    let mut out: String = s.chars().take(cols).collect();
    let used = out.chars().count();
    out.extend(std::iter::repeat_n(' ', cols - used));
    out
}

fn draw_cell(cell: &ProgramCell, line: usize, cols: usize) -> String {
    if cols == 0 {
        return String::new();
    }
    let text = cell.text.lines().get(line).map_or("", String::as_str);
    let (left, right) = if line == 0 {
        (arrow(cell.span.left, true), arrow(cell.span.right, false))
    } else {
        ("", "")
    };
    let inner = cols - 1;
    let right_cols = right.len().min(inner);
    let body = fit(&format!("{left}{text}"), inner - right_cols);
    format!("|{body}{}", &right[..right_cols])
}

impl RowFactory for TextGridFactory {
    type Artifact = TextRow;

    fn create_row(&mut self, layout: &RowLayout) -> Result<TextRow, ArtifactError> {
        if self.cell_width == 0 || self.cols(layout.width) == 0 {
            return Err(ArtifactError::Allocation {
                width: layout.width,
                height: layout.height,
                reason: format!("cell width {} leaves no columns", self.cell_width),
            });
        }
        let total = self.cols(layout.width);
        let label_cols = self.cols(layout.width.saturating_sub(layout.window.total_width()));
        let line_count = (layout.height / layout.line_height.max(1)).max(1) as usize;

        let mut lines = Vec::with_capacity(line_count);
        for i in 0..line_count {
            let label = layout.label.lines().get(i).map_or("", String::as_str);
            let mut line = fit(label, label_cols);
            for cell in &layout.cells {
                let start = self.cols(cell.x);
                let cols = self.cols(cell.span.pixel_width);
                let used = line.chars().count();
                if start > used {
                    line.extend(std::iter::repeat_n(' ', start - used));
                }
                line.push_str(&draw_cell(cell, i, cols));
            }
            lines.push(fit(&line, total));
        }
        self.live += 1;
        trace!(target: "grid", call_sign = %layout.call_sign, lines = lines.len(), "row_drawn");
        Ok(TextRow { lines })
    }

    fn dispose(&mut self, artifact: TextRow) {
        self.live = self.live.saturating_sub(1);
        drop(artifact);
    }
}
