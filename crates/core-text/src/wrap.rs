//! Greedy word wrap against per-line pixel budgets.
//!
//! Contract:
//! - Input text is split on Unicode whitespace; runs of whitespace collapse
//!   to a single separating space.
//! - Line `i` may use `LineBudget::line_width(i)` pixels. Arrow margins only
//!   reduce the first `margined_lines` lines; later lines get the full width.
//! - A word that fits nowhere (wider than a whole line) is split on grapheme
//!   cluster boundaries. The only line allowed to exceed its budget is one
//!   holding a single grapheme that is itself wider than the budget.
//! - Empty or whitespace-only input yields exactly one blank line, never zero.
//! - Output depends only on text, budget, and glyph widths (deterministic).
//!
//! Line-count truncation is the caller's business (see `policy`).

use crate::metrics::GlyphMetrics;
use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

/// Pixel budget for one wrapped cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBudget {
    pub width: u32,
    pub left_margin: u32,
    pub right_margin: u32,
    /// Leading lines that give up width to the margins.
    pub margined_lines: usize,
}

impl LineBudget {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            left_margin: 0,
            right_margin: 0,
            margined_lines: 2,
        }
    }

    pub fn with_margins(mut self, left: u32, right: u32) -> Self {
        self.left_margin = left;
        self.right_margin = right;
        self
    }

    pub fn with_margined_lines(mut self, lines: usize) -> Self {
        self.margined_lines = lines;
        self
    }

    pub fn line_width(&self, index: usize) -> u32 {
        if index < self.margined_lines {
            self.width
                .saturating_sub(self.left_margin.saturating_add(self.right_margin))
        } else {
            self.width
        }
    }
}

/// Wrapped lines for one cell. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedText {
    lines: SmallVec<[String; 2]>,
}

impl WrappedText {
    pub fn blank() -> Self {
        let mut lines = SmallVec::new();
        lines.push(String::new());
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }

    /// Keep at most `max` lines (at least one line always survives).
    pub fn truncated(mut self, max: usize) -> Self {
        self.lines.truncate(max.max(1));
        self
    }

    /// Lines joined by single spaces.
    pub fn joined(&self) -> String {
        self.lines.join(" ")
    }
}

pub fn wrap_text<M: GlyphMetrics + ?Sized>(
    text: &str,
    budget: &LineBudget,
    glyphs: &M,
) -> WrappedText {
    let space_width = glyphs.glyph_width(' ');
    let mut lines: SmallVec<[String; 2]> = SmallVec::new();
    let mut current = String::new();
    let mut current_len = 0u32;
    let mut line_width = budget.line_width(0);

    for token in text.split_whitespace() {
        let token_width = glyphs.text_width(token);
        let padded = if current.is_empty() { 0 } else { space_width } + token_width;

        if current_len + padded <= line_width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(token);
            current_len += padded;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
            line_width = budget.line_width(lines.len());
            if token_width <= line_width {
                current.push_str(token);
                current_len = token_width;
                continue;
            }
        }

        // Token alone overflows the line: split on cluster boundaries.
        for g in token.graphemes(true) {
            let w = glyphs.grapheme_width(g);
            if current_len + w > line_width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                line_width = budget.line_width(lines.len());
            }
            current.push_str(g);
            current_len += w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        return WrappedText::blank();
    }
    WrappedText { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::CellMetrics;
    use pretty_assertions::assert_eq;

    // 10px per cell keeps budgets readable: width 100 == 10 chars.
    fn cells() -> CellMetrics {
        CellMetrics::new(10, 20)
    }

    fn wrap(text: &str, budget: LineBudget) -> Vec<String> {
        wrap_text(text, &budget, &cells()).lines().to_vec()
    }

    #[test]
    fn fits_on_one_line() {
        assert_eq!(
            wrap("Evening News", LineBudget::new(120)),
            vec!["Evening News"]
        );
    }

    #[test]
    fn greedy_breaks_between_words() {
        assert_eq!(
            wrap("the quick brown fox jumps", LineBudget::new(100)),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(wrap("  a \t  b\n c  ", LineBudget::new(100)), vec!["a b c"]);
    }

    #[test]
    fn empty_and_whitespace_yield_single_blank_line() {
        let w = wrap_text("", &LineBudget::new(100), &cells());
        assert_eq!(w.line_count(), 1);
        assert!(w.is_blank());
        let w = wrap_text(" \t\n ", &LineBudget::new(100), &cells());
        assert_eq!(w.lines(), &[String::new()]);
    }

    #[test]
    fn margins_apply_to_first_two_lines_only() {
        // lines 0,1: 100 - 20 - 20 = 60px (6 chars); line 2+: 100px.
        let budget = LineBudget::new(100).with_margins(20, 20);
        assert_eq!(
            wrap("aaaa bbbb cccc dddd eeee", budget),
            vec!["aaaa", "bbbb", "cccc dddd", "eeee"]
        );
    }

    #[test]
    fn margined_line_count_is_configurable() {
        let budget = LineBudget::new(100)
            .with_margins(20, 20)
            .with_margined_lines(1);
        assert_eq!(
            wrap("aaaa bbbb cccc dddd", budget),
            vec!["aaaa", "bbbb cccc", "dddd"]
        );
    }

    #[test]
    fn long_word_splits_mid_word() {
        assert_eq!(
            wrap("Supercalifragilistic", LineBudget::new(80)),
            vec!["Supercal", "ifragili", "stic"]
        );
    }

    #[test]
    fn long_word_after_short_word() {
        // "ab" flushes, then the long token is split; tail continues the line.
        assert_eq!(
            wrap("ab abcdefghijkl mn", LineBudget::new(50)),
            vec!["ab", "abcde", "fghij", "kl mn"]
        );
    }

    #[test]
    fn split_respects_growing_budget_after_margined_lines() {
        let budget = LineBudget::new(60).with_margins(10, 10);
        // 4 chars on lines 0,1 then 6 chars afterwards.
        assert_eq!(
            wrap("abcdefghijklmnop", budget),
            vec!["abcd", "efgh", "ijklmn", "op"]
        );
    }

    #[test]
    fn glyph_wider_than_budget_gets_own_line() {
        // Wide CJK glyph is 20px; budget 10px forces single-glyph lines.
        assert_eq!(wrap("漢字", LineBudget::new(10)), vec!["漢", "字"]);
    }

    #[test]
    fn zero_width_budget_terminates() {
        let budget = LineBudget::new(10).with_margins(10, 10);
        assert_eq!(wrap("ab c", budget), vec!["a", "b", "c"]);
    }

    #[test]
    fn combining_sequences_never_torn() {
        let lines = wrap("e\u{0301}e\u{0301}e\u{0301}", LineBudget::new(20));
        assert_eq!(lines, vec!["e\u{0301}e\u{0301}", "e\u{0301}"]);
    }

    #[test]
    fn truncation_keeps_at_least_one_line() {
        let w = wrap_text("a b c d", &LineBudget::new(10), &cells());
        assert_eq!(w.line_count(), 4);
        let two = w.clone().truncated(2);
        assert_eq!(two.lines(), &["a".to_string(), "b".to_string()]);
        assert_eq!(w.truncated(0).line_count(), 1);
    }
}
