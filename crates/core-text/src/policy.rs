//! Line-count policy and row height.
//!
//! A row holding exactly one program has the whole grid width to itself and
//! may keep a tall cell; rows with several programs keep each cell short so
//! the row stays a uniform two-line strip.

/// Minimum number of text lines a row is sized for.
pub const MIN_ROW_LINES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCountPolicy {
    pub single_program_max_lines: usize,
    pub multi_program_max_lines: usize,
}

impl Default for LineCountPolicy {
    fn default() -> Self {
        Self {
            single_program_max_lines: 6,
            multi_program_max_lines: 2,
        }
    }
}

impl LineCountPolicy {
    pub fn max_lines(&self, program_count: usize) -> usize {
        if program_count == 1 {
            self.single_program_max_lines
        } else {
            self.multi_program_max_lines
        }
    }
}

/// `max(line_count, 2) * line_height + padding`
pub fn row_height(line_count: usize, line_height: u32, padding: u32) -> u32 {
    line_count.max(MIN_ROW_LINES) as u32 * line_height + padding
}
