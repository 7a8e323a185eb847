//! Font-metric driven text layout for guide cells.
//!
//! * `metrics`: the glyph-width seam (`GlyphMetrics`), a monospace provider
//!   backed by `unicode-width`, and a memoizing cache.
//! * `wrap`: greedy word wrap with a grapheme-split fallback for words wider
//!   than a whole line.
//! * `policy`: how many wrapped lines a row keeps and how tall it becomes.
//!
//! One wrapper serves both the program cells (arrow margins on the leading
//! lines) and the channel label column (no margins).

pub mod metrics;
pub mod policy;
pub mod wrap;

pub use metrics::{CacheStats, CellMetrics, GlyphMetrics, GlyphWidthCache};
pub use policy::{LineCountPolicy, row_height};
pub use wrap::{LineBudget, WrappedText, wrap_text};
