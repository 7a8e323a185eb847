//! Glyph width lookups.
//!
//! Every width decision in the wrapper flows through `GlyphMetrics`. Real
//! deployments hand in a rasterizer-backed provider; `CellMetrics` is a
//! monospace stand-in sized from Unicode East Asian width (wide glyphs take
//! two cells, combining marks zero).
//!
//! `GlyphWidthCache` memoizes per `char`. It is not thread-safe; the render
//! tick is single-threaded and owns it.

use ahash::AHashMap;
use std::cell::{Cell, RefCell};
use unicode_width::UnicodeWidthChar;

pub trait GlyphMetrics {
    /// Advance width of `ch` in pixels.
    fn glyph_width(&self, ch: char) -> u32;

    /// Vertical distance between wrapped lines in pixels.
    fn line_height(&self) -> u32;

    /// Width of a grapheme cluster (sum of its chars).
    fn grapheme_width(&self, g: &str) -> u32 {
        g.chars().map(|c| self.glyph_width(c)).sum()
    }

    fn text_width(&self, s: &str) -> u32 {
        s.chars().map(|c| self.glyph_width(c)).sum()
    }
}

impl<M: GlyphMetrics + ?Sized> GlyphMetrics for &M {
    fn glyph_width(&self, ch: char) -> u32 {
        (**self).glyph_width(ch)
    }
    fn line_height(&self) -> u32 {
        (**self).line_height()
    }
}

/// Fixed cell grid: `glyph_width = cells(ch) * cell_width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    pub cell_width: u32,
    pub line_height: u32,
}

impl CellMetrics {
    pub fn new(cell_width: u32, line_height: u32) -> Self {
        Self {
            cell_width,
            line_height,
        }
    }
}

impl GlyphMetrics for CellMetrics {
    fn glyph_width(&self, ch: char) -> u32 {
        // Control characters report None; they occupy no space.
        ch.width().unwrap_or(0) as u32 * self.cell_width
    }

    fn line_height(&self) -> u32 {
        self.line_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

/// Memoizing wrapper around any `GlyphMetrics` provider.
#[derive(Debug)]
pub struct GlyphWidthCache<M> {
    inner: M,
    widths: RefCell<AHashMap<char, u32>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<M: GlyphMetrics> GlyphWidthCache<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            widths: RefCell::new(AHashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
            size: self.widths.borrow().len(),
        }
    }

    /// Drop memoized widths (font or scale change).
    pub fn clear(&self) {
        self.widths.borrow_mut().clear();
    }
}

impl<M: GlyphMetrics> GlyphMetrics for GlyphWidthCache<M> {
    fn glyph_width(&self, ch: char) -> u32 {
        if let Some(w) = self.widths.borrow().get(&ch).copied() {
            self.hits.set(self.hits.get() + 1);
            return w;
        }
        self.misses.set(self.misses.get() + 1);
        let w = self.inner.glyph_width(ch);
        self.widths.borrow_mut().insert(ch, w);
        w
    }

    fn line_height(&self) -> u32 {
        self.inner.line_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_metrics_widths() {
        let m = CellMetrics::new(10, 20);
        assert_eq!(m.glyph_width('a'), 10);
        assert_eq!(m.glyph_width('漢'), 20);
        assert_eq!(m.glyph_width('\u{0301}'), 0);
        assert_eq!(m.text_width("abc"), 30);
        assert_eq!(m.grapheme_width("e\u{0301}"), 10);
        assert_eq!(m.line_height(), 20);
    }

    #[test]
    fn cache_memoizes_per_char() {
        let cache = GlyphWidthCache::new(CellMetrics::new(8, 16));
        assert_eq!(cache.text_width("aab"), 24);
        let stats = cache.stats();
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.size, 2);
        cache.clear();
        assert_eq!(cache.stats().size, 0);
        assert_eq!(cache.line_height(), 16);
    }
}
