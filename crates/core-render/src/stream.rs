//! Scrolling row buffer.
//!
//! `RowStreamBuffer` keeps just enough rendered rows queued to cover the
//! viewport, pulling from a `RowSource` on demand and releasing rows as they
//! scroll off the top.
//!
//! Invariants:
//! - `0 <= scroll_offset < head.height` whenever the queue is non-empty; an
//!   advance that crosses the head row dequeues it and carries the remainder
//!   into the next row.
//! - After a successful `fill_to_viewport(h)`:
//!   `buffered_height - scroll_offset >= h`.
//! - Every row handed to the buffer is disposed exactly once: on eviction, on
//!   `invalidate`, or when the buffer is dropped.
//!
//! States: `Empty -> Filling -> Steady -> Draining (invalidate) -> Empty`.
//! `fill_to_viewport` is a no-op once `Steady` for the same height.
//!
//! A source that yields nothing makes the fill return `StreamError::NoContent`
//! after a bounded number of pulls; the buffer never spins. Zero-height rows
//! are disposed and skipped, and a run of `MAX_DEGENERATE_PULLS` of them in a
//! row counts as no content.

use crate::factory::RenderedRow;
use crate::metrics::StreamMetrics;
use crate::pipeline::RowSource;
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StreamError {
    #[error("row source produced no content")]
    NoContent,
    #[error("viewport height must be finite and non-negative, got {0}")]
    InvalidViewport(f32),
    #[error("scroll delta must be finite and non-negative, got {0}")]
    InvalidScrollDelta(f32),
}

/// Consecutive zero-height rows tolerated in one pull.
const MAX_DEGENERATE_PULLS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    #[default]
    Empty,
    Filling,
    /// Viewport covered.
    Steady,
    Draining,
}

pub struct RowStreamBuffer<R: RowSource> {
    source: R,
    queue: VecDeque<RenderedRow<R::Artifact>>,
    scroll_offset: f32,
    buffered_height: u64,
    state: StreamState,
    metrics: Arc<StreamMetrics>,
}

fn check_viewport(h: f32) -> Result<(), StreamError> {
    if h.is_finite() && h >= 0.0 {
        Ok(())
    } else {
        Err(StreamError::InvalidViewport(h))
    }
}

impl<R: RowSource> RowStreamBuffer<R> {
    /// Reports into the source's counters when it shares them.
    pub fn new(source: R) -> Self {
        let metrics = source.shared_metrics().unwrap_or_default();
        Self::with_metrics(source, metrics)
    }

    pub fn with_metrics(source: R, metrics: Arc<StreamMetrics>) -> Self {
        Self {
            source,
            queue: VecDeque::new(),
            scroll_offset: 0.0,
            buffered_height: 0,
            state: StreamState::Empty,
            metrics,
        }
    }

    pub fn metrics(&self) -> Arc<StreamMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Sum of the heights of all queued rows.
    pub fn buffered_height(&self) -> u64 {
        self.buffered_height
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn rows(&self) -> impl Iterator<Item = &RenderedRow<R::Artifact>> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut R {
        &mut self.source
    }

    /// Rows intersecting a viewport of height `viewport_height`, with the y
    /// coordinate of each row's top edge. The first row starts at
    /// `-scroll_offset`.
    pub fn visible_rows(
        &self,
        viewport_height: f32,
    ) -> impl Iterator<Item = (f32, &RenderedRow<R::Artifact>)> {
        let mut y = -self.scroll_offset;
        self.queue.iter().map_while(move |row| {
            if y >= viewport_height {
                return None;
            }
            let top = y;
            y += row.height as f32;
            Some((top, row))
        })
    }

    fn uncovered(&self, viewport_height: f32) -> bool {
        (self.buffered_height as f32 - self.scroll_offset) < viewport_height
    }

    fn pull_one(&mut self) -> Result<(), StreamError> {
        for _ in 0..MAX_DEGENERATE_PULLS {
            let row = match self.source.next_row() {
                Ok(row) => row,
                Err(e) => {
                    if e == StreamError::NoContent {
                        self.starved();
                    }
                    return Err(e);
                }
            };
            if row.height == 0 {
                warn!(target: "stream", call_sign = %row.call_sign, "zero_height_row_skipped");
                StreamMetrics::incr(&self.metrics.rows_skipped);
                self.release(row);
                continue;
            }
            self.buffered_height += u64::from(row.height);
            self.queue.push_back(row);
            return Ok(());
        }
        self.starved();
        Err(StreamError::NoContent)
    }

    fn starved(&self) {
        StreamMetrics::incr(&self.metrics.starvations);
        debug!(target: "stream", buffered = self.queue.len(), "stream_starved");
    }

    fn release(&mut self, row: RenderedRow<R::Artifact>) {
        self.source.dispose(row);
        StreamMetrics::incr(&self.metrics.rows_disposed);
    }

    fn evict_head(&mut self) {
        if let Some(row) = self.queue.pop_front() {
            self.buffered_height = self.buffered_height.saturating_sub(u64::from(row.height));
            self.release(row);
        }
    }

    fn settle(&mut self, covered: bool) {
        self.state = match (self.queue.is_empty(), covered) {
            (true, _) => StreamState::Empty,
            (false, true) => StreamState::Steady,
            (false, false) => StreamState::Filling,
        };
    }

    /// Pull rows until the queue covers `viewport_height`. Returns how many
    /// rows were pulled. On error the rows already pulled stay queued.
    pub fn fill_to_viewport(&mut self, viewport_height: f32) -> Result<usize, StreamError> {
        check_viewport(viewport_height)?;
        let mut pulled = 0usize;
        while self.uncovered(viewport_height) {
            self.state = StreamState::Filling;
            if let Err(e) = self.pull_one() {
                self.settle(false);
                return Err(e);
            }
            pulled += 1;
        }
        self.settle(true);
        Ok(pulled)
    }

    /// Scroll by `delta` pixels, evicting rows that moved fully out of view
    /// and refilling. Returns how many rows were evicted.
    pub fn advance(&mut self, delta: f32, viewport_height: f32) -> Result<usize, StreamError> {
        check_viewport(viewport_height)?;
        if !delta.is_finite() || delta < 0.0 {
            return Err(StreamError::InvalidScrollDelta(delta));
        }
        self.scroll_offset += delta;

        let mut evicted = 0usize;
        loop {
            let head_height = self.queue.front().map(|r| r.height as f32);
            match head_height {
                Some(h) if self.scroll_offset >= h => {
                    self.scroll_offset -= h;
                    self.evict_head();
                    evicted += 1;
                }
                Some(_) => break,
                // Overshoot past everything buffered: keep pulling to consume it.
                None if self.scroll_offset > 0.0 => {
                    if let Err(e) = self.pull_one() {
                        self.scroll_offset = 0.0;
                        self.settle(false);
                        return Err(e);
                    }
                }
                None => break,
            }
        }

        self.fill_to_viewport(viewport_height)?;
        Ok(evicted)
    }

    /// Drop every buffered row and restart the source. Used when the listings
    /// or the viewport geometry change.
    pub fn invalidate(&mut self) {
        self.state = StreamState::Draining;
        let drained = self.queue.len();
        while !self.queue.is_empty() {
            self.evict_head();
        }
        self.scroll_offset = 0.0;
        self.buffered_height = 0;
        self.source.reset();
        StreamMetrics::incr(&self.metrics.invalidations);
        info!(target: "stream", drained, "stream_invalidated");
        self.state = StreamState::Empty;
    }
}

impl<R: RowSource> Drop for RowStreamBuffer<R> {
    fn drop(&mut self) {
        while !self.queue.is_empty() {
            self.evict_head();
        }
    }
}
