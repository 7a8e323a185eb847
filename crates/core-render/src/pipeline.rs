//! Cyclic row generator.
//!
//! `RowPipeline` turns a finite listings provider into a logically endless
//! sequence of rendered rows: it walks the current snapshot row by row and,
//! once the snapshot is spent, asks the provider for a fresh one (window start
//! recomputed from the clock) and keeps going. Each cycle is finite; the
//! sequence across cycles is unbounded.
//!
//! Progress guarantee: a single `next_row` call refreshes at most once. If the
//! refreshed snapshot yields no renderable row either, the call returns
//! `StreamError::NoContent` instead of looping.

use crate::factory::{RenderedRow, RowFactory};
use crate::metrics::StreamMetrics;
use crate::row::{RowPolicy, assemble_row};
use crate::stream::StreamError;
use core_config::EffectiveLayout;
use core_model::{ChannelRow, Clock, ListingSource, SystemClock, clamp_to_previous_half_hour};
use core_text::GlyphMetrics;
use std::sync::Arc;
use tracing::{debug, warn};

/// What `RowStreamBuffer` pulls from.
pub trait RowSource {
    type Artifact;

    fn next_row(&mut self) -> Result<RenderedRow<Self::Artifact>, StreamError>;

    /// Release a row previously returned by `next_row`.
    fn dispose(&mut self, row: RenderedRow<Self::Artifact>);

    /// Forget the current snapshot so the next pull starts a new cycle.
    fn reset(&mut self);

    /// Counters the buffer should report into, when the source keeps some.
    fn shared_metrics(&self) -> Option<Arc<StreamMetrics>> {
        None
    }
}

pub struct RowPipeline<S, F, M, C = SystemClock> {
    source: S,
    factory: F,
    glyphs: M,
    clock: C,
    layout: EffectiveLayout,
    policy: RowPolicy,
    pending: std::vec::IntoIter<ChannelRow>,
    metrics: Arc<StreamMetrics>,
}

impl<S, F, M> RowPipeline<S, F, M, SystemClock>
where
    S: ListingSource,
    F: RowFactory,
    M: GlyphMetrics,
{
    pub fn new(
        source: S,
        factory: F,
        glyphs: M,
        layout: EffectiveLayout,
        policy: RowPolicy,
    ) -> Self {
        Self {
            source,
            factory,
            glyphs,
            clock: SystemClock,
            layout,
            policy,
            pending: Vec::new().into_iter(),
            metrics: Arc::new(StreamMetrics::default()),
        }
    }
}

impl<S, F, M, C> RowPipeline<S, F, M, C>
where
    S: ListingSource,
    F: RowFactory,
    M: GlyphMetrics,
    C: Clock,
{
    pub fn with_clock<C2: Clock>(self, clock: C2) -> RowPipeline<S, F, M, C2> {
        RowPipeline {
            source: self.source,
            factory: self.factory,
            glyphs: self.glyphs,
            clock,
            layout: self.layout,
            policy: self.policy,
            pending: self.pending,
            metrics: self.metrics,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<StreamMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> Arc<StreamMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn layout(&self) -> &EffectiveLayout {
        &self.layout
    }

    /// Apply a new layout. Rows already rendered keep their old geometry, so
    /// callers pair this with `RowStreamBuffer::invalidate`.
    pub fn set_layout(&mut self, layout: EffectiveLayout) {
        self.layout = layout;
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    fn refresh(&mut self) {
        StreamMetrics::incr(&self.metrics.cycles);
        let window_start = clamp_to_previous_half_hour(self.clock.now());
        match self
            .source
            .channel_rows(window_start, self.layout.column_count)
        {
            Ok(rows) => {
                debug!(
                    target: "render.pipeline",
                    rows = rows.len(),
                    %window_start,
                    column_count = self.layout.column_count,
                    "listings_snapshot"
                );
                self.pending = rows.into_iter();
            }
            Err(e) => {
                StreamMetrics::incr(&self.metrics.source_errors);
                warn!(target: "render.pipeline", error = %e, "listings_fetch_failed");
                self.pending = Vec::new().into_iter();
            }
        }
    }
}

impl<S, F, M, C> RowSource for RowPipeline<S, F, M, C>
where
    S: ListingSource,
    F: RowFactory,
    M: GlyphMetrics,
    C: Clock,
{
    type Artifact = F::Artifact;

    fn next_row(&mut self) -> Result<RenderedRow<F::Artifact>, StreamError> {
        let mut refreshed = false;
        loop {
            let Some(row) = self.pending.next() else {
                if refreshed {
                    return Err(StreamError::NoContent);
                }
                self.refresh();
                refreshed = true;
                continue;
            };
            let layout = assemble_row(&row, &self.layout, &self.policy, &self.glyphs);
            StreamMetrics::add(&self.metrics.programs_skipped, layout.skipped as u64);
            match self.factory.create_row(&layout) {
                Ok(artifact) => {
                    StreamMetrics::incr(&self.metrics.rows_created);
                    return Ok(RenderedRow {
                        width: layout.width,
                        height: layout.height,
                        call_sign: layout.call_sign,
                        artifact,
                    });
                }
                Err(e) => {
                    StreamMetrics::incr(&self.metrics.rows_skipped);
                    warn!(
                        target: "render.pipeline",
                        call_sign = row.call_sign(),
                        error = %e,
                        "row_artifact_failed"
                    );
                }
            }
        }
    }

    fn dispose(&mut self, row: RenderedRow<F::Artifact>) {
        self.factory.dispose(row.artifact);
    }

    fn reset(&mut self) {
        self.pending = Vec::new().into_iter();
    }

    fn shared_metrics(&self) -> Option<Arc<StreamMetrics>> {
        Some(Arc::clone(&self.metrics))
    }
}
