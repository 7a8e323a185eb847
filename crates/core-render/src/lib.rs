//! Guide layout + streaming row engine.
//!
//! Turns listing snapshots into a continuously scrolling column of rendered
//! channel rows. Pixel drawing itself is external: this crate decides *what*
//! goes where (spans, arrows, wrapped text, row heights) and *when* rows are
//! created and released, then hands each row layout to a `RowFactory`.
//!
//! Pipeline (per pulled row):
//! 1. `RowPipeline` takes the next `ChannelRow` from the current listings
//!    snapshot, re-querying the `ListingSource` once the snapshot is spent.
//! 2. `row::assemble_row` resolves each program against the row's column
//!    window (`span::resolve_checked`), skipping programs that cannot be
//!    placed, and wraps their listing text with the shared `core_text`
//!    wrapper. The channel label goes through the same wrapper.
//! 3. The `RowFactory` turns the assembled `RowLayout` into an opaque
//!    artifact. Failures are logged and the row is skipped.
//! 4. `RowStreamBuffer` queues rendered rows until the viewport is covered,
//!    evicts rows once they scroll past, and disposes every artifact exactly
//!    once (on eviction, `invalidate`, or drop).
//!
//! Invariants:
//! - `RowStreamBuffer`: `0 <= scroll_offset < head.height` whenever the queue
//!   is non-empty after `advance`.
//! - After a successful `fill_to_viewport(h)`: `buffered_height - scroll_offset >= h`.
//! - No partial rows: an artifact is enqueued only after `create_row` returned `Ok`.
//! - Starvation never spins: a source that yields nothing after one refresh
//!   surfaces `StreamError::NoContent`.
//!
//! Threading: everything runs inside one render tick on one thread. A new
//! listings snapshot or viewport size is applied at a tick boundary via
//! `RowStreamBuffer::invalidate` followed by a fresh fill; the old queue is
//! fully drained before the new one starts filling.
//!
//! Metrics (`StreamMetrics`): rows created / skipped / disposed, programs
//! skipped during assembly, listing cycles, source errors, starvations,
//! invalidations.

pub mod factory;
pub mod metrics;
pub mod pipeline;
pub mod row;
pub mod span;
pub mod stream;

pub use factory::{ArtifactError, RenderedRow, RowFactory};
pub use metrics::{StreamMetrics, StreamMetricsSnapshot};
pub use pipeline::{RowPipeline, RowSource};
pub use row::{ProgramCell, RowLayout, RowPolicy, assemble_row};
pub use span::{ArrowKind, ResolvedSpan, SpanError, SpanMetrics, resolve_checked, resolve_span};
pub use stream::{RowStreamBuffer, StreamError, StreamState};
