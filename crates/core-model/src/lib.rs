//! Guide data model: listings, channel rows, and the half-hour time grid.
//!
//! Listings arrive from an external provider once per refresh cycle as
//! `ChannelRow`s holding immutable `Program`s. Everything here is read-only
//! input for span resolution and text wrapping; derived artifacts (spans,
//! wrapped text, rendered rows) live in `core-text` / `core-render`.
//!
//! Invariants:
//! * A `Program` always satisfies `start < end` (enforced by `Program::new`).
//! * `ChannelRow::programs` is ordered by start time; equal starts keep the
//!   provider's relative order.
//! * `ChannelRow::first_column_start` sits on a half-hour boundary.
//! * Block numbers are anchored to the Unix epoch, never reset at midnight.

pub mod channel;
pub mod program;
pub mod source;
pub mod time_grid;
pub mod window;

pub use channel::ChannelRow;
pub use program::{ModelError, Program, ProgramFlags};
pub use source::{Clock, FixedClock, ListingSource, SystemClock};
pub use time_grid::{
    BlockRounding, HALF_HOUR_MINUTES, block_number, block_number_with, block_start,
    clamp_to_previous_half_hour, half_hour,
};
pub use window::ColumnWindow;
