//! Seams to the outside world: the listings provider and the wall clock.

use crate::channel::ChannelRow;
use anyhow::Result;
use chrono::{DateTime, Utc};

/// External listings provider. Each call returns a fresh snapshot; the
/// stream pipeline calls it again whenever the previous snapshot has been
/// fully consumed.
pub trait ListingSource {
    fn channel_rows(
        &mut self,
        window_start: DateTime<Utc>,
        column_count: usize,
    ) -> Result<Vec<ChannelRow>>;
}

impl<S: ListingSource + ?Sized> ListingSource for Box<S> {
    fn channel_rows(
        &mut self,
        window_start: DateTime<Utc>,
        column_count: usize,
    ) -> Result<Vec<ChannelRow>> {
        (**self).channel_rows(window_start, column_count)
    }
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Frozen clock for tests and reproducible demo runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
