//! Half-hour block arithmetic.
//!
//! The guide grid is made of fixed 30-minute columns. Two mappings from a
//! wall-clock instant are provided:
//!
//! * `clamp_to_previous_half_hour` truncates to the most recent `:00` / `:30`
//!   boundary (sub-second precision dropped). Result is always `<= t`, always
//!   on a boundary, and the function is idempotent.
//! * `block_number` counts half-hour periods since the Unix epoch. The counter
//!   is continuous across midnight so column math never has to special-case a
//!   day rollover; values are stable across process restarts.
//!
//! All arithmetic is in UTC.

use chrono::{DateTime, TimeDelta, Timelike, Utc};

pub const HALF_HOUR_MINUTES: i64 = 30;
const HALF_HOUR_SECS: i64 = HALF_HOUR_MINUTES * 60;
const SECS_PER_DAY: i64 = 86_400;
const BLOCKS_PER_DAY: i64 = 48;

/// One grid column.
#[inline]
pub fn half_hour() -> TimeDelta {
    TimeDelta::minutes(HALF_HOUR_MINUTES)
}

/// How the minute-in-hour is folded into the block number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockRounding {
    /// Round to the nearest half hour using quarter-hour cutoffs
    /// (`:15` and `:45` advance the block).
    #[default]
    QuarterHour,
    /// Plain floor: `:30` advances the block.
    Floor,
}

/// Truncate `t` to the most recent half-hour boundary.
pub fn clamp_to_previous_half_hour(t: DateTime<Utc>) -> DateTime<Utc> {
    let into_block = TimeDelta::seconds(t.timestamp().rem_euclid(HALF_HOUR_SECS))
        + TimeDelta::nanoseconds(i64::from(t.timestamp_subsec_nanos()));
    // Only fails within 30 minutes of the representable minimum.
    t.checked_sub_signed(into_block).unwrap_or(t)
}

/// Block number with quarter-hour rounding.
#[inline]
pub fn block_number(t: DateTime<Utc>) -> i64 {
    block_number_with(t, BlockRounding::QuarterHour)
}

pub fn block_number_with(t: DateTime<Utc>, rounding: BlockRounding) -> i64 {
    let days = t.timestamp().div_euclid(SECS_PER_DAY);
    let minute = t.minute();
    let mut block = days * BLOCKS_PER_DAY + i64::from(t.hour()) * 2;
    match rounding {
        BlockRounding::QuarterHour => {
            if minute >= 15 {
                block += 1;
            }
            if minute >= 45 {
                block += 1;
            }
        }
        BlockRounding::Floor => {
            if minute >= 30 {
                block += 1;
            }
        }
    }
    block
}

/// Instant at which `block` begins. Inverse of `block_number_with(_, Floor)`
/// for instants already on a boundary.
pub fn block_start(block: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(block.checked_mul(HALF_HOUR_SECS)?, 0)
}
