//! Deterministic demo listings.
//!
//! Each channel repeats a fixed schedule pattern anchored to the requested
//! window start, so every refresh cycle yields the same shape of grid shifted
//! to the current half hour.

use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};
use core_model::{ChannelRow, ListingSource, Program, ProgramFlags};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct Slot {
    title: &'static str,
    minutes: i64,
    flags: ProgramFlags,
    year: Option<u16>,
    description: Option<&'static str>,
    rating: Option<&'static str>,
}

const fn slot(title: &'static str, minutes: i64) -> Slot {
    Slot {
        title,
        minutes,
        flags: ProgramFlags::empty(),
        year: None,
        description: None,
        rating: None,
    }
}

#[derive(Debug, Clone, Copy)]
struct DemoChannel {
    number: &'static str,
    call_sign: &'static str,
    /// First program start relative to the window start, in minutes.
    lead_minutes: i64,
    pattern: &'static [Slot],
}

const NEWS: &[Slot] = &[
    Slot {
        flags: ProgramFlags::CLOSED_CAPTIONED,
        ..slot("Evening News", 75)
    },
    slot("Wheel of Fortune", 30),
    Slot {
        description: Some("Celebrity week."),
        flags: ProgramFlags::STEREO,
        ..slot("Jeopardy!", 30)
    },
];

const MOVIE: &[Slot] = &[Slot {
    flags: ProgramFlags::MOVIE
        .union(ProgramFlags::STEREO)
        .union(ProgramFlags::CLOSED_CAPTIONED),
    year: Some(1982),
    description: Some("A stranded alien befriends a boy in the suburbs."),
    rating: Some("PG"),
    ..slot("E.T. the Extra-Terrestrial", 180)
}];

const DOCUMENTARY: &[Slot] = &[Slot {
    description: Some(
        "A season on the coral reefs of the Pacific, following the fish, \
         turtles and divers who depend on them through storms, spawning \
         and the slow return of the reef after a bleaching event.",
    ),
    flags: ProgramFlags::STEREO,
    ..slot("Nature", 90)
}];

const VARIETY: &[Slot] = &[
    slot("Cartoons", 30),
    slot("Sitcom Rerun", 30),
    Slot {
        description: Some("Live from the studio."),
        ..slot("Talk Tonight", 60)
    },
];

const SPORTS: &[Slot] = &[Slot {
    description: Some("Regional coverage."),
    flags: ProgramFlags::CLOSED_CAPTIONED,
    ..slot("College Basketball", 120)
}];

const CHANNELS: &[DemoChannel] = &[
    DemoChannel {
        number: "2",
        call_sign: "KTVU",
        lead_minutes: -15,
        pattern: NEWS,
    },
    DemoChannel {
        number: "4",
        call_sign: "KRON",
        lead_minutes: -45,
        pattern: MOVIE,
    },
    DemoChannel {
        number: "9",
        call_sign: "KQED",
        lead_minutes: 0,
        pattern: DOCUMENTARY,
    },
    DemoChannel {
        number: "20",
        call_sign: "KBHK",
        lead_minutes: 0,
        pattern: VARIETY,
    },
    DemoChannel {
        number: "36",
        call_sign: "KICU",
        lead_minutes: -30,
        pattern: SPORTS,
    },
];

fn program_for(slot: &Slot, start: DateTime<Utc>) -> Result<Program> {
    let mut p = Program::new(slot.title, start, start + TimeDelta::minutes(slot.minutes))?
        .with_flags(slot.flags);
    if let Some(year) = slot.year {
        p = p.with_year(year);
    }
    if let Some(d) = slot.description {
        p = p.with_description(d);
    }
    if let Some(r) = slot.rating {
        p = p.with_rating(r);
    }
    Ok(p)
}

fn schedule(
    channel: &DemoChannel,
    window_start: DateTime<Utc>,
    column_count: usize,
) -> Result<ChannelRow> {
    let horizon = window_start + TimeDelta::minutes(30 * column_count as i64);
    let mut start = window_start + TimeDelta::minutes(channel.lead_minutes);
    let mut programs = Vec::new();
    for slot in channel.pattern.iter().cycle() {
        if start >= horizon {
            break;
        }
        programs.push(program_for(slot, start)?);
        start += TimeDelta::minutes(slot.minutes);
    }
    let row = ChannelRow::new(channel.number, channel.call_sign, window_start, programs);
    Ok(row)
}

/// Demo provider cycling through a fixed lineup.
#[derive(Debug, Default)]
pub struct DemoListings {
    refreshes: u64,
}

impl DemoListings {
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}

impl ListingSource for DemoListings {
    fn channel_rows(
        &mut self,
        window_start: DateTime<Utc>,
        column_count: usize,
    ) -> Result<Vec<ChannelRow>> {
        self.refreshes += 1;
        let rows = CHANNELS
            .iter()
            .map(|c| schedule(c, window_start, column_count))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            target: "listings",
            refresh = self.refreshes,
            channels = rows.len(),
            "demo_snapshot"
        );
        Ok(rows)
    }
}
