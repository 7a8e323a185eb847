//! Program listings.

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use thiserror::Error;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ProgramFlags: u8 {
        const MOVIE            = 0b0000_0001;
        const STEREO           = 0b0000_0010;
        const CLOSED_CAPTIONED = 0b0000_0100;
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("program `{title}` ends at {end} which is not after its start {start}")]
    InvalidInterval {
        title: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// A single airing. Immutable once constructed; `start < end` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    title: String,
    description: Option<String>,
    year: Option<u16>,
    rating: Option<String>,
    flags: ProgramFlags,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Program {
    pub fn new(
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, ModelError> {
        let title = title.into();
        if end <= start {
            return Err(ModelError::InvalidInterval { title, start, end });
        }
        Ok(Self {
            title,
            description: None,
            year: None,
            rating: None,
            flags: ProgramFlags::empty(),
            start,
            end,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    pub fn with_flags(mut self, flags: ProgramFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
    pub fn year(&self) -> Option<u16> {
        self.year
    }
    pub fn rating(&self) -> Option<&str> {
        self.rating.as_deref()
    }
    pub fn flags(&self) -> ProgramFlags {
        self.flags
    }
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
    pub fn is_movie(&self) -> bool {
        self.flags.contains(ProgramFlags::MOVIE)
    }

    /// Text shown in the program's grid cell.
    ///
    /// Movies: `"Title" (Year) Description Rating`; everything else:
    /// `Title Description Rating`. Flag tokens (`%STEREO%`, `%CC%`) are
    /// appended and later drawn as icons by the renderer. Absent parts are
    /// omitted rather than leaving double spaces.
    pub fn listing_text(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(6);
        if self.is_movie() {
            parts.push(format!("\"{}\"", self.title));
            if let Some(year) = self.year {
                parts.push(format!("({year})"));
            }
        } else {
            parts.push(self.title.clone());
        }
        if let Some(d) = self.description.as_deref()
            && !d.trim().is_empty()
        {
            parts.push(d.trim().to_string());
        }
        if let Some(r) = self.rating.as_deref()
            && !r.trim().is_empty()
        {
            parts.push(r.trim().to_string());
        }
        if self.flags.contains(ProgramFlags::STEREO) {
            parts.push("%STEREO%".to_string());
        }
        if self.flags.contains(ProgramFlags::CLOSED_CAPTIONED) {
            parts.push("%CC%".to_string());
        }
        parts.join(" ")
    }
}
