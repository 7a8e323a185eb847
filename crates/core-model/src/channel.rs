use crate::program::Program;
use crate::time_grid::clamp_to_previous_half_hour;
use chrono::{DateTime, Utc};

/// One guide row: a channel and its programs for the visible window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRow {
    number: String,
    call_sign: String,
    first_column_start: DateTime<Utc>,
    programs: Vec<Program>,
}

impl ChannelRow {
    /// Programs are stably sorted by start; `first_column_start` is clamped
    /// onto a half-hour boundary.
    pub fn new(
        number: impl Into<String>,
        call_sign: impl Into<String>,
        first_column_start: DateTime<Utc>,
        mut programs: Vec<Program>,
    ) -> Self {
        programs.sort_by_key(|p| p.start());
        Self {
            number: number.into(),
            call_sign: call_sign.into(),
            first_column_start: clamp_to_previous_half_hour(first_column_start),
            programs,
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn call_sign(&self) -> &str {
        &self.call_sign
    }

    pub fn first_column_start(&self) -> DateTime<Utc> {
        self.first_column_start
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Rows holding a single program get the tall (multi-line) treatment.
    pub fn is_single_program(&self) -> bool {
        self.programs.len() == 1
    }

    /// Text for the channel label column.
    pub fn label_text(&self) -> String {
        match (self.number.is_empty(), self.call_sign.is_empty()) {
            (false, false) => format!("{} {}", self.number, self.call_sign),
            (false, true) => self.number.clone(),
            _ => self.call_sign.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, h, m, 0).unwrap()
    }

    #[test]
    fn programs_sorted_stably_by_start() {
        let a = Program::new("a", t(19, 0), t(19, 30)).unwrap();
        let b = Program::new("b", t(18, 0), t(18, 30)).unwrap();
        let c = Program::new("c", t(18, 0), t(19, 0)).unwrap();
        let row = ChannelRow::new("2", "KTVU", t(18, 0), vec![a, b, c]);
        let titles: Vec<_> = row.programs().iter().map(|p| p.title()).collect();
        assert_eq!(titles, vec!["b", "c", "a"]);
        assert!(!row.is_single_program());
    }

    #[test]
    fn window_start_clamped() {
        let row = ChannelRow::new("2", "KTVU", t(18, 17), Vec::new());
        assert_eq!(row.first_column_start(), t(18, 0));
    }

    fn label(number: &str, call_sign: &str) -> String {
        ChannelRow::new(number, call_sign, t(0, 0), vec![]).label_text()
    }

    #[test]
    fn label_text_variants() {
        assert_eq!(label("4", "WNBC"), "4 WNBC");
        assert_eq!(label("4", ""), "4");
        assert_eq!(label("", "HBO"), "HBO");
    }
}
