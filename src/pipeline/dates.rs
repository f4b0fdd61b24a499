//! Date-range resolution for year-less calendar labels.

use chrono::{Datelike, NaiveDate};
use regex::Regex;

/// Resolves `MM.DD`-style labels into concrete date intervals.
///
/// The academic calendar reports dates without a year, so the year is
/// inferred from the reference "today". The inference only handles the
/// single academic-year wraparound near December/January; a label more
/// than about two months across a year boundary from today would be
/// misattributed, which the source data does not exhibit.
pub struct DateRangeResolver {
    pattern: Regex,
}

impl DateRangeResolver {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"(\d{2})\.(\d{2})").expect("day-month pattern is valid"),
        }
    }

    /// Resolve a label holding one or two `MM.DD` tokens into a closed
    /// interval relative to `today`.
    ///
    /// Returns `None` when no token is found, when a token is not a real
    /// calendar day, or when the resolved interval would end before it
    /// starts; the caller drops the record in every case.
    pub fn resolve(&self, label: &str, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let tokens: Vec<(u32, u32)> = self
            .pattern
            .captures_iter(label)
            .filter_map(|cap| Some((cap[1].parse().ok()?, cap[2].parse().ok()?)))
            .collect();
        let first = *tokens.first()?;

        let mut year = today.year();
        if today.month() >= 11 && first.0 <= 2 {
            // Event already rolled over into next year
            year += 1;
        } else if today.month() <= 2 && first.0 >= 11 {
            // Event still attributed to the prior year
            year -= 1;
        }

        let start = NaiveDate::from_ymd_opt(year, first.0, first.1)?;
        let end = match tokens.get(1) {
            Some(&(month, day)) => NaiveDate::from_ymd_opt(year, month, day)?,
            None => start,
        };
        if end < start {
            return None;
        }
        Some((start, end))
    }
}

impl Default for DateRangeResolver {
    fn default() -> Self {
        Self::new()
    }
}
