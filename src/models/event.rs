//! Academic calendar events.

use chrono::NaiveDate;

/// A resolved academic-calendar entry.
///
/// The source labels carry no year, so `start` and `end` are inferred
/// relative to a reference "today". Closed interval: `start <= end`.
/// Derived fresh on every poll and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String,
    pub start: NaiveDate,
    pub end: NaiveDate,

    /// Original date text, for display
    pub source_label: String,
}

impl CalendarEvent {
    /// Whether the event covers the given day.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.start <= today && today <= self.end
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(start: NaiveDate, end: NaiveDate) -> CalendarEvent {
        CalendarEvent {
            title: "수강신청".to_string(),
            start,
            end,
            source_label: "02.02(월) ~ 02.27(금)".to_string(),
        }
    }

    #[test]
    fn active_over_closed_interval() {
        let e = event(date(2026, 2, 20), date(2026, 2, 27));
        assert!(e.is_active(date(2026, 2, 20)));
        assert!(e.is_active(date(2026, 2, 24)));
        assert!(e.is_active(date(2026, 2, 27)));
        assert!(!e.is_active(date(2026, 2, 19)));
        assert!(!e.is_active(date(2026, 2, 28)));
    }

    #[test]
    fn single_day_event() {
        let e = event(date(2026, 3, 2), date(2026, 3, 2));
        assert!(e.is_single_day());
        assert!(e.is_active(date(2026, 3, 2)));
    }
}
