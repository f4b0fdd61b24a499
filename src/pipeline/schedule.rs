//! Calendar event classification for the daily briefing.

use chrono::NaiveDate;

use crate::models::{CalendarEvent, ScheduleConfig, UpcomingPolicy};

/// An upcoming event with its day offset from the reference today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingEvent {
    pub event: CalendarEvent,
    pub days_until: i64,
}

/// Events bucketed for one reference day.
#[derive(Debug, Clone, Default)]
pub struct DaySchedule {
    /// Events whose interval covers today
    pub active_today: Vec<CalendarEvent>,

    /// Future events within the horizon, after policy selection
    pub upcoming: Vec<UpcomingEvent>,
}

/// Buckets resolved events into "active today" and "upcoming".
#[derive(Debug, Clone)]
pub struct ScheduleClassifier {
    horizon_days: i64,
    policy: UpcomingPolicy,
}

impl ScheduleClassifier {
    pub fn new(config: &ScheduleConfig) -> Self {
        Self {
            horizon_days: config.horizon_days,
            policy: config.upcoming.clone(),
        }
    }

    pub fn classify(&self, events: &[CalendarEvent], today: NaiveDate) -> DaySchedule {
        let mut schedule = DaySchedule::default();

        for event in events {
            if event.is_active(today) {
                schedule.active_today.push(event.clone());
            } else if event.start > today {
                let days_until = (event.start - today).num_days();
                if days_until <= self.horizon_days {
                    schedule.upcoming.push(UpcomingEvent {
                        event: event.clone(),
                        days_until,
                    });
                }
            }
        }

        schedule.upcoming = self.select_upcoming(schedule.upcoming);
        schedule
    }

    /// Apply the configured selection policy over the upcoming bucket.
    fn select_upcoming(&self, mut upcoming: Vec<UpcomingEvent>) -> Vec<UpcomingEvent> {
        match &self.policy {
            UpcomingPolicy::NearestDay => {
                let Some(nearest) = upcoming.iter().map(|u| u.days_until).min() else {
                    return upcoming;
                };
                upcoming.retain(|u| u.days_until == nearest);
                upcoming
            }
            UpcomingPolicy::TopN { count } => {
                upcoming.sort_by_key(|u| u.days_until);
                upcoming.truncate(*count);
                upcoming
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(title: &str, start: NaiveDate, end: NaiveDate) -> CalendarEvent {
        CalendarEvent {
            title: title.to_string(),
            start,
            end,
            source_label: "02.20(금) ~ 02.27(금)".to_string(),
        }
    }

    fn classifier(horizon_days: i64, policy: UpcomingPolicy) -> ScheduleClassifier {
        ScheduleClassifier::new(&ScheduleConfig {
            horizon_days,
            upcoming: policy,
        })
    }

    #[test]
    fn ranged_event_is_active_over_its_closed_interval() {
        let events = vec![event("수강신청", date(2026, 2, 20), date(2026, 2, 27))];
        let classifier = classifier(50, UpcomingPolicy::NearestDay);

        for day in 20..=27 {
            let schedule = classifier.classify(&events, date(2026, 2, day));
            assert_eq!(schedule.active_today.len(), 1, "day {day}");
        }
        let after = classifier.classify(&events, date(2026, 2, 28));
        assert!(after.active_today.is_empty());
    }

    #[test]
    fn nearest_day_keeps_all_ties_and_nothing_else() {
        let today = date(2026, 3, 1);
        let events = vec![
            event("개강", date(2026, 3, 6), date(2026, 3, 6)),
            event("수강정정", date(2026, 3, 6), date(2026, 3, 10)),
            event("등록금 납부", date(2026, 3, 10), date(2026, 3, 10)),
        ];

        let schedule = classifier(50, UpcomingPolicy::NearestDay).classify(&events, today);
        let titles: Vec<&str> = schedule
            .upcoming
            .iter()
            .map(|u| u.event.title.as_str())
            .collect();
        assert_eq!(titles, vec!["개강", "수강정정"]);
        assert!(schedule.upcoming.iter().all(|u| u.days_until == 5));
    }

    #[test]
    fn top_n_takes_the_closest_in_stable_order() {
        let today = date(2026, 3, 1);
        let events = vec![
            event("늦은 일정", date(2026, 3, 20), date(2026, 3, 20)),
            event("가까운 일정", date(2026, 3, 4), date(2026, 3, 4)),
            event("중간 일정", date(2026, 3, 10), date(2026, 3, 10)),
        ];

        let schedule = classifier(50, UpcomingPolicy::TopN { count: 2 }).classify(&events, today);
        let titles: Vec<&str> = schedule
            .upcoming
            .iter()
            .map(|u| u.event.title.as_str())
            .collect();
        assert_eq!(titles, vec!["가까운 일정", "중간 일정"]);
    }

    #[test]
    fn horizon_excludes_distant_events() {
        let today = date(2026, 3, 1);
        let events = vec![
            event("곧", date(2026, 3, 10), date(2026, 3, 10)),
            event("먼 미래", date(2026, 5, 1), date(2026, 5, 1)),
        ];

        let schedule = classifier(14, UpcomingPolicy::NearestDay).classify(&events, today);
        assert_eq!(schedule.upcoming.len(), 1);
        assert_eq!(schedule.upcoming[0].event.title, "곧");
    }

    #[test]
    fn past_events_are_ignored() {
        let today = date(2026, 3, 1);
        let events = vec![event("지난 일정", date(2026, 2, 1), date(2026, 2, 5))];

        let schedule = classifier(50, UpcomingPolicy::NearestDay).classify(&events, today);
        assert!(schedule.active_today.is_empty());
        assert!(schedule.upcoming.is_empty());
    }
}
