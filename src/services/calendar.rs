// src/services/calendar.rs

//! Academic calendar fetching and parsing.
//!
//! The calendar API takes `(year, month)` form parameters and answers with
//! an HTML fragment of `<li>` items: a `<strong>` date label and a `<p>`
//! title. Labels never carry a year.

use chrono::{Datelike, Months, NaiveDate};
use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{CalendarConfig, CalendarEvent, RawPost};
use crate::pipeline::{DateRangeResolver, composite_fingerprint, dedup_posts};
use crate::utils::normalize_whitespace;

/// Month windows fetched per cycle: the current month plus the following
/// ones, enough to cover the horizon even at month end.
pub fn target_months(today: NaiveDate, months: u32) -> Vec<(i32, u32)> {
    let first = today.with_day(1).unwrap_or(today);
    (0..months)
        .map(|offset| {
            let month = first + Months::new(offset);
            (month.year(), month.month())
        })
        .collect()
}

/// Fetch one month's calendar fragment.
pub async fn fetch_calendar_month(
    client: &Client,
    config: &CalendarConfig,
    year: i32,
    month: u32,
) -> Result<String> {
    let params = [("sy", year.to_string()), ("sm", month.to_string())];
    let response = client
        .post(&config.api_url)
        .form(&params)
        .send()
        .await?
        .error_for_status()?;
    Ok(response.text().await?)
}

/// Parse a calendar fragment into posts keyed on date label and title.
///
/// Items missing either part are skipped; overlapping month fetches repeat
/// entries, which the composite fingerprint collapses downstream.
pub fn parse_calendar_fragment(fragment: &str, config: &CalendarConfig) -> Result<Vec<RawPost>> {
    let html = Html::parse_fragment(fragment);
    let item_sel = parse_selector(&config.item_selector)?;
    let label_sel = parse_selector(&config.label_selector)?;
    let title_sel = parse_selector(&config.title_selector)?;

    let mut posts = Vec::new();
    for item in html.select(&item_sel) {
        let Some(label_elem) = item.select(&label_sel).next() else {
            continue;
        };
        let Some(title_elem) = item.select(&title_sel).next() else {
            continue;
        };

        let label = normalize_whitespace(&label_elem.text().collect::<String>());
        let title = normalize_whitespace(&title_elem.text().collect::<String>());
        if label.is_empty() || title.is_empty() {
            continue;
        }

        posts.push(RawPost {
            fingerprint: composite_fingerprint(&[&label, &title]),
            title,
            published_label: label,
            detail_link: config.page_url.clone(),
        });
    }
    Ok(posts)
}

/// Deduplicate the collected posts and resolve each into a concrete event.
///
/// Entries whose label yields no resolvable interval are dropped; their
/// siblings are unaffected.
pub fn resolve_events(posts: Vec<RawPost>, today: NaiveDate) -> Vec<CalendarEvent> {
    let resolver = DateRangeResolver::new();
    dedup_posts(posts)
        .into_iter()
        .filter_map(|post| match resolver.resolve(&post.published_label, today) {
            Some((start, end)) => Some(CalendarEvent {
                title: post.title,
                start,
                end,
                source_label: post.published_label,
            }),
            None => {
                log::debug!(
                    "calendar: dropping entry with unresolvable date '{}'",
                    post.published_label
                );
                None
            }
        })
        .collect()
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn three_windows_from_mid_month() {
        let months = target_months(date(2026, 1, 15), 3);
        assert_eq!(months, vec![(2026, 1), (2026, 2), (2026, 3)]);
    }

    #[test]
    fn windows_roll_over_the_year_boundary() {
        let months = target_months(date(2025, 11, 30), 3);
        assert_eq!(months, vec![(2025, 11), (2025, 12), (2026, 1)]);
    }

    #[test]
    fn parses_fragment_items() {
        let fragment = r#"
            <ul>
              <li><strong>02.02(월) ~ 02.27(금)</strong><p>수강신청</p></li>
              <li><strong>03.02(월)</strong><p>개강</p></li>
              <li><p>날짜 없는 항목</p></li>
              <li><strong>03.05(목)</strong></li>
            </ul>
        "#;

        let posts = parse_calendar_fragment(fragment, &CalendarConfig::default()).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "수강신청");
        assert_eq!(posts[0].published_label, "02.02(월) ~ 02.27(금)");
        assert_eq!(posts[1].title, "개강");
    }

    #[test]
    fn overlapping_months_collapse_to_one_event() {
        let fragment = r#"<li><strong>02.02 ~ 02.27</strong><p>수강신청</p></li>"#;
        let config = CalendarConfig::default();

        let mut posts = parse_calendar_fragment(fragment, &config).unwrap();
        posts.extend(parse_calendar_fragment(fragment, &config).unwrap());

        let events = resolve_events(posts, date(2026, 2, 20));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, date(2026, 2, 2));
        assert_eq!(events[0].end, date(2026, 2, 27));
    }

    #[test]
    fn unresolvable_labels_drop_without_affecting_siblings() {
        let fragment = r#"
            <li><strong>상시</strong><p>수시 모집</p></li>
            <li><strong>03.02(월)</strong><p>개강</p></li>
        "#;

        let posts = parse_calendar_fragment(fragment, &CalendarConfig::default()).unwrap();
        let events = resolve_events(posts, date(2026, 2, 20));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "개강");
    }
}
