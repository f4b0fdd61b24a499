// src/services/briefing.rs

//! Outbound message composition.
//!
//! Keeps every user-facing string in one place: the per-post board and
//! dormitory messages and the composed morning briefing.

use chrono::{Datelike, NaiveDate};

use crate::models::{CalendarConfig, Config, MenuConfig, RawPost};
use crate::notify::{LinkButton, MessageOptions, ParseMode};
use crate::pipeline::DaySchedule;
use crate::services::menu::MenuStatus;
use crate::utils::truncate_graphemes;

const WEEKDAYS_KOR: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];

/// Long titles are capped so a digest stays scannable on a phone.
const MAX_TITLE_GRAPHEMES: usize = 120;

pub fn weekday_kor(date: NaiveDate) -> &'static str {
    WEEKDAYS_KOR[date.weekday().num_days_from_monday() as usize]
}

/// Per-post message for the campus notice board.
pub fn board_message(config: &Config, post: &RawPost) -> (String, MessageOptions) {
    let emoji = config.emoji_for(&post.title);
    let title = truncate_graphemes(&post.title, MAX_TITLE_GRAPHEMES);

    let mut text = format!("{emoji} *{title}*");
    if !post.published_label.is_empty() {
        text.push_str("\n\n");
        text.push_str(&post.published_label);
    }

    let options = MessageOptions {
        parse_mode: ParseMode::Markdown,
        button: Some(LinkButton {
            label: config.board.button_label.clone(),
            url: post.detail_link.clone(),
        }),
        ..MessageOptions::default()
    };
    (text, options)
}

/// Per-post message for the dormitory. HTML parse mode so the title can be
/// escaped verbatim; delivered silently as a lower-priority source.
pub fn dorm_message(config: &Config, post: &RawPost) -> (String, MessageOptions) {
    let title = truncate_graphemes(&post.title, MAX_TITLE_GRAPHEMES);
    let text = format!(
        "🏠 <b>[{}] {}</b>\n\n📅 {}",
        config.dorm.tag,
        html_escape::encode_text(&title),
        post.published_label
    );

    let options = MessageOptions {
        parse_mode: ParseMode::Html,
        silent: true,
        button: Some(LinkButton {
            label: config.dorm.button_label.clone(),
            url: post.detail_link.clone(),
        }),
        ..MessageOptions::default()
    };
    (text, options)
}

/// The morning digest: today's schedule, the nearest upcoming events and
/// the cafeteria menu, with links to the full pages.
pub fn briefing_message(
    calendar: &CalendarConfig,
    menu: &MenuConfig,
    schedule: &DaySchedule,
    menu_status: &MenuStatus,
    today: NaiveDate,
) -> (String, MessageOptions) {
    let sections = vec![
        format!("☀️ *광운대 모닝 브리핑* {}", today.format("%Y-%m-%d (%a)")),
        schedule_section(schedule),
        format!(
            "[👉 전체 일정 보기]({})\n────────────────",
            calendar.page_url
        ),
        format!("🥄 *오늘의 학식*\n\n{}", menu_section(menu_status)),
        format!("[👉 전체 식단 보기]({})", menu.url),
    ];

    let options = MessageOptions {
        parse_mode: ParseMode::Markdown,
        disable_preview: true,
        ..MessageOptions::default()
    };
    (sections.join("\n\n"), options)
}

fn schedule_section(schedule: &DaySchedule) -> String {
    let mut lines = vec!["🔔 *오늘의 일정*".to_string()];

    if schedule.active_today.is_empty() {
        lines.push("(일정이 없습니다)".to_string());
    } else {
        for event in &schedule.active_today {
            if event.is_single_day() {
                lines.push(format!("• {}", event.title));
            } else {
                lines.push(format!(
                    "• {} ~ {}({})",
                    event.title,
                    event.end.format("%m.%d"),
                    weekday_kor(event.end)
                ));
            }
        }
    }

    if !schedule.upcoming.is_empty() {
        lines.push(String::new());
        lines.push("⏳ *다가오는 일정*".to_string());
        for upcoming in &schedule.upcoming {
            lines.push(format!(
                "[D-{}] {} {}",
                upcoming.days_until, upcoming.event.title, upcoming.event.source_label
            ));
        }
    }

    lines.join("\n")
}

fn menu_section(status: &MenuStatus) -> String {
    match status {
        MenuStatus::NoTable => "❌ 식단표 없음".to_string(),
        MenuStatus::NotServedToday => "😴 식단 정보 없음 (주말/공휴일)".to_string(),
        MenuStatus::Empty => "🍙 등록된 식단 내용 없음".to_string(),
        MenuStatus::Unavailable => "⚠️ 식단 로딩 실패".to_string(),
        MenuStatus::Sections(sections) => sections
            .iter()
            .map(|s| format!("🍱 *{}*\n{}", s.category, s.items))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}
