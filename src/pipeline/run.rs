// src/pipeline/run.rs

//! Poll-cycle orchestration.
//!
//! One invocation runs each configured source to completion, sequentially.
//! Every source has its own failure boundary: a failed fetch or parse is
//! logged and the cycle moves on, so a partial source failure yields a
//! partial result instead of a crashed cycle. Only an error escaping these
//! boundaries reaches the operator report in `main`.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Config, MonitorReport, RawPost};
use crate::notify::{MessageOptions, ParseMode, TelegramNotifier};
use crate::pipeline::{FieldMatcher, ScheduleClassifier, dedup_posts, partition_new};
use crate::services::menu::MenuStatus;
use crate::services::{board, briefing, calendar, dorm, menu};
use crate::storage::StateStore;

/// The reference "today" in Korea Standard Time.
pub fn kst_today() -> NaiveDate {
    (chrono::Utc::now() + chrono::Duration::hours(9)).date_naive()
}

/// Run the campus notice board monitor.
pub async fn run_board(
    config: &Config,
    client: &Client,
    store: &dyn StateStore,
    notifier: &TelegramNotifier,
) -> Result<MonitorReport> {
    log::info!("Scanning board: {}", config.board.url);
    let html = board::fetch_board_page(client, &config.board).await?;
    let posts = dedup_posts(board::parse_board_page(&html, &config.board)?);

    notify_and_persist(
        store,
        notifier,
        &config.paths.board_state_file,
        "board",
        posts,
        |post| briefing::board_message(config, post),
    )
    .await
}

/// Run the dormitory notice monitor.
pub async fn run_dorm(
    config: &Config,
    client: &Client,
    store: &dyn StateStore,
    notifier: &TelegramNotifier,
) -> Result<MonitorReport> {
    log::info!("Scanning dormitory notices: {}", config.dorm.api_url);
    let matcher = FieldMatcher::new(&config.extract);
    let body = dorm::fetch_dorm_body(client, &config.dorm).await?;

    let posts = match dorm::parse_dorm_body(&body, &config.dorm, &matcher) {
        Ok(posts) => dedup_posts(posts),
        Err(error) => {
            // Zero records this cycle; the previous baseline stays intact.
            log::warn!("dorm: {error}");
            return Ok(MonitorReport {
                source: "dorm".to_string(),
                ..MonitorReport::default()
            });
        }
    };

    notify_and_persist(
        store,
        notifier,
        &config.paths.dorm_state_file,
        "dorm",
        posts,
        |post| briefing::dorm_message(config, post),
    )
    .await
}

/// Send the morning briefing: today's schedule, the nearest upcoming
/// events and the cafeteria menu.
pub async fn run_briefing(
    config: &Config,
    client: &Client,
    notifier: &TelegramNotifier,
) -> Result<()> {
    let today = kst_today();

    let mut items = Vec::new();
    for (year, month) in calendar::target_months(today, config.calendar.months) {
        log::info!("Fetching calendar {year}-{month:02}");
        match calendar::fetch_calendar_month(client, &config.calendar, year, month).await {
            Ok(fragment) => match calendar::parse_calendar_fragment(&fragment, &config.calendar) {
                Ok(posts) => items.extend(posts),
                Err(error) => {
                    log::warn!("calendar: unparsable fragment for {year}-{month:02}: {error}")
                }
            },
            Err(error) => log::warn!("calendar: fetch failed for {year}-{month:02}: {error}"),
        }
    }

    let events = calendar::resolve_events(items, today);
    let schedule = ScheduleClassifier::new(&config.schedule).classify(&events, today);
    log::info!(
        "Calendar: {} active today, {} upcoming",
        schedule.active_today.len(),
        schedule.upcoming.len()
    );

    let aux_timeout = Duration::from_secs(config.http.aux_timeout_secs);
    let menu_status = match menu::fetch_menu_page(client, &config.menu, aux_timeout).await {
        Ok(html) => menu::parse_menu_page(&html, &config.menu, today).unwrap_or_else(|error| {
            log::warn!("menu: parse failed: {error}");
            MenuStatus::Unavailable
        }),
        Err(error) => {
            log::warn!("menu: fetch failed: {error}");
            MenuStatus::Unavailable
        }
    };

    let (text, options) =
        briefing::briefing_message(&config.calendar, &config.menu, &schedule, &menu_status, today);
    if let Err(error) = notifier.send(&text, &options).await {
        log::warn!("briefing: delivery failed: {error}");
    }
    Ok(())
}

/// Run every monitor sequentially, each in its own failure boundary.
pub async fn run_all(
    config: &Config,
    client: &Client,
    store: &dyn StateStore,
    notifier: &TelegramNotifier,
) -> Result<()> {
    let mut failed = 0usize;

    if let Err(error) = run_board(config, client, store, notifier).await {
        failed += 1;
        log::error!("board monitor failed: {error}");
    }
    if let Err(error) = run_dorm(config, client, store, notifier).await {
        failed += 1;
        log::error!("dorm monitor failed: {error}");
    }
    if let Err(error) = run_briefing(config, client, notifier).await {
        failed += 1;
        log::error!("briefing failed: {error}");
    }

    if failed > 0 {
        log::warn!("{failed} source(s) failed this cycle");
    }
    Ok(())
}

/// Report a fatal cycle error to the operator channel before exiting.
pub async fn report_fatal(notifier: &TelegramNotifier, error: &AppError) {
    let text = format!("❌ *모니터링 오류 발생*\n\n```\n{error}\n```");
    let options = MessageOptions {
        parse_mode: ParseMode::Markdown,
        disable_preview: true,
        ..MessageOptions::default()
    };
    if let Err(send_error) = notifier.send(&text, &options).await {
        log::error!("failed to report fatal error: {send_error}");
    }
}

/// Diff the current posts against the persisted baseline, send one message
/// per new post and replace the state afterwards.
///
/// The state write happens only after dispatch, so a crashed run can be
/// retried without losing the previous baseline. Delivery failures are
/// logged and block neither later items nor the write.
async fn notify_and_persist<F>(
    store: &dyn StateStore,
    notifier: &TelegramNotifier,
    state_file: &str,
    source: &str,
    posts: Vec<RawPost>,
    compose: F,
) -> Result<MonitorReport>
where
    F: Fn(&RawPost) -> (String, MessageOptions),
{
    let previous = store.load(state_file).await?;
    let diff = partition_new(&previous, &posts);

    let mut report = MonitorReport {
        source: source.to_string(),
        fetched: posts.len(),
        new_posts: diff.new_posts.len(),
        baseline_established: diff.baseline_only,
        ..MonitorReport::default()
    };

    if diff.baseline_only {
        log::info!(
            "{source}: first run, baseline of {} posts established",
            diff.current_ids.len()
        );
    }

    for post in &diff.new_posts {
        log::info!("{source}: new post: {}", post.title);
        let (text, options) = compose(post);
        if let Err(error) = notifier.send(&text, &options).await {
            report.delivery_failures += 1;
            log::warn!("{source}: delivery failed for '{}': {error}", post.title);
        }
    }

    store.replace(state_file, &diff.current_ids).await?;
    log::info!("{source}: state updated ({} ids)", diff.current_ids.len());
    Ok(report)
}
