// src/services/menu.rs

//! Cafeteria menu page parsing.
//!
//! The weekly menu is a static table whose column headers carry ISO dates;
//! today's column is located by substring match against the KST date.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::MenuConfig;
use crate::utils::normalize_whitespace;

/// One menu table section: a counter and its dishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSection {
    pub category: String,

    /// Dishes, newline-separated as rendered in the cell
    pub items: String,
}

/// Outcome of a menu lookup for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuStatus {
    /// The page carried no menu table at all
    NoTable,
    /// No column for today (weekend or holiday)
    NotServedToday,
    /// A column exists but every cell under it is empty
    Empty,
    /// The page could not be fetched or parsed
    Unavailable,
    Sections(Vec<MenuSection>),
}

/// Fetch the menu page with the low-priority timeout.
pub async fn fetch_menu_page(
    client: &Client,
    config: &MenuConfig,
    timeout: Duration,
) -> Result<String> {
    let response = client
        .get(&config.url)
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?;
    Ok(response.text().await?)
}

/// Find today's column and collect every non-empty row section under it.
pub fn parse_menu_page(html: &str, config: &MenuConfig, today: NaiveDate) -> Result<MenuStatus> {
    let document = Html::parse_document(html);
    let table_sel = parse_selector(&config.table_selector)?;
    let header_sel = parse_selector("thead th")?;
    let row_sel = parse_selector("tbody tr")?;
    let cell_sel = parse_selector("td")?;

    let Some(table) = document.select(&table_sel).next() else {
        return Ok(MenuStatus::NoTable);
    };

    let today_text = today.format("%Y-%m-%d").to_string();
    let target = table.select(&header_sel).position(|th| {
        let text: String = th.text().collect();
        text.contains(&today_text)
    });
    let Some(target_idx) = target else {
        return Ok(MenuStatus::NotServedToday);
    };

    let mut sections = Vec::new();
    for row in table.select(&row_sel) {
        let cells: Vec<_> = row.select(&cell_sel).collect();
        if cells.len() <= target_idx {
            continue;
        }

        let raw_category = cells[0].text().collect::<Vec<_>>().join(" ");
        let category =
            normalize_whitespace(raw_category.split("판매시간").next().unwrap_or_default());

        let items = cells[target_idx]
            .text()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if !items.is_empty() {
            sections.push(MenuSection { category, items });
        }
    }

    if sections.is_empty() {
        Ok(MenuStatus::Empty)
    } else {
        Ok(MenuStatus::Sections(sections))
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
