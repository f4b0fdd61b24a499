// src/services/board.rs

//! Campus notice board monitor.
//!
//! Parses the board list page, keeps rows flagged as current-cycle entries
//! and extracts a title, link and cleaned metadata line from each.

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{BoardConfig, RawPost};
use crate::pipeline::composite_fingerprint;
use crate::utils::{normalize_whitespace, resolve_url};

/// Fetch the raw board page.
pub async fn fetch_board_page(client: &Client, config: &BoardConfig) -> Result<String> {
    let response = client.get(&config.url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

/// Parse the board list page into normalized posts, in display order.
pub fn parse_board_page(html: &str, config: &BoardConfig) -> Result<Vec<RawPost>> {
    let document = Html::parse_document(html);
    let row_sel = parse_selector(&config.row_selector)?;
    let title_sel = parse_selector(&config.title_selector)?;
    let info_sel = parse_selector(&config.info_selector)?;
    let base_url = url::Url::parse(&config.url)?;

    let rows: Vec<ElementRef> = document.select(&row_sel).take(config.max_rows).collect();
    if rows.is_empty() {
        log::warn!(
            "board: no rows matched '{}'; page layout may have changed",
            config.row_selector
        );
    }

    let mut posts = Vec::new();
    for row in rows {
        let row_text: String = row.text().collect();
        if !row_text.contains(&config.new_marker) {
            continue;
        }

        let info = row.select(&info_sel).next();
        if let Some(info_elem) = info {
            let info_text: String = info_elem.text().collect();
            if config
                .excluded_units
                .iter()
                .any(|unit| info_text.contains(unit.as_str()))
            {
                log::debug!("board: skipping post from excluded unit");
                continue;
            }
        }

        let Some(title_elem) = row.select(&title_sel).next() else {
            continue;
        };
        let raw_title: String = title_elem.text().collect();
        let title = clean_title(&raw_title, &config.strip_tokens);
        if title.is_empty() {
            log::debug!("board: skipping row without a resolvable title");
            continue;
        }

        let link = title_elem
            .value()
            .attr(&config.link_attr)
            .map(|href| resolve_url(&base_url, href))
            .unwrap_or_else(|| config.url.clone());

        let published_label = info.map(clean_info_line).unwrap_or_default();

        posts.push(RawPost {
            fingerprint: composite_fingerprint(&[&title, &link]),
            title,
            published_label,
            detail_link: link,
        });
    }
    Ok(posts)
}

fn clean_title(raw: &str, strip_tokens: &[String]) -> String {
    let mut title = normalize_whitespace(raw);
    for token in strip_tokens {
        title = title.replace(token.as_str(), "");
    }
    title.trim().to_string()
}

/// Rebuild the display metadata line from the info block's text nodes.
///
/// The board renders a "수정일" label and its value as separate nodes;
/// both are skipped as a unit. "조회" counters are dropped. A "작성일"
/// label is rejoined with the value that follows it.
fn clean_info_line(info: ElementRef<'_>) -> String {
    let parts: Vec<String> = info
        .text()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();

    let mut kept: Vec<String> = Vec::new();
    let mut skip_next_value = false;
    for part in parts {
        if part.contains("수정일") {
            skip_next_value = true;
            continue;
        }
        if skip_next_value {
            skip_next_value = false;
            if part.chars().any(|c| c.is_ascii_digit()) {
                continue;
            }
        }
        if part.contains("조회") {
            continue;
        }
        kept.push(part);
    }

    let mut joined: Vec<String> = Vec::new();
    let mut idx = 0;
    while idx < kept.len() {
        if kept[idx].contains("작성일") && idx + 1 < kept.len() {
            joined.push(format!("{} {}", kept[idx], kept[idx + 1]));
            idx += 2;
        } else {
            joined.push(kept[idx].clone());
            idx += 1;
        }
    }

    if joined.is_empty() {
        String::new()
    } else {
        format!("| {}", joined.join(" | "))
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> String {
        r#"
        <html><body>
        <div class="board-list-box">
          <ul>
            <li>
              <div class="board-text"><a href="/ko/life/notice.jsp?id=101">신규게시글 국가장학금 신청 안내 Attachment</a></div>
              <p class="info"><span>학생지원팀</span><span>작성일</span><span>2026-02-02</span><span>수정일</span><span>2026-02-03</span><span>조회 123</span></p>
            </li>
            <li>
              <div class="board-text"><a href="/ko/life/notice.jsp?id=102">지난 공지</a></div>
              <p class="info"><span>학사팀</span></p>
            </li>
            <li>
              <div class="board-text"><a href="/ko/life/notice.jsp?id=103">신규게시글 교원 연수 안내</a></div>
              <p class="info"><span>교수지원팀</span><span>작성일</span><span>2026-02-02</span></p>
            </li>
          </ul>
        </div>
        </body></html>
        "#
        .to_string()
    }

    #[test]
    fn keeps_only_marked_rows_outside_excluded_units() {
        let posts = parse_board_page(&sample_page(), &BoardConfig::default()).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "국가장학금 신청 안내");
    }

    #[test]
    fn resolves_relative_links_against_the_board_url() {
        let posts = parse_board_page(&sample_page(), &BoardConfig::default()).unwrap();
        assert_eq!(
            posts[0].detail_link,
            "https://www.kw.ac.kr/ko/life/notice.jsp?id=101"
        );
    }

    #[test]
    fn info_line_drops_edit_date_and_view_count() {
        let posts = parse_board_page(&sample_page(), &BoardConfig::default()).unwrap();
        assert_eq!(posts[0].published_label, "| 학생지원팀 | 작성일 2026-02-02");
    }

    #[test]
    fn fingerprint_is_stable_across_polls() {
        let first = parse_board_page(&sample_page(), &BoardConfig::default()).unwrap();
        let second = parse_board_page(&sample_page(), &BoardConfig::default()).unwrap();
        assert_eq!(first[0].fingerprint, second[0].fingerprint);
    }

    #[test]
    fn missing_link_falls_back_to_the_board_url() {
        let html = r#"
        <div class="board-list-box"><ul>
          <li><div class="board-text"><a>신규게시글 링크 없는 공지</a></div></li>
        </ul></div>
        "#;

        let config = BoardConfig::default();
        let posts = parse_board_page(html, &config).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].detail_link, config.url);
        assert!(posts[0].published_label.is_empty());
    }

    #[test]
    fn empty_title_row_is_dropped() {
        let html = r#"
        <div class="board-list-box"><ul>
          <li><div class="board-text"><a href="/x">신규게시글 Attachment</a></div></li>
        </ul></div>
        "#;

        let posts = parse_board_page(html, &BoardConfig::default()).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn page_without_the_container_yields_zero_posts() {
        let posts = parse_board_page("<html><body></body></html>", &BoardConfig::default());
        assert!(posts.unwrap().is_empty());
    }

    #[test]
    fn respects_the_row_limit() {
        let rows: String = (0..60)
            .map(|i| {
                format!(
                    r#"<li><div class="board-text"><a href="/n/{i}">신규게시글 공지 {i}</a></div></li>"#
                )
            })
            .collect();
        let html = format!(r#"<div class="board-list-box"><ul>{rows}</ul></div>"#);

        let posts = parse_board_page(&html, &BoardConfig::default()).unwrap();
        assert_eq!(posts.len(), 50);
    }
}
