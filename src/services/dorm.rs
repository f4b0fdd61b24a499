// src/services/dorm.rs

//! Dormitory notice monitor.
//!
//! The dormitory site exposes its list through a form-POST API whose JSON
//! envelope has changed shape across revisions, so the body is walked with
//! the schema-free extractor instead of a fixed deserialization.

use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{DormConfig, RawPost};
use crate::pipeline::{FieldMatcher, extract_records};

const MISSING_DATE_LABEL: &str = "날짜 미상";

/// Fetch the raw notice list body.
pub async fn fetch_dorm_body(client: &Client, config: &DormConfig) -> Result<String> {
    let params = [
        ("cPage", config.page.as_str()),
        ("rows", config.rows.as_str()),
        ("bbs_locgbn", config.location_code.as_str()),
        ("bbs_id", config.board_code.as_str()),
        ("sWord", ""),
    ];

    let response = client
        .post(&config.api_url)
        .header("Origin", &config.origin)
        .header("Referer", &config.referer)
        .form(&params)
        .send()
        .await?
        .error_for_status()?;
    Ok(response.text().await?)
}

/// Decode the body and normalize every discovered record.
pub fn parse_dorm_body(
    body: &str,
    config: &DormConfig,
    matcher: &FieldMatcher,
) -> Result<Vec<RawPost>> {
    let tree: Value =
        serde_json::from_str(body).map_err(|e| AppError::malformed("dorm", e))?;
    Ok(posts_from_tree(&tree, config, matcher))
}

/// Map discovered records onto posts.
///
/// The API exposes no per-item link, so every post points at the
/// configured view page. The native sequence id is the fingerprint.
pub fn posts_from_tree(tree: &Value, config: &DormConfig, matcher: &FieldMatcher) -> Vec<RawPost> {
    extract_records(tree, matcher)
        .into_iter()
        .map(|record| RawPost {
            fingerprint: record.identity,
            title: record.title,
            published_label: record
                .date_label
                .unwrap_or_else(|| MISSING_DATE_LABEL.to_string()),
            detail_link: config.view_url.clone(),
        })
        .collect()
}
