//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client behavior settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Campus notice board source
    #[serde(default)]
    pub board: BoardConfig,

    /// Dormitory notice source
    #[serde(default)]
    pub dorm: DormConfig,

    /// Academic calendar source
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Cafeteria menu source
    #[serde(default)]
    pub menu: MenuConfig,

    /// Calendar classification settings
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Field-name synonym tables for record discovery
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Keyword to emoji category rules over post titles
    #[serde(default = "defaults::categories")]
    pub categories: Vec<CategoryRule>,

    /// Persisted state locations
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.aux_timeout_secs == 0 {
            return Err(AppError::validation("http.aux_timeout_secs must be > 0"));
        }
        if self.board.url.trim().is_empty() {
            return Err(AppError::validation("board.url is empty"));
        }
        if self.board.max_rows == 0 {
            return Err(AppError::validation("board.max_rows must be > 0"));
        }
        if self.dorm.api_url.trim().is_empty() {
            return Err(AppError::validation("dorm.api_url is empty"));
        }
        if self.calendar.api_url.trim().is_empty() {
            return Err(AppError::validation("calendar.api_url is empty"));
        }
        if self.calendar.months == 0 {
            return Err(AppError::validation("calendar.months must be > 0"));
        }
        if self.menu.url.trim().is_empty() {
            return Err(AppError::validation("menu.url is empty"));
        }
        if self.schedule.horizon_days <= 0 {
            return Err(AppError::validation("schedule.horizon_days must be > 0"));
        }
        if let UpcomingPolicy::TopN { count } = self.schedule.upcoming {
            if count == 0 {
                return Err(AppError::validation("schedule.upcoming count must be > 0"));
            }
        }
        if self.extract.identity_keys.is_empty() || self.extract.title_keys.is_empty() {
            return Err(AppError::validation("extract synonym tables must not be empty"));
        }
        Ok(())
    }

    /// Pick the category emoji for a title from the keyword rules.
    pub fn emoji_for(&self, title: &str) -> &str {
        self.categories
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| title.contains(k.as_str())))
            .map(|rule| rule.emoji.as_str())
            .unwrap_or(defaults::DEFAULT_EMOJI)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            board: BoardConfig::default(),
            dorm: DormConfig::default(),
            calendar: CalendarConfig::default(),
            menu: MenuConfig::default(),
            schedule: ScheduleConfig::default(),
            extract: ExtractConfig::default(),
            categories: defaults::categories(),
            paths: PathsConfig::default(),
        }
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Shorter timeout for low-priority auxiliary lookups (menu page)
    #[serde(default = "defaults::aux_timeout")]
    pub aux_timeout_secs: u64,

    /// The campus hosts serve certificates that fail strict verification
    #[serde(default = "defaults::accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            aux_timeout_secs: defaults::aux_timeout(),
            accept_invalid_certs: defaults::accept_invalid_certs(),
        }
    }
}

/// Campus notice board source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Board list page URL (also the per-item link fallback)
    #[serde(default = "defaults::board_url")]
    pub url: String,

    /// CSS selector for list rows
    #[serde(default = "defaults::board_row_selector")]
    pub row_selector: String,

    /// CSS selector for the title link inside a row
    #[serde(default = "defaults::board_title_selector")]
    pub title_selector: String,

    /// CSS selector for the metadata block inside a row
    #[serde(default = "defaults::board_info_selector")]
    pub info_selector: String,

    /// Marker text flagging a current-cycle entry
    #[serde(default = "defaults::new_marker")]
    pub new_marker: String,

    /// Tokens stripped from raw titles
    #[serde(default = "defaults::strip_tokens")]
    pub strip_tokens: Vec<String>,

    /// Publishing units whose posts are excluded
    #[serde(default = "defaults::excluded_units")]
    pub excluded_units: Vec<String>,

    /// Maximum rows considered per cycle
    #[serde(default = "defaults::max_rows")]
    pub max_rows: usize,

    /// HTML attribute holding the per-item link
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,

    /// Label of the message button
    #[serde(default = "defaults::board_button_label")]
    pub button_label: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            url: defaults::board_url(),
            row_selector: defaults::board_row_selector(),
            title_selector: defaults::board_title_selector(),
            info_selector: defaults::board_info_selector(),
            new_marker: defaults::new_marker(),
            strip_tokens: defaults::strip_tokens(),
            excluded_units: defaults::excluded_units(),
            max_rows: defaults::max_rows(),
            link_attr: defaults::link_attr(),
            button_label: defaults::board_button_label(),
        }
    }
}

/// Dormitory notice source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DormConfig {
    /// List API endpoint (form-POST)
    #[serde(default = "defaults::dorm_api_url")]
    pub api_url: String,

    /// Human-facing list page, used as the per-item link fallback
    #[serde(default = "defaults::dorm_view_url")]
    pub view_url: String,

    /// Origin header expected by the API
    #[serde(default = "defaults::dorm_origin")]
    pub origin: String,

    /// Referer header expected by the API
    #[serde(default = "defaults::dorm_referer")]
    pub referer: String,

    /// Requested page number
    #[serde(default = "defaults::dorm_page")]
    pub page: String,

    /// Requested row count
    #[serde(default = "defaults::dorm_rows")]
    pub rows: String,

    /// Location code form parameter
    #[serde(default = "defaults::dorm_location_code")]
    pub location_code: String,

    /// Board code form parameter
    #[serde(default = "defaults::dorm_board_code")]
    pub board_code: String,

    /// Display tag prepended to message titles
    #[serde(default = "defaults::dorm_tag")]
    pub tag: String,

    /// Label of the message button
    #[serde(default = "defaults::dorm_button_label")]
    pub button_label: String,
}

impl Default for DormConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::dorm_api_url(),
            view_url: defaults::dorm_view_url(),
            origin: defaults::dorm_origin(),
            referer: defaults::dorm_referer(),
            page: defaults::dorm_page(),
            rows: defaults::dorm_rows(),
            location_code: defaults::dorm_location_code(),
            board_code: defaults::dorm_board_code(),
            tag: defaults::dorm_tag(),
            button_label: defaults::dorm_button_label(),
        }
    }
}

/// Academic calendar source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Month detail API endpoint (form-POST, `sy`/`sm` parameters)
    #[serde(default = "defaults::calendar_api_url")]
    pub api_url: String,

    /// Full calendar page, linked from the briefing
    #[serde(default = "defaults::calendar_page_url")]
    pub page_url: String,

    /// Month windows fetched per cycle, starting from the current month
    #[serde(default = "defaults::calendar_months")]
    pub months: u32,

    /// CSS selector for fragment items
    #[serde(default = "defaults::calendar_item_selector")]
    pub item_selector: String,

    /// CSS selector for the date label inside an item
    #[serde(default = "defaults::calendar_label_selector")]
    pub label_selector: String,

    /// CSS selector for the title inside an item
    #[serde(default = "defaults::calendar_title_selector")]
    pub title_selector: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::calendar_api_url(),
            page_url: defaults::calendar_page_url(),
            months: defaults::calendar_months(),
            item_selector: defaults::calendar_item_selector(),
            label_selector: defaults::calendar_label_selector(),
            title_selector: defaults::calendar_title_selector(),
        }
    }
}

/// Cafeteria menu source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Menu page URL
    #[serde(default = "defaults::menu_url")]
    pub url: String,

    /// CSS selector for the weekly menu table
    #[serde(default = "defaults::menu_table_selector")]
    pub table_selector: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            url: defaults::menu_url(),
            table_selector: defaults::menu_table_selector(),
        }
    }
}

/// Calendar classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Maximum days ahead an event may start and still count as upcoming
    #[serde(default = "defaults::horizon_days")]
    pub horizon_days: i64,

    /// Selection policy over the upcoming bucket
    #[serde(default = "defaults::upcoming_policy")]
    pub upcoming: UpcomingPolicy,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            horizon_days: defaults::horizon_days(),
            upcoming: defaults::upcoming_policy(),
        }
    }
}

/// Selection policy over upcoming events.
///
/// Both policies appear in the revision history of this bot, so the choice
/// is configuration rather than code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpcomingPolicy {
    /// Only the events sharing the minimum day offset (same-day ties all
    /// included)
    NearestDay,

    /// The first `count` events ordered by day offset
    TopN { count: usize },
}

/// Field-name synonym tables for record discovery, in rank order.
///
/// Matching is case-insensitive; the source APIs have used `seq`/`subject`
/// and `id`/`title`/`nttSj` spellings across revisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "defaults::identity_keys")]
    pub identity_keys: Vec<String>,

    #[serde(default = "defaults::title_keys")]
    pub title_keys: Vec<String>,

    #[serde(default = "defaults::date_keys")]
    pub date_keys: Vec<String>,

    /// Envelope keys whose branches are visited before the rest, so pinned
    /// collections stay ahead of regular ones
    #[serde(default = "defaults::pinned_keys")]
    pub pinned_keys: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            identity_keys: defaults::identity_keys(),
            title_keys: defaults::title_keys(),
            date_keys: defaults::date_keys(),
            pinned_keys: defaults::pinned_keys(),
        }
    }
}

/// A keyword to emoji category rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Keywords searched in the post title
    pub keywords: Vec<String>,

    /// Emoji marker for matching posts
    pub emoji: String,
}

/// Persisted state locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the per-source state files
    #[serde(default = "defaults::state_dir")]
    pub state_dir: PathBuf,

    /// Board monitor state file name
    #[serde(default = "defaults::board_state_file")]
    pub board_state_file: String,

    /// Dormitory monitor state file name
    #[serde(default = "defaults::dorm_state_file")]
    pub dorm_state_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: defaults::state_dir(),
            board_state_file: defaults::board_state_file(),
            dorm_state_file: defaults::dorm_state_file(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use super::{CategoryRule, UpcomingPolicy};

    pub const DEFAULT_EMOJI: &str = "📢";

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/91.0.4472.124 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn aux_timeout() -> u64 {
        5
    }
    pub fn accept_invalid_certs() -> bool {
        true
    }

    // Board defaults
    pub fn board_url() -> String {
        "https://www.kw.ac.kr/ko/life/notice.jsp".into()
    }
    pub fn board_row_selector() -> String {
        ".board-list-box ul li".into()
    }
    pub fn board_title_selector() -> String {
        "div.board-text > a".into()
    }
    pub fn board_info_selector() -> String {
        "p.info".into()
    }
    pub fn new_marker() -> String {
        "신규게시글".into()
    }
    pub fn strip_tokens() -> Vec<String> {
        vec!["신규게시글".into(), "Attachment".into()]
    }
    pub fn excluded_units() -> Vec<String> {
        vec!["교수지원팀".into()]
    }
    pub fn max_rows() -> usize {
        50
    }
    pub fn link_attr() -> String {
        "href".into()
    }
    pub fn board_button_label() -> String {
        "👉 공지 내용 보러가기".into()
    }

    // Dormitory defaults
    pub fn dorm_api_url() -> String {
        "https://kw.happydorm.or.kr/bbs/getBbsList.do".into()
    }
    pub fn dorm_view_url() -> String {
        "https://kw.happydorm.or.kr/60/6010.do".into()
    }
    pub fn dorm_origin() -> String {
        "https://kw.happydorm.or.kr".into()
    }
    pub fn dorm_referer() -> String {
        "https://kw.happydorm.or.kr/60/6010.do".into()
    }
    pub fn dorm_page() -> String {
        "1".into()
    }
    pub fn dorm_rows() -> String {
        "10".into()
    }
    pub fn dorm_location_code() -> String {
        "KW".into()
    }
    pub fn dorm_board_code() -> String {
        "notice".into()
    }
    pub fn dorm_tag() -> String {
        "행복기숙사".into()
    }
    pub fn dorm_button_label() -> String {
        "👉 기숙사 공지 보러가기".into()
    }

    // Calendar defaults
    pub fn calendar_api_url() -> String {
        "https://www.kw.ac.kr/KWBoard/list5_detail.jsp".into()
    }
    pub fn calendar_page_url() -> String {
        "https://www.kw.ac.kr/ko/life/bachelor_calendar.jsp".into()
    }
    pub fn calendar_months() -> u32 {
        3
    }
    pub fn calendar_item_selector() -> String {
        "li".into()
    }
    pub fn calendar_label_selector() -> String {
        "strong".into()
    }
    pub fn calendar_title_selector() -> String {
        "p".into()
    }

    // Menu defaults
    pub fn menu_url() -> String {
        "https://www.kw.ac.kr/ko/life/facility11.jsp".into()
    }
    pub fn menu_table_selector() -> String {
        "table.tbl-list".into()
    }

    // Schedule defaults
    pub fn horizon_days() -> i64 {
        50
    }
    pub fn upcoming_policy() -> UpcomingPolicy {
        UpcomingPolicy::NearestDay
    }

    // Extraction synonym tables, rank order
    pub fn identity_keys() -> Vec<String> {
        vec!["seq".into(), "id".into()]
    }
    pub fn title_keys() -> Vec<String> {
        vec!["subject".into(), "title".into(), "nttSj".into()]
    }
    pub fn date_keys() -> Vec<String> {
        vec!["regdate".into(), "reg_date".into(), "date".into()]
    }
    pub fn pinned_keys() -> Vec<String> {
        vec!["noticeList".into()]
    }

    // Path defaults
    pub fn state_dir() -> PathBuf {
        ".".into()
    }
    pub fn board_state_file() -> String {
        "data.txt".into()
    }
    pub fn dorm_state_file() -> String {
        "dorm_data.txt".into()
    }

    // Category defaults
    pub fn categories() -> Vec<CategoryRule> {
        vec![
            rule(&["장학", "대출"], "💰"),
            rule(&["학사", "수업", "복학"], "📅"),
            rule(&["행사", "축제", "특강"], "🎉"),
            rule(&["채용", "모집", "인턴"], "👔"),
            rule(&["국제", "교환"], "✈️"),
            rule(&["봉사"], "❤️"),
            rule(&["대회", "공모"], "🏆"),
        ]
    }

    fn rule(keywords: &[&str], emoji: &str) -> CategoryRule {
        CategoryRule {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            emoji: emoji.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_horizon() {
        let mut config = Config::default();
        config.schedule.horizon_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_top_n() {
        let mut config = Config::default();
        config.schedule.upcoming = UpcomingPolicy::TopN { count: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn emoji_follows_keyword_rules() {
        let config = Config::default();
        assert_eq!(config.emoji_for("2026년 국가장학금 신청 안내"), "💰");
        assert_eq!(config.emoji_for("동계 인턴 모집"), "👔");
        assert_eq!(config.emoji_for("시설 점검 안내"), "📢");
    }

    #[test]
    fn upcoming_policy_parses_from_toml() {
        let parsed: ScheduleConfig = toml::from_str(
            r#"
            horizon_days = 14
            upcoming = { kind = "top_n", count = 3 }
            "#,
        )
        .unwrap();
        assert_eq!(parsed.horizon_days, 14);
        assert_eq!(parsed.upcoming, UpcomingPolicy::TopN { count: 3 });
    }
}
