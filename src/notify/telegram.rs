// src/notify/telegram.rs

//! Telegram Bot API delivery.
//!
//! One best-effort `sendMessage` call per notification. Missing
//! credentials disable delivery so a cycle can run dry without a bot.

use reqwest::Client;
use serde_json::json;

use crate::error::{AppError, Result};

/// Bot credentials, read from the environment (never from config files).
#[derive(Debug, Clone)]
pub struct TelegramCredentials {
    pub token: String,
    pub chat_id: String,
}

impl TelegramCredentials {
    /// Read `TELEGRAM_TOKEN` / `TELEGRAM_CHAT_ID`; `None` when either is
    /// unset or empty.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("TELEGRAM_TOKEN").ok()?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").ok()?;
        if token.is_empty() || chat_id.is_empty() {
            return None;
        }
        Some(Self { token, chat_id })
    }
}

/// Telegram message formatting mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    #[default]
    Markdown,
    Html,
}

impl ParseMode {
    fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Markdown => "Markdown",
            ParseMode::Html => "HTML",
        }
    }
}

/// A single inline keyboard button linking to a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
}

/// Delivery options for one message.
#[derive(Debug, Clone, Default)]
pub struct MessageOptions {
    pub parse_mode: ParseMode,

    /// Suppress the link preview under the message
    pub disable_preview: bool,

    /// Deliver without a client-side notification sound
    pub silent: bool,

    pub button: Option<LinkButton>,
}

/// Sends messages through the Bot API.
pub struct TelegramNotifier {
    credentials: Option<TelegramCredentials>,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(credentials: Option<TelegramCredentials>, client: Client) -> Self {
        Self {
            credentials,
            client,
        }
    }

    pub fn from_env(client: Client) -> Self {
        Self::new(TelegramCredentials::from_env(), client)
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    /// Send one message. A disabled notifier succeeds without sending.
    pub async fn send(&self, text: &str, options: &MessageOptions) -> Result<()> {
        let Some(credentials) = &self.credentials else {
            log::debug!("Telegram disabled (no TELEGRAM_TOKEN/TELEGRAM_CHAT_ID)");
            return Ok(());
        };

        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            credentials.token
        );

        let mut params: Vec<(&str, String)> = vec![
            ("chat_id", credentials.chat_id.clone()),
            ("text", text.to_string()),
            ("parse_mode", options.parse_mode.as_str().to_string()),
        ];
        if options.disable_preview {
            params.push(("disable_web_page_preview", "true".to_string()));
        }
        if options.silent {
            params.push(("disable_notification", "true".to_string()));
        }
        if let Some(button) = &options.button {
            params.push(("reply_markup", keyboard_markup(button)?));
        }

        let response = self.client.post(&url).form(&params).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::delivery(format!(
                "sendMessage returned {status}: {body}"
            )));
        }
        Ok(())
    }
}

/// Inline keyboard payload with a single link button.
fn keyboard_markup(button: &LinkButton) -> Result<String> {
    let keyboard = json!({
        "inline_keyboard": [[{ "text": button.label, "url": button.url }]]
    });
    Ok(serde_json::to_string(&keyboard)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_markup_matches_the_bot_api_shape() {
        let button = LinkButton {
            label: "👉 공지 내용 보러가기".to_string(),
            url: "https://www.kw.ac.kr/ko/life/notice.jsp".to_string(),
        };

        let markup = keyboard_markup(&button).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&markup).unwrap();
        assert_eq!(
            parsed["inline_keyboard"][0][0]["text"],
            "👉 공지 내용 보러가기"
        );
        assert_eq!(
            parsed["inline_keyboard"][0][0]["url"],
            "https://www.kw.ac.kr/ko/life/notice.jsp"
        );
    }

    #[test]
    fn notifier_without_credentials_is_disabled() {
        let notifier = TelegramNotifier::new(None, Client::new());
        assert!(!notifier.is_enabled());
    }

    #[tokio::test]
    async fn disabled_notifier_send_is_a_no_op() {
        let notifier = TelegramNotifier::new(None, Client::new());
        let result = notifier.send("테스트", &MessageOptions::default()).await;
        assert!(result.is_ok());
    }
}
