//! Outbound notification delivery.

mod telegram;

pub use telegram::{LinkButton, MessageOptions, ParseMode, TelegramCredentials, TelegramNotifier};
