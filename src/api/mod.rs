//! Messaging gateway: the outbound port and its Telegram implementation.

mod telegram;
mod types;

use anyhow::Result;
use async_trait::async_trait;

pub use telegram::{TelegramClient, TELEGRAM_API_BASE};

/// Outbound side of the chat transport.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send a Markdown-formatted message to a chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;
}
