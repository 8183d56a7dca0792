//! Telegram Bot API request and response types.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Command, IncomingMessage};

/// Envelope of every Bot API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

/// Response of `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// One entry of `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub date: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: usize,
}

impl Message {
    /// Command name when the message starts with a bot command, without the
    /// leading `/` and any `@botname` suffix.
    pub fn command(&self) -> Option<&str> {
        let starts_with_command = self
            .entities
            .first()
            .is_some_and(|e| e.kind == "bot_command" && e.offset == 0);
        if !starts_with_command {
            return None;
        }

        let text = self.text.as_deref()?;
        let token = text.split_whitespace().next()?.strip_prefix('/')?;
        Some(token.split('@').next().unwrap_or(token))
    }
}

impl Update {
    /// Convert into the orchestrator's view of a message.
    ///
    /// Updates without a message, without a sender, or sent by a bot are skipped.
    pub fn into_incoming(self) -> Option<IncomingMessage> {
        let message = self.message?;
        let user = message.from.as_ref()?;
        if user.is_bot {
            return None;
        }
        let user_id = user.id;
        let command = message.command().map(Command::from_name);

        Some(IncomingMessage {
            chat_id: message.chat.id,
            user_id,
            command,
            sent_at: Utc
                .timestamp_opt(message.date, 0)
                .single()
                .unwrap_or_else(Utc::now),
            text: message.text.unwrap_or_default(),
        })
    }
}

/// Body of `getUpdates`.
#[derive(Debug, Clone, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: Vec<&'static str>,
}

/// Body of `sendMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    pub parse_mode: &'static str,
}
