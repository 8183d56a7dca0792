//! Telegram Bot API client: long polling for updates and sending replies.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::types::*;
use super::Gateway;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for one bot token.
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    /// Create a client against `base_url`, normally [`TELEGRAM_API_BASE`]
    /// or a local Bot API server.
    pub fn with_base_url(base_url: String, token: &str, poll_timeout: Duration) -> Result<Self> {
        // long polls hold the request open for up to poll_timeout
        let client = Client::builder()
            .timeout(poll_timeout + REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            poll_timeout,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // the URL embeds the token, never log it
        debug!(method = %method, "Calling Bot API");

        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to call {}", method))?;

        let status = response.status();
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response ({})", method, status))?;

        if !envelope.ok {
            anyhow::bail!(
                "{} failed: {} - {}",
                method,
                envelope.error_code.unwrap_or_else(|| i64::from(status.as_u16())),
                envelope.description.unwrap_or_default()
            );
        }

        envelope
            .result
            .with_context(|| format!("{} returned no result", method))
    }

    /// Check the token and fetch the bot's own account.
    pub async fn get_me(&self) -> Result<BotUser> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: vec!["message"],
        };
        self.call("getUpdates", &request).await
    }
}

#[async_trait]
impl Gateway for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: "Markdown",
        };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }
}
