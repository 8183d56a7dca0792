//! Runtime configuration for the conversation orchestrator and dispatcher.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Language of every user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ru" | "russian" => Ok(Self::Ru),
            "en" | "english" => Ok(Self::En),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

/// Bot behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Support chat username appended to internal error messages
    pub support_username: Option<String>,

    /// Display language
    pub locale: Locale,

    /// Return the chat to idle after a successful calculation.
    /// Off by default: the chat keeps waiting for more deposit amounts.
    pub clear_state_after_calculation: bool,

    /// Process messages of the same chat one at a time, in arrival order
    pub sequential_chats: bool,

    /// How long a per-chat worker waits for the next message before retiring
    pub chat_idle_timeout: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            support_username: None,
            locale: Locale::Ru,
            clear_state_after_calculation: false,
            sequential_chats: true,
            chat_idle_timeout: Duration::from_secs(300),
        }
    }
}
