//! Inbound chat message as seen by the orchestrator.

use chrono::{DateTime, Utc};

/// Bot commands the orchestrator reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    NewRiskPercent,
    Other(String),
}

impl Command {
    pub fn from_name(name: &str) -> Self {
        match name {
            "start" => Self::Start,
            "newriskpercent" => Self::NewRiskPercent,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One text message from a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub user_id: i64,
    /// Message text; empty for messages without text
    pub text: String,
    /// Set when the message starts with a bot command
    pub command: Option<Command>,
    pub sent_at: DateTime<Utc>,
}

#[cfg(test)]
impl IncomingMessage {
    /// A plain text message sent now.
    pub fn text(chat_id: i64, user_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            user_id,
            text: text.into(),
            command: None,
            sent_at: Utc::now(),
        }
    }

    /// A command message sent now.
    pub fn command(chat_id: i64, user_id: i64, name: &str) -> Self {
        Self {
            chat_id,
            user_id,
            text: format!("/{}", name),
            command: Some(Command::from_name(name)),
            sent_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names() {
        assert_eq!(Command::from_name("start"), Command::Start);
        assert_eq!(Command::from_name("newriskpercent"), Command::NewRiskPercent);
        assert_eq!(Command::from_name("help"), Command::Other("help".to_string()));
    }
}
