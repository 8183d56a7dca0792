//! Per-chat conversation state.

use serde::{Deserialize, Serialize};

use super::TradeOffer;

/// Which input the bot is waiting for in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateTag {
    #[default]
    None,
    AwaitingRiskPercentage,
    AwaitingDeposit,
}

impl StateTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateTag::None => "none",
            StateTag::AwaitingRiskPercentage => "awaiting_risk_percentage",
            StateTag::AwaitingDeposit => "awaiting_deposit",
        }
    }
}

/// Stored form of a chat's state: a tag plus an opaque payload.
///
/// The payload only means something relative to its tag. A missing record
/// is the same as `StateTag::None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversationState {
    pub state: StateTag,
    #[serde(default)]
    pub data: String,
}

impl ConversationState {
    pub fn new(state: StateTag, data: impl Into<String>) -> Self {
        Self {
            state,
            data: data.into(),
        }
    }

    pub fn idle() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.state == StateTag::None
    }

    /// Interpret the payload according to the tag.
    ///
    /// Fails when the payload does not fit the tag: a non-empty payload on a
    /// tag that carries none, or an `awaiting_deposit` payload that is not a
    /// trade offer.
    pub fn decode(&self) -> Result<Conversation, String> {
        match self.state {
            StateTag::None | StateTag::AwaitingRiskPercentage if !self.data.is_empty() => Err(
                format!("unexpected payload for state {}", self.state.as_str()),
            ),
            StateTag::None => Ok(Conversation::Idle),
            StateTag::AwaitingRiskPercentage => Ok(Conversation::AwaitingRiskPercentage),
            StateTag::AwaitingDeposit => TradeOffer::from_payload(&self.data)
                .map(Conversation::AwaitingDeposit)
                .map_err(|e| format!("invalid trade offer payload: {}", e)),
        }
    }
}

/// A decoded conversation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversation {
    Idle,
    AwaitingRiskPercentage,
    AwaitingDeposit(TradeOffer),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use rust_decimal_macros::dec;

    fn offer() -> TradeOffer {
        TradeOffer {
            crypto_code: "ABC".to_string(),
            direction: Some(Direction::Long),
            min_range_price: dec!(100),
            max_range_price: dec!(200),
            stop_price: dec!(150.0),
            stop_percentage: dec!(25.0),
        }
    }

    #[test]
    fn test_wire_shape() {
        let state = ConversationState::new(StateTag::AwaitingRiskPercentage, "");
        let raw = serde_json::to_string(&state).unwrap();
        assert_eq!(raw, r#"{"state":"awaiting_risk_percentage","data":""}"#);

        let parsed: ConversationState = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_decode_deposit_state() {
        let offer = offer();
        let state = ConversationState::new(StateTag::AwaitingDeposit, offer.to_payload().unwrap());

        assert_eq!(state.decode(), Ok(Conversation::AwaitingDeposit(offer)));
    }

    #[test]
    fn test_decode_rejects_mismatched_payload() {
        let stale = ConversationState::new(StateTag::AwaitingRiskPercentage, "{}");
        assert!(stale.decode().is_err());

        let broken = ConversationState::new(StateTag::AwaitingDeposit, "not json");
        assert!(broken.decode().is_err());

        let empty = ConversationState::new(StateTag::AwaitingDeposit, "");
        assert!(empty.decode().is_err());
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let raw = r#"{"state":"set_risk_percentage","data":""}"#;
        assert!(serde_json::from_str::<ConversationState>(raw).is_err());
    }

    #[test]
    fn test_idle() {
        assert!(ConversationState::idle().is_idle());
        assert_eq!(ConversationState::idle().decode(), Ok(Conversation::Idle));
    }
}
