//! Trade offer extracted from a signal message.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction announced by the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

/// Parameters of one trade signal.
///
/// Lives only between the signal message and the user's deposit reply,
/// serialized into the chat's conversation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    /// Instrument code without the quote currency suffix (e.g. "BTC")
    pub crypto_code: String,

    /// Announced direction; absent in payloads written before it was captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,

    /// Lower bound of the entry range
    pub min_range_price: Decimal,

    /// Upper bound of the entry range
    pub max_range_price: Decimal,

    /// Stop-loss price
    pub stop_price: Decimal,

    /// Loss at the stop, magnitude only (25.0 means -25%)
    pub stop_percentage: Decimal,
}

impl TradeOffer {
    /// Encode for the conversation state payload.
    pub fn to_payload(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode from a conversation state payload.
    pub fn from_payload(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payload_round_trip_keeps_precision() {
        let offer = TradeOffer {
            crypto_code: "ABC".to_string(),
            direction: Some(Direction::Short),
            min_range_price: dec!(0.000123456789),
            max_range_price: dec!(200),
            stop_price: dec!(150.10),
            stop_percentage: dec!(25.05),
        };

        let data = offer.to_payload().unwrap();
        let decoded = TradeOffer::from_payload(&data).unwrap();

        assert_eq!(decoded, offer);
        assert_eq!(decoded.stop_price.to_string(), "150.10");
    }

    #[test]
    fn test_payload_without_direction() {
        let data = r#"{"crypto_code":"ETH","min_range_price":"100","max_range_price":"200","stop_price":"90.5","stop_percentage":"10"}"#;
        let offer = TradeOffer::from_payload(data).unwrap();

        assert_eq!(offer.crypto_code, "ETH");
        assert_eq!(offer.direction, None);
        assert_eq!(offer.stop_price, dec!(90.5));
    }

    #[test]
    fn test_payload_rejects_other_shapes() {
        assert!(TradeOffer::from_payload("").is_err());
        assert!(TradeOffer::from_payload(r#"{"crypto_code":"ETH"}"#).is_err());
    }
}
