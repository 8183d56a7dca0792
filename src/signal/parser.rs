//! Extraction of trade offers from channel signal messages.
//!
//! The channel posts signals in one fixed template:
//!
//! ```text
//! #BTCUSDT Лонг
//! Диапазон входа: 61000-62500
//! Стоп: 59800 (-3.2%)
//! ```
//!
//! Each field is found with its own unanchored first-match scan, so the
//! parser is only as reliable as the template is stable.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ParseError;
use crate::models::{Direction, TradeOffer};

const QUOTE_CURRENCY: &str = "USDT";

static SIGNAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"USDT.*?(Лонг|Шорт)").unwrap());
static INSTRUMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z0-9_]+)USDT").unwrap());
static RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Диапазон.*?([0-9]+(?:\.[0-9]+)?).*?-.*?([0-9]+(?:\.[0-9]+)?)").unwrap()
});
static STOP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Стоп.*?([0-9]+\.?[0-9]*).*?\(-([0-9]+\.?[0-9]*).*?\)").unwrap()
});

/// Whether the text looks like a trade signal at all.
pub fn is_signal(text: &str) -> bool {
    SIGNAL_REGEX.is_match(text)
}

/// Extract a [`TradeOffer`] from a signal message.
pub fn parse_signal(text: &str) -> Result<TradeOffer, ParseError> {
    let direction = parse_direction(text)?;
    let crypto_code = parse_instrument(text)?;
    let (min_range_price, max_range_price) = parse_range(text)?;
    let (stop_price, stop_percentage) = parse_stop(text)?;

    Ok(TradeOffer {
        crypto_code,
        direction: Some(direction),
        min_range_price,
        max_range_price,
        stop_price,
        stop_percentage,
    })
}

fn parse_direction(text: &str) -> Result<Direction, ParseError> {
    let caps = SIGNAL_REGEX.captures(text).ok_or(ParseError::NotASignal)?;
    match &caps[1] {
        "Лонг" => Ok(Direction::Long),
        _ => Ok(Direction::Short),
    }
}

fn parse_instrument(text: &str) -> Result<String, ParseError> {
    INSTRUMENT_REGEX
        .captures(text)
        .map(|caps| caps[1].replace(QUOTE_CURRENCY, ""))
        .filter(|code| !code.is_empty())
        .ok_or(ParseError::MissingInstrument)
}

fn parse_range(text: &str) -> Result<(Decimal, Decimal), ParseError> {
    let caps = RANGE_REGEX.captures(text).ok_or(ParseError::MissingRange)?;
    let min = parse_decimal(&caps[1])?;
    let max = parse_decimal(&caps[2])?;

    if min > max {
        return Err(ParseError::InvertedRange { min, max });
    }

    Ok((min, max))
}

fn parse_stop(text: &str) -> Result<(Decimal, Decimal), ParseError> {
    let caps = STOP_REGEX.captures(text).ok_or(ParseError::MissingStop)?;
    Ok((parse_decimal(&caps[1])?, parse_decimal(&caps[2])?))
}

fn parse_decimal(raw: &str) -> Result<Decimal, ParseError> {
    Decimal::from_str(raw).map_err(|_| ParseError::InvalidNumber(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "🔥 #ABCUSDT Лонг\n\
        Диапазон входа: 100-200\n\
        Цель: 250\n\
        Стоп: 150.0 (-25.0%)";

    #[test]
    fn test_eligibility() {
        assert!(is_signal(SAMPLE));
        assert!(is_signal("ETHUSDT Шорт"));
        assert!(!is_signal("Лонг ETHUSDT"));
        assert!(!is_signal("1000"));
        // direction must be on the same line as the pair
        assert!(!is_signal("ETHUSDT\nЛонг"));
    }

    #[test]
    fn test_parse_sample() {
        let offer = parse_signal(SAMPLE).unwrap();

        assert_eq!(offer.crypto_code, "ABC");
        assert_eq!(offer.direction, Some(Direction::Long));
        assert_eq!(offer.min_range_price, dec!(100));
        assert_eq!(offer.max_range_price, dec!(200));
        assert_eq!(offer.stop_price, dec!(150.0));
        assert_eq!(offer.stop_percentage, dec!(25.0));
    }

    #[test]
    fn test_parse_short_with_fractional_range() {
        let text = "#1000PEPEUSDT Шорт\nДиапазон: 0.0125 - 0.0131\nСтоп: 0.0139 (-6.1%)";
        let offer = parse_signal(text).unwrap();

        assert_eq!(offer.crypto_code, "1000PEPE");
        assert_eq!(offer.direction, Some(Direction::Short));
        assert_eq!(offer.min_range_price, dec!(0.0125));
        assert_eq!(offer.max_range_price, dec!(0.0131));
        assert_eq!(offer.stop_price, dec!(0.0139));
        assert_eq!(offer.stop_percentage, dec!(6.1));
    }

    #[test]
    fn test_first_match_wins() {
        let text = "BTCUSDT Лонг, хедж ETHUSDT\nДиапазон 10-20 Диапазон 30-40\nСтоп 5 (-50%)";
        let offer = parse_signal(text).unwrap();

        assert_eq!(offer.crypto_code, "BTC");
        assert_eq!(offer.min_range_price, dec!(10));
        assert_eq!(offer.max_range_price, dec!(20));
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(parse_signal("просто текст"), Err(ParseError::NotASignal));
        assert_eq!(
            parse_signal("USDT Лонг\nДиапазон 1-2\nСтоп 1 (-1%)"),
            Err(ParseError::MissingInstrument)
        );
        assert_eq!(
            parse_signal("ABCUSDT Лонг\nСтоп 1 (-1%)"),
            Err(ParseError::MissingRange)
        );
        assert_eq!(
            parse_signal("ABCUSDT Лонг\nДиапазон 1-2\nСтоп 1"),
            Err(ParseError::MissingStop)
        );
    }

    #[test]
    fn test_inverted_range() {
        let text = "ABCUSDT Лонг\nДиапазон 200-100\nСтоп 150 (-25%)";
        assert_eq!(
            parse_signal(text),
            Err(ParseError::InvertedRange {
                min: dec!(200),
                max: dec!(100)
            })
        );
    }
}
