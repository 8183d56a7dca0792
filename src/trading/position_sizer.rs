//! Position sizing from deposit, risk percentage and a signal's stop distance.

use rust_decimal::Decimal;

use crate::error::SizingError;
use crate::models::TradeOffer;

/// Result of sizing one trade offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionSize {
    /// Funds to commit so that hitting the stop loses the whole deposit share
    pub position_volume: Decimal,

    /// Token count at the top of the entry range, scaled by the risk percentage
    pub min_token_volume: Decimal,

    /// Token count at the bottom of the entry range, scaled by the risk percentage
    pub max_token_volume: Decimal,

    /// Multiplier applied to the token counts
    pub risk_percentage: Decimal,
}

/// Size a position for `offer`.
///
/// position = deposit / stop%
/// tokens   = position / entry price, scaled by the risk percentage
///
/// The risk percentage multiplies the full-risk token count as is
/// (2.0 doubles it), it is not converted from percent.
pub fn size_position(
    deposit: Decimal,
    risk_percentage: Decimal,
    offer: &TradeOffer,
) -> Result<PositionSize, SizingError> {
    let position_volume = divide(deposit, offer.stop_percentage, "stop percentage")?;
    let min_tokens = divide(position_volume, offer.max_range_price, "max range price")?;
    let max_tokens = divide(position_volume, offer.min_range_price, "min range price")?;

    Ok(PositionSize {
        position_volume,
        min_token_volume: scale(min_tokens, risk_percentage)?,
        max_token_volume: scale(max_tokens, risk_percentage)?,
        risk_percentage,
    })
}

fn divide(
    numerator: Decimal,
    divisor: Decimal,
    field: &'static str,
) -> Result<Decimal, SizingError> {
    if divisor.is_zero() {
        return Err(SizingError::ZeroDivisor(field));
    }
    numerator.checked_div(divisor).ok_or(SizingError::Overflow)
}

fn scale(tokens: Decimal, risk_percentage: Decimal) -> Result<Decimal, SizingError> {
    tokens
        .checked_mul(risk_percentage)
        .ok_or(SizingError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_offer(min: Decimal, max: Decimal, stop_pct: Decimal) -> TradeOffer {
        TradeOffer {
            crypto_code: "ABC".to_string(),
            direction: None,
            min_range_price: min,
            max_range_price: max,
            stop_price: dec!(150),
            stop_percentage: stop_pct,
        }
    }

    #[test]
    fn test_reference_sizing() {
        let offer = make_offer(dec!(100), dec!(200), dec!(25));
        let size = size_position(dec!(1000), dec!(2.0), &offer).unwrap();

        assert_eq!(size.position_volume, dec!(40));
        assert_eq!(size.min_token_volume, dec!(0.4)); // (40 / 200) * 2
        assert_eq!(size.max_token_volume, dec!(0.8)); // (40 / 100) * 2
    }

    #[test]
    fn test_zero_risk_gives_zero_tokens() {
        let offer = make_offer(dec!(100), dec!(200), dec!(25));
        let size = size_position(dec!(1000), Decimal::ZERO, &offer).unwrap();

        assert_eq!(size.position_volume, dec!(40));
        assert_eq!(size.min_token_volume, Decimal::ZERO);
        assert_eq!(size.max_token_volume, Decimal::ZERO);
    }

    #[test]
    fn test_zero_divisors_are_rejected() {
        let no_stop = make_offer(dec!(100), dec!(200), Decimal::ZERO);
        assert_eq!(
            size_position(dec!(1000), dec!(1), &no_stop),
            Err(SizingError::ZeroDivisor("stop percentage"))
        );

        let no_max = make_offer(dec!(100), Decimal::ZERO, dec!(25));
        assert_eq!(
            size_position(dec!(1000), dec!(1), &no_max),
            Err(SizingError::ZeroDivisor("max range price"))
        );

        let no_min = make_offer(Decimal::ZERO, dec!(200), dec!(25));
        assert_eq!(
            size_position(dec!(1000), dec!(1), &no_min),
            Err(SizingError::ZeroDivisor("min range price"))
        );
    }

    #[test]
    fn test_overflowing_inputs_are_errors() {
        // position fits, the risk multiplier does not
        let offer = make_offer(dec!(1), dec!(2), dec!(1));
        assert_eq!(
            size_position(dec!(10000000000000000000000000000), dec!(1000000), &offer),
            Err(SizingError::Overflow)
        );

        // deposit / stop% exceeds the decimal range
        let tight_stop = make_offer(dec!(1), dec!(2), dec!(0.01));
        assert_eq!(
            size_position(dec!(70000000000000000000000000000), dec!(1), &tight_stop),
            Err(SizingError::Overflow)
        );
    }
}
