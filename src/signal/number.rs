//! Lenient number parsing for user-typed amounts.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Normalize free text into a dot-decimal string.
///
/// Commas become dots, then every character that is not a digit or a dot is dropped.
pub fn normalize_number(text: &str) -> String {
    text.chars()
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Parse a user-entered number such as `"1 234,5%"` or `"$1000"`.
///
/// Returns `None` when nothing numeric remains after normalization.
pub fn parse_number(text: &str) -> Option<Decimal> {
    let cleaned = normalize_number(text);
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Like [`parse_number`], but only accepts values greater than zero.
pub fn parse_positive(text: &str) -> Option<Decimal> {
    parse_number(text).filter(|value| *value > Decimal::ZERO)
}
