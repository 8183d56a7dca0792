//! Per-user risk profile.

use rust_decimal::Decimal;

/// The risk percentage a user configured, if any.
///
/// `1.5` means 1.5%. Unset profiles display as zero but are never confused
/// with a configured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RiskProfile {
    percentage: Option<Decimal>,
}

impl RiskProfile {
    pub fn unset() -> Self {
        Self { percentage: None }
    }

    pub fn configured(percentage: Decimal) -> Self {
        Self {
            percentage: Some(percentage),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.percentage.is_some()
    }

    /// Percentage used for display and sizing; zero when unset.
    pub fn percentage(&self) -> Decimal {
        self.percentage.unwrap_or(Decimal::ZERO)
    }
}
