//! Per-user risk percentage.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use super::StateStore;
use crate::error::StoreError;
use crate::models::RiskProfile;

/// Reads and writes `risk_percentage:<user_id>`.
#[derive(Clone)]
pub struct RiskProfiles {
    store: Arc<dyn StateStore>,
}

impl RiskProfiles {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    fn key(user_id: i64) -> String {
        format!("risk_percentage:{}", user_id)
    }

    /// Load a user's profile; a missing key is an unset profile.
    pub async fn get(&self, user_id: i64) -> Result<RiskProfile, StoreError> {
        let key = Self::key(user_id);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(RiskProfile::unset());
        };

        let percentage = Decimal::from_str(raw.trim())
            .or_else(|_| Decimal::from_scientific(raw.trim()))
            .map_err(|_| StoreError::InvalidDecimal { key, value: raw })?;

        Ok(RiskProfile::configured(percentage))
    }

    /// Store a new percentage, replacing any previous one.
    pub async fn set(&self, user_id: i64, percentage: Decimal) -> Result<(), StoreError> {
        self.store
            .set(&Self::key(user_id), &percentage.to_string())
            .await
    }
}
