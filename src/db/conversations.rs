//! Per-chat conversation state.

use std::sync::Arc;

use super::StateStore;
use crate::error::StoreError;
use crate::models::{ConversationState, StateTag};

/// Reads and writes `current_state:<chat_id>`.
#[derive(Clone)]
pub struct Conversations {
    store: Arc<dyn StateStore>,
}

impl Conversations {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    fn key(chat_id: i64) -> String {
        format!("current_state:{}", chat_id)
    }

    /// Load a chat's state; a missing key is the idle state.
    ///
    /// A record that is not a valid `{state, data}` envelope yields
    /// [`StoreError::Decode`].
    pub async fn get(&self, chat_id: i64) -> Result<ConversationState, StoreError> {
        let key = Self::key(chat_id);
        match self.store.get(&key).await? {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|source| StoreError::Decode { key, source })
            }
            None => Ok(ConversationState::idle()),
        }
    }

    /// Move the chat to `state` with `data` as payload.
    ///
    /// Setting `StateTag::None` deletes the record, idle is never stored.
    pub async fn set(
        &self,
        chat_id: i64,
        state: StateTag,
        data: impl Into<String>,
    ) -> Result<(), StoreError> {
        if state == StateTag::None {
            return self.clear(chat_id).await;
        }

        let raw = serde_json::to_string(&ConversationState::new(state, data))?;
        self.store.set(&Self::key(chat_id), &raw).await
    }

    /// Return the chat to idle.
    pub async fn clear(&self, chat_id: i64) -> Result<(), StoreError> {
        self.store.delete(&Self::key(chat_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{Conversation, Direction, TradeOffer};
    use rust_decimal_macros::dec;

    fn setup() -> (Arc<MemoryStore>, Conversations) {
        let store = Arc::new(MemoryStore::new());
        let conversations = Conversations::new(store.clone());
        (store, conversations)
    }

    #[tokio::test]
    async fn test_unknown_chat_is_idle() {
        let (_, conversations) = setup();
        assert!(conversations.get(1).await.unwrap().is_idle());
    }

    #[tokio::test]
    async fn test_offer_survives_store_round_trip() {
        let (store, conversations) = setup();
        let offer = TradeOffer {
            crypto_code: "ABC".to_string(),
            direction: Some(Direction::Long),
            min_range_price: dec!(100),
            max_range_price: dec!(200),
            stop_price: dec!(150.0),
            stop_percentage: dec!(25.0),
        };

        conversations
            .set(5, StateTag::AwaitingDeposit, offer.to_payload().unwrap())
            .await
            .unwrap();

        let raw = store.get("current_state:5").await.unwrap().unwrap();
        assert!(raw.starts_with(r#"{"state":"awaiting_deposit","data":"#));

        let state = conversations.get(5).await.unwrap();
        assert_eq!(state.decode(), Ok(Conversation::AwaitingDeposit(offer)));
    }

    #[tokio::test]
    async fn test_setting_idle_deletes_record() {
        let (store, conversations) = setup();
        conversations
            .set(5, StateTag::AwaitingRiskPercentage, "")
            .await
            .unwrap();
        assert!(store.get("current_state:5").await.unwrap().is_some());

        conversations.set(5, StateTag::None, "").await.unwrap();
        assert_eq!(store.get("current_state:5").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_broken_envelope() {
        let (store, conversations) = setup();
        store.set("current_state:9", "{oops").await.unwrap();

        assert!(matches!(
            conversations.get(9).await,
            Err(StoreError::Decode { .. })
        ));
    }
}
