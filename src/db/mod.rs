//! State store: a string key-value port and the accessors built on it.
//!
//! Keys:
//! - `risk_percentage:<user_id>` -> decimal string
//! - `current_state:<chat_id>`   -> JSON `{"state": .., "data": ..}`
//!
//! A missing key is never an error.

mod conversations;
mod memory;
mod risk_profiles;
mod sqlite;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::StoreError;

pub use conversations::Conversations;
pub use memory::MemoryStore;
pub use risk_profiles::RiskProfiles;
pub use sqlite::SqliteStore;

/// Minimal key-value operations the bot needs. No expiry.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Open the store named by `url`.
///
/// `memory:` selects a process-local store; anything else is a SQLite URL.
pub async fn open(url: &str) -> Result<Arc<dyn StateStore>> {
    if url == "memory:" {
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(SqliteStore::new(url).await?))
}
