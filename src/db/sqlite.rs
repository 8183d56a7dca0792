//! SQLite-backed key-value table.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::debug;

use super::StateStore;
use crate::error::StoreError;

/// Key-value store in a single SQLite table.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect and create the table if needed.
    pub async fn new(database_url: &str) -> Result<Self> {
        // every connection to an in-memory database gets its own database
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.run_migrations().await?;

        debug!(url = %database_url, "State store ready");
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create kv_store table")?;

        Ok(())
    }
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_set_delete() {
        let store = SqliteStore::new("sqlite::memory:").await.unwrap();

        assert_eq!(store.get("risk_percentage:1").await.unwrap(), None);

        store.set("risk_percentage:1", "1.5").await.unwrap();
        assert_eq!(
            store.get("risk_percentage:1").await.unwrap().as_deref(),
            Some("1.5")
        );

        store.set("risk_percentage:1", "2").await.unwrap();
        assert_eq!(
            store.get("risk_percentage:1").await.unwrap().as_deref(),
            Some("2")
        );

        store.delete("risk_percentage:1").await.unwrap();
        assert_eq!(store.get("risk_percentage:1").await.unwrap(), None);

        // deleting a missing key is fine
        store.delete("risk_percentage:1").await.unwrap();
    }
}
