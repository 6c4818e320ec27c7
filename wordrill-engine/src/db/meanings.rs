//! Meaning database operations

use crate::store::MeaningRegistry;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;
use wordrill_common::db::Meaning;
use wordrill_common::{Error, Result};

/// SQLite-backed meaning registry
///
/// Uniqueness of `meanings.text` is enforced by the table constraint.
#[derive(Clone)]
pub struct SqliteMeaningRegistry {
    pool: SqlitePool,
}

impl SqliteMeaningRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MeaningRegistry for SqliteMeaningRegistry {
    async fn find_by_text(&self, text: &str) -> Result<Option<Meaning>> {
        let row = sqlx::query("SELECT guid, text FROM meanings WHERE text = ?")
            .bind(text)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let guid_str: String = row.try_get("guid")?;
                Ok(Some(Meaning {
                    guid: parse_guid(&guid_str)?,
                    text: row.try_get("text")?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn get_or_create(&self, text: &str) -> Result<Meaning> {
        if let Some(existing) = self.find_by_text(text).await? {
            return Ok(existing);
        }

        self.insert_or_lookup(Meaning::new(text.to_string())).await
    }
}

impl SqliteMeaningRegistry {
    /// Insert `meaning`, or return the stored row when its text already exists
    async fn insert_or_lookup(&self, meaning: Meaning) -> Result<Meaning> {
        let inserted = sqlx::query("INSERT INTO meanings (guid, text) VALUES (?, ?)")
            .bind(meaning.guid.to_string())
            .bind(&meaning.text)
            .execute(&self.pool)
            .await
            .map_err(Error::from);

        match inserted {
            Ok(_) => {
                debug!(meaning = %meaning.text, guid = %meaning.guid, "Created meaning");
                Ok(meaning)
            }
            // Another request created the same text between lookup and insert
            Err(err) if err.is_unique_violation() => {
                warn!(meaning = %meaning.text, "Meaning created concurrently, using existing record");
                self.find_by_text(&meaning.text).await?.ok_or_else(|| {
                    Error::Internal(format!(
                        "meaning '{}' vanished after unique violation",
                        meaning.text
                    ))
                })
            }
            Err(err) => Err(err),
        }
    }
}

pub(crate) fn parse_guid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| Error::Internal(format!("corrupt guid '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordrill_common::db::init_memory_database;

    async fn registry() -> SqliteMeaningRegistry {
        let pool = init_memory_database()
            .await
            .expect("Failed to create in-memory database");
        SqliteMeaningRegistry::new(pool)
    }

    async fn meaning_rows(registry: &SqliteMeaningRegistry, text: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM meanings WHERE text = ?")
            .bind(text)
            .fetch_one(&registry.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_or_create_creates_on_first_use() {
        let registry = registry().await;

        assert!(registry.find_by_text("to run").await.unwrap().is_none());

        let meaning = registry.get_or_create("to run").await.unwrap();
        assert_eq!(meaning.text, "to run");

        let found = registry.find_by_text("to run").await.unwrap().expect("meaning stored");
        assert_eq!(found, meaning);
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let registry = registry().await;

        let first = registry.get_or_create("bright").await.unwrap();
        let second = registry.get_or_create("bright").await.unwrap();

        assert_eq!(first.guid, second.guid);
        assert_eq!(meaning_rows(&registry, "bright").await, 1);
    }

    #[tokio::test]
    async fn test_lookup_is_exact_match() {
        let registry = registry().await;
        registry.get_or_create("Bank").await.unwrap();

        assert!(registry.find_by_text("bank").await.unwrap().is_none());
        assert!(registry.find_by_text("Bank ").await.unwrap().is_none());

        let lower = registry.get_or_create("bank").await.unwrap();
        assert_eq!(lower.text, "bank");
    }

    #[tokio::test]
    async fn test_insert_conflict_returns_stored_row() {
        let registry = registry().await;
        let winner = registry.get_or_create("shore").await.unwrap();

        // Lookup already missed; a second record for the same text arrives
        let late = Meaning::new("shore".to_string());
        assert_ne!(late.guid, winner.guid);

        let resolved = registry.insert_or_lookup(late).await.unwrap();

        assert_eq!(resolved.guid, winner.guid);
        assert_eq!(resolved.text, "shore");
        assert_eq!(meaning_rows(&registry, "shore").await, 1);
    }

    #[tokio::test]
    async fn test_insert_or_lookup_stores_new_text() {
        let registry = registry().await;
        let fresh = Meaning::new("harbor".to_string());

        let stored = registry.insert_or_lookup(fresh.clone()).await.unwrap();

        assert_eq!(stored, fresh);
        assert_eq!(meaning_rows(&registry, "harbor").await, 1);
    }
}
