//! Word database operations
//!
//! Words live in `words`, their meanings in the `word_meanings` link table
//! (ordered by `position`) and their counters in `word_accuracy`. Every
//! multi-table write runs in one transaction.

use super::meanings::parse_guid;
use crate::store::WordCatalog;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;
use wordrill_common::db::{AccuracyRecord, Meaning, PartOfSpeech, Word, WordStatus};
use wordrill_common::{Error, Result};

const WORD_COLUMNS: &str = r#"
    w.guid, w.text, w.category, w.part_of_speech, w.score, w.status,
    COALESCE(a.total, 0) AS total,
    COALESCE(a.correct, 0) AS correct,
    COALESCE(a.wrong, 0) AS wrong
"#;

/// SQLite-backed word catalog
#[derive(Clone)]
pub struct SqliteWordCatalog {
    pool: SqlitePool,
}

impl SqliteWordCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load one active word matching `condition` (bound with `params`)
    async fn find_one(&self, condition: &str, params: &[&str]) -> Result<Option<Word>> {
        let sql = format!(
            "SELECT {} FROM words w LEFT JOIN word_accuracy a ON a.word_id = w.guid \
             WHERE w.status = 'active' AND {}",
            WORD_COLUMNS, condition
        );
        let mut query = sqlx::query(&sql);
        for param in params {
            query = query.bind(*param);
        }

        let row = query.fetch_optional(&self.pool).await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut word = word_from_row(&row)?;
        word.meanings = self.load_meanings(word.guid).await?;
        Ok(Some(word))
    }

    async fn load_meanings(&self, word_id: Uuid) -> Result<Vec<Meaning>> {
        let rows = sqlx::query(
            r#"
            SELECT m.guid, m.text
            FROM word_meanings wm
            JOIN meanings m ON m.guid = wm.meaning_id
            WHERE wm.word_id = ?
            ORDER BY wm.position
            "#,
        )
        .bind(word_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(meaning_from_row).collect()
    }
}

fn word_from_row(row: &SqliteRow) -> Result<Word> {
    let guid_str: String = row.try_get("guid")?;
    let pos_str: String = row.try_get("part_of_speech")?;
    let status_str: String = row.try_get("status")?;

    let part_of_speech = pos_str.parse::<PartOfSpeech>().map_err(|e| {
        Error::Internal(format!("corrupt part_of_speech for word {}: {}", guid_str, e))
    })?;

    Ok(Word {
        guid: parse_guid(&guid_str)?,
        text: row.try_get("text")?,
        category: row.try_get("category")?,
        part_of_speech,
        score: row.try_get("score")?,
        status: status_str.parse::<WordStatus>()?,
        meanings: Vec::new(),
        accuracy: AccuracyRecord {
            total: row.try_get("total")?,
            correct: row.try_get("correct")?,
            wrong: row.try_get("wrong")?,
        },
    })
}

fn meaning_from_row(row: &SqliteRow) -> Result<Meaning> {
    let guid_str: String = row.try_get("guid")?;
    Ok(Meaning {
        guid: parse_guid(&guid_str)?,
        text: row.try_get("text")?,
    })
}

/// Replace a word's link rows with its current meanings, in order
async fn write_meaning_links(tx: &mut Transaction<'_, Sqlite>, word: &Word) -> Result<()> {
    sqlx::query("DELETE FROM word_meanings WHERE word_id = ?")
        .bind(word.guid.to_string())
        .execute(&mut **tx)
        .await?;

    for (position, meaning) in word.meanings.iter().enumerate() {
        sqlx::query("INSERT INTO word_meanings (word_id, meaning_id, position) VALUES (?, ?, ?)")
            .bind(word.guid.to_string())
            .bind(meaning.guid.to_string())
            .bind(position as i64)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

#[async_trait]
impl WordCatalog for SqliteWordCatalog {
    async fn find_by_text_and_part_of_speech(
        &self,
        text: &str,
        part_of_speech: PartOfSpeech,
    ) -> Result<Option<Word>> {
        self.find_one("w.text = ? AND w.part_of_speech = ?", &[text, part_of_speech.as_str()])
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Word>> {
        let id = id.to_string();
        self.find_one("w.guid = ?", &[&id]).await
    }

    async fn create(&self, word: Word) -> Result<Word> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO words (guid, text, category, part_of_speech, score, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(word.guid.to_string())
        .bind(&word.text)
        .bind(&word.category)
        .bind(word.part_of_speech.as_str())
        .bind(word.score)
        .bind(word.status.as_str())
        .execute(&mut *tx)
        .await?;

        write_meaning_links(&mut tx, &word).await?;

        sqlx::query("INSERT INTO word_accuracy (word_id, total, correct, wrong) VALUES (?, ?, ?, ?)")
            .bind(word.guid.to_string())
            .bind(word.accuracy.total)
            .bind(word.accuracy.correct)
            .bind(word.accuracy.wrong)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Created word '{}' ({}) with {} meaning(s)",
            word.text,
            word.part_of_speech,
            word.meanings.len()
        );
        Ok(word)
    }

    async fn save(&self, word: &Word) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE words
            SET category = ?, part_of_speech = ?, score = ?, updated_at = CURRENT_TIMESTAMP
            WHERE guid = ? AND status = 'active'
            "#,
        )
        .bind(&word.category)
        .bind(word.part_of_speech.as_str())
        .bind(word.score)
        .bind(word.guid.to_string())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(Error::NotFound(format!("word {}", word.guid)));
        }

        write_meaning_links(&mut tx, word).await?;

        tx.commit().await?;

        debug!(guid = %word.guid, meanings = word.meanings.len(), "Saved word");
        Ok(())
    }

    async fn save_accuracy_and_score(&self, word: &Word) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE words SET score = ?, updated_at = CURRENT_TIMESTAMP WHERE guid = ? AND status = 'active'",
        )
        .bind(word.score)
        .bind(word.guid.to_string())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(Error::NotFound(format!("word {}", word.guid)));
        }

        sqlx::query(
            r#"
            INSERT INTO word_accuracy (word_id, total, correct, wrong)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(word_id) DO UPDATE SET
                total = excluded.total,
                correct = excluded.correct,
                wrong = excluded.wrong
            "#,
        )
        .bind(word.guid.to_string())
        .bind(word.accuracy.total)
        .bind(word.accuracy.correct)
        .bind(word.accuracy.wrong)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Word>> {
        let sql = format!(
            "SELECT {} FROM words w LEFT JOIN word_accuracy a ON a.word_id = w.guid \
             WHERE w.status = 'active' ORDER BY w.rowid",
            WORD_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let mut words = rows.iter().map(word_from_row).collect::<Result<Vec<_>>>()?;

        let link_rows = sqlx::query(
            r#"
            SELECT wm.word_id, m.guid, m.text
            FROM word_meanings wm
            JOIN meanings m ON m.guid = wm.meaning_id
            JOIN words w ON w.guid = wm.word_id
            WHERE w.status = 'active'
            ORDER BY wm.word_id, wm.position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut meanings_by_word: HashMap<String, Vec<Meaning>> = HashMap::new();
        for row in &link_rows {
            let word_id: String = row.try_get("word_id")?;
            meanings_by_word
                .entry(word_id)
                .or_default()
                .push(meaning_from_row(row)?);
        }

        for word in &mut words {
            if let Some(meanings) = meanings_by_word.remove(&word.guid.to_string()) {
                word.meanings = meanings;
            }
        }

        Ok(words)
    }

    async fn bulk_update_scores(&self, words: &[Word], batch_size: usize) -> Result<()> {
        if batch_size == 0 {
            return Err(Error::InvalidInput("batch size must be greater than zero".to_string()));
        }

        let mut committed = 0usize;
        for (chunk_index, chunk) in words.chunks(batch_size).enumerate() {
            if let Err(err) = update_score_chunk(&self.pool, chunk).await {
                warn!(
                    chunk = chunk_index,
                    committed,
                    remaining = words.len() - committed,
                    "Bulk score update stopped, earlier chunks remain committed: {}",
                    err
                );
                return Err(err);
            }
            committed += chunk.len();
        }

        debug!(words = committed, batch_size, "Bulk score update complete");
        Ok(())
    }

    async fn archive(&self, id: Uuid) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE words SET status = 'archived', updated_at = CURRENT_TIMESTAMP WHERE guid = ? AND status = 'active'",
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(Error::NotFound(format!("word {}", id)));
        }

        info!("Archived word {}", id);
        Ok(())
    }

    async fn restore(&self, id: Uuid) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE words SET status = 'active', updated_at = CURRENT_TIMESTAMP WHERE guid = ? AND status = 'archived'",
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(Error::from);

        match updated {
            Ok(result) if result.rows_affected() == 0 => {
                Err(Error::NotFound(format!("archived word {}", id)))
            }
            Ok(_) => {
                info!("Restored word {}", id);
                Ok(())
            }
            Err(err) if err.is_unique_violation() => Err(Error::Conflict(format!(
                "an active word with the same text and part of speech as {} exists",
                id
            ))),
            Err(err) => Err(err),
        }
    }

    async fn purge(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM word_meanings WHERE word_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM word_accuracy WHERE word_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM words WHERE guid = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Err(Error::NotFound(format!("word {}", id)));
        }

        tx.commit().await?;

        info!("Purged word {}", id);
        Ok(())
    }
}

/// Write one chunk of scores atomically
async fn update_score_chunk(pool: &SqlitePool, chunk: &[Word]) -> Result<()> {
    let mut tx = pool.begin().await?;

    for word in chunk {
        sqlx::query("UPDATE words SET score = ?, updated_at = CURRENT_TIMESTAMP WHERE guid = ?")
            .bind(word.score)
            .bind(word.guid.to_string())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}
