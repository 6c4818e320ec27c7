//! Test doubles for the engine services

use crate::db::{SqliteMeaningRegistry, SqliteWordCatalog};
use crate::store::{MeaningRegistry, WordCatalog};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;
use wordrill_common::db::{init_memory_database, PartOfSpeech, Word};
use wordrill_common::Result;

/// Real SQLite catalog that counts write calls
pub struct CountingCatalog {
    inner: SqliteWordCatalog,
    pub creates: AtomicUsize,
    pub saves: AtomicUsize,
    pub accuracy_saves: AtomicUsize,
    pub bulk_updates: AtomicUsize,
}

impl CountingCatalog {
    pub fn writes(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
            + self.saves.load(Ordering::SeqCst)
            + self.accuracy_saves.load(Ordering::SeqCst)
            + self.bulk_updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WordCatalog for CountingCatalog {
    async fn find_by_text_and_part_of_speech(
        &self,
        text: &str,
        part_of_speech: PartOfSpeech,
    ) -> Result<Option<Word>> {
        self.inner.find_by_text_and_part_of_speech(text, part_of_speech).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Word>> {
        self.inner.find_by_id(id).await
    }

    async fn create(&self, word: Word) -> Result<Word> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(word).await
    }

    async fn save(&self, word: &Word) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(word).await
    }

    async fn save_accuracy_and_score(&self, word: &Word) -> Result<()> {
        self.accuracy_saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save_accuracy_and_score(word).await
    }

    async fn list_all(&self) -> Result<Vec<Word>> {
        self.inner.list_all().await
    }

    async fn bulk_update_scores(&self, words: &[Word], batch_size: usize) -> Result<()> {
        self.bulk_updates.fetch_add(1, Ordering::SeqCst);
        self.inner.bulk_update_scores(words, batch_size).await
    }

    async fn archive(&self, id: Uuid) -> Result<()> {
        self.inner.archive(id).await
    }

    async fn restore(&self, id: Uuid) -> Result<()> {
        self.inner.restore(id).await
    }

    async fn purge(&self, id: Uuid) -> Result<()> {
        self.inner.purge(id).await
    }
}

/// In-memory store shared by a test's services
pub struct TestStore {
    pub pool: SqlitePool,
    pub catalog: Arc<CountingCatalog>,
    pub meanings: Arc<SqliteMeaningRegistry>,
}

impl TestStore {
    pub async fn new() -> Self {
        let pool = init_memory_database()
            .await
            .expect("Failed to create in-memory database");
        Self {
            catalog: Arc::new(CountingCatalog {
                inner: SqliteWordCatalog::new(pool.clone()),
                creates: AtomicUsize::new(0),
                saves: AtomicUsize::new(0),
                accuracy_saves: AtomicUsize::new(0),
                bulk_updates: AtomicUsize::new(0),
            }),
            meanings: Arc::new(SqliteMeaningRegistry::new(pool.clone())),
            pool,
        }
    }

    /// Insert a word directly, bypassing the merge engine
    pub async fn seed(&self, text: &str, score: f64, meanings: &[&str]) -> Word {
        let mut resolved = Vec::new();
        for meaning in meanings {
            resolved.push(self.meanings.get_or_create(meaning).await.unwrap());
        }
        let mut word = Word::new(text.to_string(), String::new(), PartOfSpeech::Noun, resolved);
        word.score = score;
        self.catalog.inner.create(word).await.unwrap()
    }

    pub async fn reload(&self, id: Uuid) -> Word {
        self.catalog
            .find_by_id(id)
            .await
            .unwrap()
            .expect("word should exist")
    }

    pub async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar(sql).fetch_one(&self.pool).await.unwrap()
    }
}
