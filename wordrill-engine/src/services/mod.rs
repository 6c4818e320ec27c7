//! Engine services
//!
//! [`WordService`] is the single entry point for the front end. It wires the
//! merge engine, selector and accuracy updater to one word catalog and
//! meaning registry.

pub mod accuracy;
pub mod merge;
pub mod selector;

#[cfg(test)]
pub(crate) mod testing;

pub use accuracy::{AccuracyUpdater, OutcomeRequest};
pub use merge::{MergeEngine, SubmitOutcome, WordRequest};
pub use selector::Selector;

use crate::db::{SqliteMeaningRegistry, SqliteWordCatalog};
use crate::store::{MeaningRegistry, WordCatalog};
use rand::RngCore;
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;
use wordrill_common::db::{AccuracyRecord, PartOfSpeech, Word};
use wordrill_common::Result;

/// Read model of a word as shown to the learner
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSummary {
    pub id: Uuid,
    pub text: String,
    pub meanings: Vec<String>,
    pub category: String,
    pub score: f64,
    pub part_of_speech: PartOfSpeech,
    pub accuracy: AccuracyRecord,
}

impl From<&Word> for WordSummary {
    fn from(word: &Word) -> Self {
        Self {
            id: word.guid,
            text: word.text.clone(),
            meanings: word.meaning_texts(),
            category: word.category.clone(),
            score: word.score,
            part_of_speech: word.part_of_speech,
            accuracy: word.accuracy,
        }
    }
}

pub struct WordService {
    catalog: Arc<dyn WordCatalog>,
    merge: MergeEngine,
    selector: Selector,
    accuracy: AccuracyUpdater,
}

impl WordService {
    pub fn new(
        catalog: Arc<dyn WordCatalog>,
        meanings: Arc<dyn MeaningRegistry>,
        rng: impl RngCore + Send + 'static,
        score_batch_size: usize,
    ) -> Self {
        Self {
            merge: MergeEngine::new(catalog.clone(), meanings),
            selector: Selector::new(catalog.clone(), rng, score_batch_size),
            accuracy: AccuracyUpdater::new(catalog.clone()),
            catalog,
        }
    }

    /// Service backed by the SQLite store
    pub fn with_sqlite(
        pool: SqlitePool,
        rng: impl RngCore + Send + 'static,
        score_batch_size: usize,
    ) -> Self {
        Self::new(
            Arc::new(SqliteWordCatalog::new(pool.clone())),
            Arc::new(SqliteMeaningRegistry::new(pool)),
            rng,
            score_batch_size,
        )
    }

    pub async fn list_words(&self) -> Result<Vec<WordSummary>> {
        let words = self.catalog.list_all().await?;
        Ok(words.iter().map(WordSummary::from).collect())
    }

    pub async fn submit_word(&self, request: WordRequest) -> Result<SubmitOutcome> {
        self.merge.submit(request).await
    }

    pub async fn pick_next(&self) -> Result<Option<WordSummary>> {
        let chosen = self.selector.pick_next().await?;
        Ok(chosen.as_ref().map(WordSummary::from))
    }

    pub async fn apply_outcome(&self, request: OutcomeRequest) -> Result<()> {
        self.accuracy
            .apply_outcome(&request.word_id, request.correct)
            .await?;
        Ok(())
    }

    pub async fn archive_word(&self, word_id: &str) -> Result<()> {
        self.catalog.archive(accuracy::parse_word_id(word_id)?).await
    }

    pub async fn restore_word(&self, word_id: &str) -> Result<()> {
        self.catalog.restore(accuracy::parse_word_id(word_id)?).await
    }

    pub async fn purge_word(&self, word_id: &str) -> Result<()> {
        self.catalog.purge(accuracy::parse_word_id(word_id)?).await
    }
}
