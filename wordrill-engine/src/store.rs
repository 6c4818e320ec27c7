//! Storage interfaces consumed by the engine services
//!
//! The services only see these traits; [`crate::db`] provides the SQLite
//! implementations.

use async_trait::async_trait;
use uuid::Uuid;
use wordrill_common::db::{Meaning, PartOfSpeech, Word};
use wordrill_common::Result;

/// Canonical, deduplicated meaning records
#[async_trait]
pub trait MeaningRegistry: Send + Sync {
    /// Exact-text lookup
    async fn find_by_text(&self, text: &str) -> Result<Option<Meaning>>;

    /// Return the meaning with this text, creating it on first use
    ///
    /// Concurrent callers with the same new text all receive the same record.
    async fn get_or_create(&self, text: &str) -> Result<Meaning>;
}

/// Word entities, their meaning associations and accuracy records
///
/// Every lookup sees active words only.
#[async_trait]
pub trait WordCatalog: Send + Sync {
    async fn find_by_text_and_part_of_speech(
        &self,
        text: &str,
        part_of_speech: PartOfSpeech,
    ) -> Result<Option<Word>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Word>>;

    /// Insert a word with its meanings and a zeroed accuracy record
    async fn create(&self, word: Word) -> Result<Word>;

    /// Overwrite category, score, part of speech and meaning associations
    async fn save(&self, word: &Word) -> Result<()>;

    /// Overwrite accuracy counters and score only
    async fn save_accuracy_and_score(&self, word: &Word) -> Result<()>;

    /// All active words in creation order, meanings and accuracy populated
    async fn list_all(&self) -> Result<Vec<Word>>;

    /// Write new scores in chunks of `batch_size`
    ///
    /// Each chunk commits on its own. On failure earlier chunks stay
    /// committed, later chunks are not attempted and the first error is
    /// returned.
    async fn bulk_update_scores(&self, words: &[Word], batch_size: usize) -> Result<()>;

    /// Soft delete
    async fn archive(&self, id: Uuid) -> Result<()>;

    /// Undo a soft delete
    async fn restore(&self, id: Uuid) -> Result<()>;

    /// Physically remove a word in any state, with its associations and accuracy
    async fn purge(&self, id: Uuid) -> Result<()>;
}
