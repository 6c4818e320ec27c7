//! Quiz outcome scoring
//!
//! A correct answer resets the word to the baseline score. A wrong answer
//! adds `1 + wrong` (the updated wrong count), so repeated misses compound.

use crate::store::WordCatalog;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use wordrill_common::db::Word;
use wordrill_common::{Error, Result};

/// Learner's answer for a presented word
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRequest {
    pub word_id: String,
    pub correct: bool,
}

pub struct AccuracyUpdater {
    words: Arc<dyn WordCatalog>,
}

impl AccuracyUpdater {
    pub fn new(words: Arc<dyn WordCatalog>) -> Self {
        Self { words }
    }

    /// Record an outcome and persist the new counters and score
    pub async fn apply_outcome(&self, word_id: &str, correct: bool) -> Result<Word> {
        let id = parse_word_id(word_id)?;

        let mut word = self
            .words
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("word {}", id)))?;

        apply_to(&mut word, correct);
        self.words.save_accuracy_and_score(&word).await?;

        debug!(
            word = %word.text,
            correct,
            score = word.score,
            total = word.accuracy.total,
            "Applied quiz outcome"
        );
        Ok(word)
    }
}

/// Update counters and score in place
pub fn apply_to(word: &mut Word, correct: bool) {
    if correct {
        word.accuracy.record_correct();
        word.score = Word::BASELINE_SCORE;
    } else {
        word.accuracy.record_wrong();
        word.score += 1.0 + f64::from(word.accuracy.wrong);
    }
}

/// Parse a client-supplied word ID
pub fn parse_word_id(word_id: &str) -> Result<Uuid> {
    let trimmed = word_id.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("word id is required".to_string()));
    }
    Uuid::parse_str(trimmed)
        .map_err(|_| Error::InvalidInput(format!("invalid word id: {}", word_id)))
}
