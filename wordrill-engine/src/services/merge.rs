//! Merge engine: reconciles submitted vocabulary with the catalog
//!
//! A submission either creates a new word or attaches the meanings the
//! existing (text, part of speech) entry does not have yet. Re-submitting
//! known data never writes.

use crate::store::{MeaningRegistry, WordCatalog};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use wordrill_common::db::{PartOfSpeech, Word};
use wordrill_common::{Error, Result};

/// New vocabulary data from the front end
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRequest {
    pub text: String,
    pub meanings: Vec<String>,
    #[serde(default)]
    pub category: String,
    pub part_of_speech: String,
}

/// What a submission did to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SubmitOutcome {
    /// A new word was stored
    Created { id: Uuid },
    /// `added` unseen meanings were attached to an existing word
    Extended { id: Uuid, added: usize },
    /// Every submitted meaning was already known; nothing written
    Unchanged { id: Uuid },
}

pub struct MergeEngine {
    words: Arc<dyn WordCatalog>,
    meanings: Arc<dyn MeaningRegistry>,
}

impl MergeEngine {
    pub fn new(words: Arc<dyn WordCatalog>, meanings: Arc<dyn MeaningRegistry>) -> Self {
        Self { words, meanings }
    }

    pub async fn submit(&self, request: WordRequest) -> Result<SubmitOutcome> {
        let part_of_speech = validate(&request)?;
        let submitted = distinct_meanings(&request.meanings);

        let existing = self
            .words
            .find_by_text_and_part_of_speech(&request.text, part_of_speech)
            .await?;

        let Some(mut word) = existing else {
            let mut resolved = Vec::with_capacity(submitted.len());
            for text in &submitted {
                resolved.push(self.meanings.get_or_create(text).await?);
            }

            let word = Word::new(request.text, request.category, part_of_speech, resolved);
            let stored = self.words.create(word).await?;
            return Ok(SubmitOutcome::Created { id: stored.guid });
        };

        let mut added = 0;
        for text in submitted {
            if word.has_meaning(text) {
                continue;
            }
            let meaning = self.meanings.get_or_create(text).await?;
            if word.attach_meaning(meaning) {
                added += 1;
            }
        }

        if added == 0 {
            debug!(word = %word.text, pos = %word.part_of_speech, "Submission contained no new meanings");
            return Ok(SubmitOutcome::Unchanged { id: word.guid });
        }

        self.words.save(&word).await?;
        info!(
            "Attached {} new meaning(s) to '{}' ({})",
            added, word.text, word.part_of_speech
        );
        Ok(SubmitOutcome::Extended { id: word.guid, added })
    }
}

fn validate(request: &WordRequest) -> Result<PartOfSpeech> {
    if request.text.trim().is_empty() {
        return Err(Error::InvalidInput("word text is required".to_string()));
    }
    if request.meanings.is_empty() {
        return Err(Error::InvalidInput("at least one meaning is required".to_string()));
    }
    if request.meanings.iter().any(|m| m.trim().is_empty()) {
        return Err(Error::InvalidInput("meanings must not be blank".to_string()));
    }
    request.part_of_speech.parse::<PartOfSpeech>()
}

/// Submitted meanings with repeats removed, first occurrence wins
fn distinct_meanings(meanings: &[String]) -> Vec<&str> {
    let mut distinct: Vec<&str> = Vec::with_capacity(meanings.len());
    for meaning in meanings {
        if !distinct.contains(&meaning.as_str()) {
            distinct.push(meaning);
        }
    }
    distinct
}
