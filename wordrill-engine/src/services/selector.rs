//! Next-word selection
//!
//! The highest score wins; ties are broken uniformly at random with the
//! selector's own random source. Every word that was not chosen then gains
//! one point, so words left waiting grow more urgent each round.

use crate::store::WordCatalog;
use rand::{Rng, RngCore};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use wordrill_common::db::Word;
use wordrill_common::Result;

/// Score added to every word that was not selected
pub const WAITING_INCREMENT: f64 = 1.0;

pub struct Selector {
    words: Arc<dyn WordCatalog>,
    rng: Mutex<Box<dyn RngCore + Send>>,
    batch_size: usize,
}

impl Selector {
    /// `rng` is owned by the selector for its whole life; pass a seeded
    /// generator for reproducible selections.
    pub fn new(
        words: Arc<dyn WordCatalog>,
        rng: impl RngCore + Send + 'static,
        batch_size: usize,
    ) -> Self {
        Self {
            words,
            rng: Mutex::new(Box::new(rng)),
            batch_size,
        }
    }

    /// Choose the next word to present and reprioritize the rest
    ///
    /// Returns the chosen word as it was at selection time, or `None` for an
    /// empty catalog (in which case nothing is written).
    pub async fn pick_next(&self) -> Result<Option<Word>> {
        let mut words = self.words.list_all().await?;
        if words.is_empty() {
            debug!("Catalog is empty, nothing to select");
            return Ok(None);
        }

        let candidates = highest_scoring(&words);
        let chosen_index = if candidates.len() == 1 {
            candidates[0]
        } else {
            // A panic mid-draw leaves the generator usable
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            candidates[rng.gen_range(0..candidates.len())]
        };
        let chosen = words[chosen_index].clone();

        for (index, word) in words.iter_mut().enumerate() {
            if index != chosen_index {
                word.score += WAITING_INCREMENT;
            }
        }

        self.words.bulk_update_scores(&words, self.batch_size).await?;

        debug!(
            word = %chosen.text,
            score = chosen.score,
            tied = candidates.len(),
            catalog = words.len(),
            "Selected next word"
        );
        Ok(Some(chosen))
    }
}

/// Indices of the words sharing the maximum score, in catalog order
fn highest_scoring(words: &[Word]) -> Vec<usize> {
    let mut best: Vec<usize> = Vec::new();
    let mut best_score = f64::NEG_INFINITY;

    for (index, word) in words.iter().enumerate() {
        if word.score > best_score {
            best_score = word.score;
            best.clear();
            best.push(index);
        } else if word.score == best_score {
            best.push(index);
        }
    }

    best
}
