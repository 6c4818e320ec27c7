//! Database models

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Grammatical category of a word
///
/// Stored and serialized by its canonical label (`"Noun"`, `"Verb-1"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    /// Base form
    #[serde(rename = "Verb-1")]
    Verb1,
    /// Past simple
    #[serde(rename = "Verb-2")]
    Verb2,
    /// Past participle
    #[serde(rename = "Verb-3")]
    Verb3,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Interjection,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 10] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb1,
        PartOfSpeech::Verb2,
        PartOfSpeech::Verb3,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
        PartOfSpeech::Pronoun,
        PartOfSpeech::Preposition,
        PartOfSpeech::Conjunction,
        PartOfSpeech::Interjection,
    ];

    /// Canonical label
    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "Noun",
            PartOfSpeech::Verb1 => "Verb-1",
            PartOfSpeech::Verb2 => "Verb-2",
            PartOfSpeech::Verb3 => "Verb-3",
            PartOfSpeech::Adjective => "Adjective",
            PartOfSpeech::Adverb => "Adverb",
            PartOfSpeech::Pronoun => "Pronoun",
            PartOfSpeech::Preposition => "Preposition",
            PartOfSpeech::Conjunction => "Conjunction",
            PartOfSpeech::Interjection => "Interjection",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartOfSpeech {
    type Err = Error;

    /// Exact, case-sensitive match against the canonical labels
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(Error::InvalidInput("part of speech is required".to_string()));
        }
        PartOfSpeech::ALL
            .iter()
            .copied()
            .find(|pos| pos.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown part of speech: {}", s)))
    }
}

/// Lifecycle state of a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    /// Visible to every catalog query
    Active,
    /// Soft-deleted, recoverable with restore
    Archived,
}

impl WordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordStatus::Active => "active",
            WordStatus::Archived => "archived",
        }
    }
}

impl FromStr for WordStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(WordStatus::Active),
            "archived" => Ok(WordStatus::Archived),
            other => Err(Error::Internal(format!("unknown word status: {}", other))),
        }
    }
}

/// Deduplicated meaning text, shared between words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meaning {
    pub guid: Uuid,
    pub text: String,
}

impl Meaning {
    pub fn new(text: String) -> Self {
        Self {
            guid: Uuid::new_v4(),
            text,
        }
    }
}

/// Quiz counters owned by a word
///
/// `total == correct + wrong` always holds; the only mutators are
/// [`AccuracyRecord::record_correct`] and [`AccuracyRecord::record_wrong`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyRecord {
    pub total: u32,
    pub correct: u32,
    pub wrong: u32,
}

impl AccuracyRecord {
    pub fn record_correct(&mut self) {
        self.total += 1;
        self.correct += 1;
    }

    pub fn record_wrong(&mut self) {
        self.total += 1;
        self.wrong += 1;
    }
}

/// Vocabulary entry, unique on (text, part of speech) among active words
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub guid: Uuid,
    pub text: String,
    pub category: String,
    pub part_of_speech: PartOfSpeech,
    pub score: f64,
    pub status: WordStatus,
    /// Meanings in attachment order
    pub meanings: Vec<Meaning>,
    pub accuracy: AccuracyRecord,
}

impl Word {
    /// Score of a freshly created or correctly recalled word
    pub const BASELINE_SCORE: f64 = 1.0;

    /// Create a new active word with baseline score and zeroed accuracy
    pub fn new(
        text: String,
        category: String,
        part_of_speech: PartOfSpeech,
        meanings: Vec<Meaning>,
    ) -> Self {
        let mut word = Self {
            guid: Uuid::new_v4(),
            text,
            category,
            part_of_speech,
            score: Self::BASELINE_SCORE,
            status: WordStatus::Active,
            meanings: Vec::with_capacity(meanings.len()),
            accuracy: AccuracyRecord::default(),
        };
        for meaning in meanings {
            word.attach_meaning(meaning);
        }
        word
    }

    /// Whether a meaning with this exact text is attached
    pub fn has_meaning(&self, text: &str) -> bool {
        self.meanings.iter().any(|m| m.text == text)
    }

    /// Attach a meaning unless one with the same text is already present
    ///
    /// Returns true when the meaning was added.
    pub fn attach_meaning(&mut self, meaning: Meaning) -> bool {
        if self.has_meaning(&meaning.text) {
            return false;
        }
        self.meanings.push(meaning);
        true
    }

    /// Detach the meaning with this text, returning it if it was attached
    pub fn detach_meaning(&mut self, text: &str) -> Option<Meaning> {
        let index = self.meanings.iter().position(|m| m.text == text)?;
        Some(self.meanings.remove(index))
    }

    /// Meaning texts in attachment order
    pub fn meaning_texts(&self) -> Vec<String> {
        self.meanings.iter().map(|m| m.text.clone()).collect()
    }
}
