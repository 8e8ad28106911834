//! Saved quizzes
//!
//! A [`QuizStore`] keeps quizzes per owner and looks them up by id for
//! sharing. [`MemoryStore`] is the in-process implementation; it can be
//! dumped to and restored from JSON.

use std::{cmp::Reverse, fmt::Display, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay, serde_as, skip_serializing_none};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;
use web_time::SystemTime;

use crate::{identity::UserId, quiz::QuestionSet};

/// Identifier of a saved quiz, used in share links
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct QuizId(Uuid);

impl QuizId {
    /// Creates a new random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QuizId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for QuizId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for QuizId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A quiz as kept by a [`QuizStore`]
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuiz {
    /// Store-assigned id
    pub id: QuizId,
    /// Parent who saved the quiz
    pub owner_id: UserId,
    /// Quiz title
    pub title: String,
    /// Child the quiz was made for
    pub child_name: String,
    /// The questions, validated on load
    pub questions: QuestionSet,
    /// When the quiz was saved, in milliseconds since the epoch on the wire
    #[serde_as(as = "serde_with::TimestampMilliSeconds<i64>")]
    pub created_at: SystemTime,
    /// Score of the play that was saved
    #[serde(default)]
    pub last_score: Option<usize>,
}

impl SavedQuiz {
    /// Link that opens this quiz for anyone, `"{origin}?quizId={id}"`
    pub fn share_link(&self, origin: &str) -> String {
        format!("{origin}?quizId={}", self.id)
    }
}

/// A quiz to save; the store assigns the id and the creation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuiz {
    /// Parent saving the quiz
    pub owner_id: UserId,
    /// Quiz title
    pub title: String,
    /// Child the quiz was made for
    pub child_name: String,
    /// The questions
    pub questions: QuestionSet,
    /// Score of the finished play
    pub last_score: Option<usize>,
}

/// Errors reported by a quiz store
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend failed
    #[error("Failed to reach quiz storage: {0}")]
    Backend(String),
    /// Stored data could not be read back
    #[error("Saved quizzes could not be read: {0}")]
    Corrupt(String),
}

/// Persistence for saved quizzes
pub trait QuizStore {
    /// Saves a quiz and returns it with its id and creation time
    ///
    /// # Errors
    ///
    /// `StorageError` if the backend refuses the quiz.
    fn save(&mut self, quiz: NewQuiz) -> Result<SavedQuiz, StorageError>;

    /// Quizzes saved by `owner`, newest first
    ///
    /// # Errors
    ///
    /// `StorageError` if the backend cannot be queried.
    fn list_by_owner(&self, owner: &UserId) -> Result<Vec<SavedQuiz>, StorageError>;

    /// The quiz with `id`, if it exists
    ///
    /// # Errors
    ///
    /// `StorageError` if the backend cannot be queried.
    fn get(&self, id: QuizId) -> Result<Option<SavedQuiz>, StorageError>;
}

/// Keeps saved quizzes in memory, in save order
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    quizzes: Vec<SavedQuiz>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved quizzes, across owners
    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    /// Whether nothing has been saved
    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    /// Restores a store from [`MemoryStore::to_json`] output
    ///
    /// # Errors
    ///
    /// `StorageError::Corrupt` if the text is not a list of valid quizzes.
    pub fn from_json(text: &str) -> Result<Self, StorageError> {
        let quizzes = serde_json::from_str(text).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        Ok(Self { quizzes })
    }

    /// Dumps every saved quiz as JSON
    ///
    /// # Errors
    ///
    /// `StorageError::Corrupt` if serialization fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string(&self.quizzes).map_err(|e| StorageError::Corrupt(e.to_string()))
    }
}

impl QuizStore for MemoryStore {
    fn save(&mut self, quiz: NewQuiz) -> Result<SavedQuiz, StorageError> {
        let saved = SavedQuiz {
            id: QuizId::new(),
            owner_id: quiz.owner_id,
            title: quiz.title,
            child_name: quiz.child_name,
            questions: quiz.questions,
            created_at: SystemTime::now(),
            last_score: quiz.last_score,
        };
        info!(id = %saved.id, owner = %saved.owner_id, "quiz saved");
        self.quizzes.push(saved.clone());
        Ok(saved)
    }

    fn list_by_owner(&self, owner: &UserId) -> Result<Vec<SavedQuiz>, StorageError> {
        // later saves win ties on equal timestamps
        Ok(self
            .quizzes
            .iter()
            .rev()
            .filter(|quiz| &quiz.owner_id == owner)
            .sorted_by_key(|quiz| Reverse(quiz.created_at))
            .cloned()
            .collect_vec())
    }

    fn get(&self, id: QuizId) -> Result<Option<SavedQuiz>, StorageError> {
        let found = self.quizzes.iter().find(|quiz| quiz.id == id).cloned();
        debug!(%id, found = found.is_some(), "quiz lookup");
        Ok(found)
    }
}
