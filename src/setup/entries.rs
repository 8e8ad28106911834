//! Capped, deduplicated lists of free-text entries
//!
//! Custom interests and custom subjects share the same rules: entries are
//! trimmed, blank and duplicate entries are refused, the list never holds
//! more than [`MAX_COUNT`] entries, and insertion order is kept.

use rustrict::CensorStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::custom_entries::MAX_COUNT;

/// Errors that can occur when adding a custom entry
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryError {
    /// The entry is empty or contains only whitespace
    #[error("Please type something first.")]
    Empty,
    /// The list already holds the maximum number of entries
    #[error("You can add up to {max} entries.", max = MAX_COUNT)]
    Full,
    /// The entry is already in the list
    #[error("That one is already on the list.")]
    Duplicate,
    /// The entry contains inappropriate content
    #[error("Please choose a different word.")]
    Sinful,
}

/// An ordered set of at most [`MAX_COUNT`] trimmed entries
///
/// Deserializing adds the entries one by one, so stored lists obey the
/// same rules as typed ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct EntryList(Vec<String>);

impl TryFrom<Vec<String>> for EntryList {
    type Error = EntryError;

    fn try_from(entries: Vec<String>) -> Result<Self, Self::Error> {
        let mut list = Self::default();
        for entry in &entries {
            list.add(entry)?;
        }
        Ok(list)
    }
}

impl EntryList {
    /// Adds an entry after trimming it
    ///
    /// # Returns
    ///
    /// The stored, trimmed entry
    ///
    /// # Errors
    ///
    /// * `EntryError::Empty` - entry is blank after trimming
    /// * `EntryError::Full` - the list already holds [`MAX_COUNT`] entries
    /// * `EntryError::Duplicate` - an identical entry is already present
    /// * `EntryError::Sinful` - entry contains inappropriate content
    pub fn add(&mut self, entry: &str) -> Result<&str, EntryError> {
        let entry = rustrict::trim_whitespace(entry);
        if entry.is_empty() {
            return Err(EntryError::Empty);
        }
        if self.is_full() {
            return Err(EntryError::Full);
        }
        if self.contains(entry) {
            return Err(EntryError::Duplicate);
        }
        if entry.is_inappropriate() {
            return Err(EntryError::Sinful);
        }
        self.0.push(entry.to_owned());
        Ok(self.0.last().map_or("", String::as_str))
    }

    /// Removes an entry by exact match, returning whether it was present
    pub fn remove(&mut self, entry: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|e| e != entry);
        before != self.0.len()
    }

    /// Checks whether an identical entry is present
    pub fn contains(&self, entry: &str) -> bool {
        self.0.iter().any(|e| e == entry)
    }

    /// Whether no further entries can be added
    pub fn is_full(&self) -> bool {
        self.0.len() >= MAX_COUNT
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in insertion order
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
