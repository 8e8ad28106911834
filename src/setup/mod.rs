//! Collecting what the quiz should be about
//!
//! The [`SetupWizard`] gathers a [`QuizRequest`] over five steps and turns
//! it into a [`CompletedRequest`] for the quiz generator.

mod entries;
mod request;
mod wizard;

pub use entries::{EntryError, EntryList};
pub use request::{finalize, CompletedRequest, QuizRequest, ValidationError};
pub use wizard::{SetupWizard, Step, View};
