//! Quiz generation contract
//!
//! The generator itself (a hosted language model) lives outside the crate.
//! This module fixes what goes in (a [`CompletedRequest`], rendered by
//! [`prompt`]), what must come out ([`response_schema`]) and how an answer
//! is checked before a play session may start.

use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    quiz::{Question, QuestionSet, QuestionSetError},
    setup::CompletedRequest,
};

/// Reasons a generated quiz cannot be played
///
/// The `Display` text is what the parent sees on the finalize step.
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The generator could not be reached or refused the request
    #[error("Failed to generate the quiz. Please try again.")]
    Backend(String),
    /// The answer was not a JSON list of questions
    #[error("AI returned invalid quiz data format.")]
    InvalidFormat(String),
    /// The questions break the data contract
    #[error("AI returned an unusable quiz: {0}")]
    Contract(#[from] QuestionSetError),
    /// The number of questions differs from the request
    #[error("AI returned {actual} questions instead of {expected}.")]
    CountMismatch {
        /// Question count of the request
        expected: usize,
        /// Question count of the answer
        actual: usize,
    },
}

/// Something that turns a request into questions
///
/// Implemented for closures, so tests and hosts can plug in a function.
pub trait QuizGenerator {
    /// Generates the questions for `request`
    ///
    /// # Errors
    ///
    /// Any [`GenerationError`]; the result is checked again with
    /// [`check_contract`] before use.
    fn generate(&self, request: &CompletedRequest) -> Result<Vec<Question>, GenerationError>;
}

impl<F> QuizGenerator for F
where
    F: Fn(&CompletedRequest) -> Result<Vec<Question>, GenerationError>,
{
    fn generate(&self, request: &CompletedRequest) -> Result<Vec<Question>, GenerationError> {
        self(request)
    }
}

/// Checks generated questions against the request
///
/// # Errors
///
/// * `GenerationError::Contract` - empty list or a malformed question
/// * `GenerationError::CountMismatch` - not exactly the requested number
pub fn check_contract(
    request: &CompletedRequest,
    questions: Vec<Question>,
) -> Result<QuestionSet, GenerationError> {
    let questions = QuestionSet::new(questions)?;
    if questions.len() != request.question_count() {
        return Err(GenerationError::CountMismatch {
            expected: request.question_count(),
            actual: questions.len(),
        });
    }
    Ok(questions)
}

/// Runs a generator and checks its answer
///
/// # Errors
///
/// Whatever the generator or [`check_contract`] reports.
pub fn generate_checked<G: QuizGenerator + ?Sized>(
    generator: &G,
    request: &CompletedRequest,
) -> Result<QuestionSet, GenerationError> {
    let result = generator
        .generate(request)
        .and_then(|questions| check_contract(request, questions));
    match &result {
        Ok(questions) => info!(questions = questions.len(), "quiz generated"),
        Err(error) => warn!(?error, "quiz generation failed"),
    }
    result
}

/// Parses the generator's JSON answer into questions
///
/// Surrounding whitespace is ignored. The questions are not validated here.
///
/// # Errors
///
/// `GenerationError::InvalidFormat` if the text is not a JSON list of
/// question objects.
pub fn parse_response(text: &str) -> Result<Vec<Question>, GenerationError> {
    serde_json::from_str(text.trim()).map_err(|e| GenerationError::InvalidFormat(e.to_string()))
}

fn list_line(label: &str, entries: &[String]) -> Option<String> {
    (!entries.is_empty()).then(|| format!("{label}: {}.", entries.join(", ")))
}

/// Renders the generation prompt for a request
pub fn prompt(request: &CompletedRequest) -> String {
    let name = request.child_name();
    let age = request.child_age();
    let language = request.language();

    let mut lines = vec![
        "Write a multiple-choice quiz for a child. Make it fun, positive and educational.".to_owned(),
        String::new(),
        format!("Child: {name}, {age} years old."),
        format!("Locale: {language}."),
    ];
    lines.extend(list_line("Things the child loves", request.selected_interests()));
    lines.extend(list_line(
        "Also weave in these interests chosen by the parent",
        request.custom_interests(),
    ));
    lines.extend(list_line("Cover these topics", request.selected_topics()));
    lines.extend(list_line(
        "Also cover these subjects",
        request.custom_subjects(),
    ));
    lines.extend([
        String::new(),
        format!("Questions should challenge a {age}-year-old without being discouraging."),
        "Younger children get recognition and simple logic; older children get multi-step reasoning and real facts.".to_owned(),
        format!("Use {name}'s name and interests to make questions personal."),
        format!("Write every question and option in the language of the locale {language}, translating topics and interests if needed."),
        String::new(),
        format!("Return exactly {} questions.", request.question_count()),
        "Each question has 4 distinct options and the 0-based index of the correct one.".to_owned(),
        "Answer with JSON matching the given schema.".to_owned(),
    ]);
    lines.join("\n")
}

/// JSON schema of the generator's answer
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "Question text, personalized and in the requested language."
                },
                "options": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Exactly 4 possible answers in the requested language."
                },
                "correctAnswerIndex": {
                    "type": "integer",
                    "description": "0-based index of the correct answer in options."
                }
            },
            "required": ["question", "options", "correctAnswerIndex"]
        }
    })
}
