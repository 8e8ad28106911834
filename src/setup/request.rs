//! The quiz request assembled by the wizard and its completed form

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{entries::EntryError, wizard::Step, EntryList};
use crate::constants::{child, custom_entries, quiz};

/// Validation failures reported by the setup wizard
///
/// The `Display` text is the message shown to the parent.
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The child's name is empty or whitespace
    #[error("Child's name can't be empty!")]
    MissingChildName,
    /// Neither a catalog topic nor a custom subject was chosen
    #[error("Please choose at least one topic or add a custom subject.")]
    NoTopics,
    /// Age outside of the supported range
    #[error("Age must be between {min} and {max}.", min = child::MIN_AGE, max = child::MAX_AGE)]
    AgeOutOfRange(u8),
    /// Question count outside of the supported range
    #[error(
        "Number of questions must be between {min} and {max}.",
        min = quiz::MIN_QUESTIONS,
        max = quiz::MAX_QUESTIONS
    )]
    QuestionCountOutOfRange(usize),
    /// The topic is not part of the topic catalog
    #[error("\"{0}\" is not an available topic.")]
    UnknownTopic(String),
    /// The locale is not part of the language catalog
    #[error("\"{0}\" is not an available language.")]
    UnknownLanguage(String),
    /// Interest cards remain undecided
    #[error("{0} interests are still waiting for an answer.")]
    InterestsPending(usize),
    /// A custom interest or subject was refused
    #[error(transparent)]
    Entry(#[from] EntryError),
    /// The quiz title is longer than allowed
    #[error("Quiz title is too long.")]
    TitleTooLong,
    /// A completed request breaks a field rule
    #[error("The quiz request is invalid: {0}")]
    Invalid(String),
    /// The operation belongs to another step
    #[error("this action is only available on the {expected} step")]
    WrongStep {
        /// Step that owns the operation
        expected: Step,
        /// Step the wizard is on
        actual: Step,
    },
}

impl ValidationError {
    /// Whether this error should be shown to the parent
    ///
    /// Wrong-step calls and early `next` on undecided interest cards come
    /// from the host, not from user input, and are only reported to the
    /// caller.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::WrongStep { .. } | Self::InterestsPending(_))
    }
}

/// A quiz request under construction
///
/// Only the wizard builds and mutates it; everyone else reads it or
/// finalizes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    pub(super) child_name: String,
    pub(super) child_age: u8,
    pub(super) language: String,
    pub(super) selected_interests: Vec<String>,
    pub(super) custom_interests: EntryList,
    pub(super) selected_topics: Vec<String>,
    pub(super) custom_subjects: EntryList,
    pub(super) question_count: usize,
    pub(super) quiz_title: String,
}

impl QuizRequest {
    /// Creates an empty request with the default age and question count
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            child_name: String::new(),
            child_age: child::DEFAULT_AGE,
            language: language.into(),
            selected_interests: Vec::new(),
            custom_interests: EntryList::default(),
            selected_topics: Vec::new(),
            custom_subjects: EntryList::default(),
            question_count: quiz::DEFAULT_QUESTIONS,
            quiz_title: String::new(),
        }
    }

    /// The child's name as typed
    pub fn child_name(&self) -> &str {
        &self.child_name
    }

    /// The child's age
    pub fn child_age(&self) -> u8 {
        self.child_age
    }

    /// Locale the quiz should be generated in
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Display names of liked interest cards, in the order they were liked
    pub fn selected_interests(&self) -> &[String] {
        &self.selected_interests
    }

    /// Interests typed in by the parent
    pub fn custom_interests(&self) -> &EntryList {
        &self.custom_interests
    }

    /// Catalog topics, in the order they were toggled on
    pub fn selected_topics(&self) -> &[String] {
        &self.selected_topics
    }

    /// Learning subjects typed in by the parent
    pub fn custom_subjects(&self) -> &EntryList {
        &self.custom_subjects
    }

    /// Number of questions to generate
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Quiz title as typed, possibly blank
    pub fn quiz_title(&self) -> &str {
        &self.quiz_title
    }

    pub(super) fn has_child_name(&self) -> bool {
        !self.child_name.trim().is_empty()
    }

    pub(super) fn has_learning_topic(&self) -> bool {
        !self.selected_topics.is_empty() || !self.custom_subjects.is_empty()
    }
}

/// Fields of a [`CompletedRequest`], checked before one is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RequestFields {
    #[garde(custom(|v: &String, _| validate_not_blank("child_name", v)))]
    child_name: String,
    #[garde(range(min = child::MIN_AGE, max = child::MAX_AGE))]
    child_age: u8,
    #[garde(length(min = 2))]
    language: String,
    #[garde(custom(|v: &Vec<String>, _| validate_distinct("selected_interests", v)))]
    selected_interests: Vec<String>,
    #[garde(
        length(max = custom_entries::MAX_COUNT),
        custom(|v: &Vec<String>, _| validate_distinct("custom_interests", v))
    )]
    custom_interests: Vec<String>,
    #[garde(custom(|v: &Vec<String>, _| validate_distinct("selected_topics", v)))]
    selected_topics: Vec<String>,
    #[garde(
        length(max = custom_entries::MAX_COUNT),
        custom(|v: &Vec<String>, _| validate_distinct("custom_subjects", v))
    )]
    custom_subjects: Vec<String>,
    #[garde(range(min = quiz::MIN_QUESTIONS, max = quiz::MAX_QUESTIONS))]
    question_count: usize,
    #[garde(
        length(chars, max = quiz::MAX_TITLE_LENGTH),
        custom(|v: &String, _| validate_not_blank("quiz_title", v))
    )]
    quiz_title: String,
}

fn validate_not_blank(field: &'static str, value: &str) -> garde::Result {
    if value.trim().is_empty() {
        Err(garde::Error::new(format!("{field} is blank")))
    } else {
        Ok(())
    }
}

/// Entries are trimmed, non-blank and unique
fn validate_distinct(field: &'static str, entries: &[String]) -> garde::Result {
    for (index, entry) in entries.iter().enumerate() {
        if entry.is_empty() || entry.trim() != entry {
            return Err(garde::Error::new(format!(
                "{field} entry {index} is blank or untrimmed"
            )));
        }
        if entries[..index].contains(entry) {
            return Err(garde::Error::new(format!(
                "{field} entry {index} is a duplicate"
            )));
        }
    }
    Ok(())
}

/// A finalized request, ready for the quiz generator
///
/// Built only by [`finalize`] or by deserializing, and both run the same
/// checks, so a completed request always has a name, an age and a question
/// count in range and at least one topic or subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RequestFields")]
pub struct CompletedRequest(RequestFields);

impl TryFrom<RequestFields> for CompletedRequest {
    type Error = ValidationError;

    fn try_from(fields: RequestFields) -> Result<Self, Self::Error> {
        fields
            .validate()
            .map_err(|report| ValidationError::Invalid(report.to_string()))?;
        if fields.selected_topics.is_empty() && fields.custom_subjects.is_empty() {
            return Err(ValidationError::NoTopics);
        }
        Ok(Self(fields))
    }
}

impl CompletedRequest {
    /// The child's trimmed name
    pub fn child_name(&self) -> &str {
        &self.0.child_name
    }

    /// The child's age
    pub fn child_age(&self) -> u8 {
        self.0.child_age
    }

    /// Locale the quiz should be generated in
    pub fn language(&self) -> &str {
        &self.0.language
    }

    /// Liked catalog interests
    pub fn selected_interests(&self) -> &[String] {
        &self.0.selected_interests
    }

    /// Interests typed in by the parent
    pub fn custom_interests(&self) -> &[String] {
        &self.0.custom_interests
    }

    /// Chosen catalog topics
    pub fn selected_topics(&self) -> &[String] {
        &self.0.selected_topics
    }

    /// Learning subjects typed in by the parent
    pub fn custom_subjects(&self) -> &[String] {
        &self.0.custom_subjects
    }

    /// Number of questions the generator must return
    pub fn question_count(&self) -> usize {
        self.0.question_count
    }

    /// The quiz title, never blank
    pub fn quiz_title(&self) -> &str {
        &self.0.quiz_title
    }
}

/// Turns a request into its completed form
///
/// A blank title becomes `"{child_name}'s Quiz"`.
///
/// # Errors
///
/// * `ValidationError::MissingChildName` - the name is blank
/// * `ValidationError::NoTopics` - no topic and no custom subject
/// * `ValidationError::AgeOutOfRange` / `QuestionCountOutOfRange` - a bound is broken
/// * `ValidationError::TitleTooLong` - the title exceeds the length limit
/// * `ValidationError::Invalid` - any other field breaks a rule
pub fn finalize(request: &QuizRequest) -> Result<CompletedRequest, ValidationError> {
    if !request.has_child_name() {
        return Err(ValidationError::MissingChildName);
    }
    if !request.has_learning_topic() {
        return Err(ValidationError::NoTopics);
    }
    if !(child::MIN_AGE..=child::MAX_AGE).contains(&request.child_age) {
        return Err(ValidationError::AgeOutOfRange(request.child_age));
    }
    if !(quiz::MIN_QUESTIONS..=quiz::MAX_QUESTIONS).contains(&request.question_count) {
        return Err(ValidationError::QuestionCountOutOfRange(
            request.question_count,
        ));
    }

    let child_name = request.child_name.trim().to_owned();
    let quiz_title = match request.quiz_title.trim() {
        "" => format!("{child_name}'s Quiz"),
        title => title.to_owned(),
    };
    if quiz_title.chars().count() > quiz::MAX_TITLE_LENGTH {
        return Err(ValidationError::TitleTooLong);
    }

    CompletedRequest::try_from(RequestFields {
        child_name,
        child_age: request.child_age,
        language: request.language.clone(),
        selected_interests: request.selected_interests.clone(),
        custom_interests: request.custom_interests.as_slice().to_vec(),
        selected_topics: request.selected_topics.clone(),
        custom_subjects: request.custom_subjects.as_slice().to_vec(),
        question_count: request.question_count,
        quiz_title,
    })
}
