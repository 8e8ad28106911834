//! Question data contract
//!
//! A [`Question`] always carries exactly four options and the index of the
//! correct one. A [`QuestionSet`] is the validated, non-empty list a play
//! session runs over; nothing else can start a session.

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::quiz::{LAST_OPTION_INDEX, MAX_QUESTIONS, OPTION_COUNT};

/// A single multiple-choice question
///
/// Field names on the wire follow the generator contract: `question`,
/// `options` and `correctAnswerIndex`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Question {
    #[garde(length(min = 1))]
    #[serde(rename = "question")]
    prompt: String,
    #[garde(length(min = OPTION_COUNT, max = OPTION_COUNT), inner(length(min = 1)))]
    options: Vec<String>,
    #[garde(range(max = LAST_OPTION_INDEX))]
    #[serde(rename = "correctAnswerIndex")]
    correct_option_index: usize,
}

impl Question {
    /// Builds and validates a question
    ///
    /// # Errors
    ///
    /// Returns a report when the prompt or an option is blank, the option
    /// count is not four, or the correct index does not point at an option.
    pub fn new<I, S>(
        prompt: impl Into<String>,
        options: I,
        correct_option_index: usize,
    ) -> Result<Self, garde::Report>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let question = Self {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_option_index,
        };
        question.validate()?;
        Ok(question)
    }

    /// The question text
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The answer options, in display order
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index of the correct option
    pub fn correct_option_index(&self) -> usize {
        self.correct_option_index
    }

    /// Checks an option index against the correct one
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option_index
    }

    /// Presentation class of every option given the current selection
    pub fn option_marks(&self, selected: Option<usize>) -> Vec<OptionMark> {
        (0..self.options.len())
            .map(|option| OptionMark::classify(option, self.correct_option_index, selected))
            .collect()
    }
}

/// How an answer option should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionMark {
    /// Nothing selected yet
    Unanswered,
    /// The correct option, shown once an answer is locked in
    Correct,
    /// The option the child picked, which was wrong
    IncorrectChosen,
    /// A wrong option that was not picked
    IncorrectNotChosen,
}

impl OptionMark {
    /// Classifies `option` for a question whose answer is `correct`
    pub fn classify(option: usize, correct: usize, selected: Option<usize>) -> Self {
        match selected {
            None => Self::Unanswered,
            Some(_) if option == correct => Self::Correct,
            Some(chosen) if chosen == option => Self::IncorrectChosen,
            Some(_) => Self::IncorrectNotChosen,
        }
    }
}

/// Errors found when building a [`QuestionSet`]
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum QuestionSetError {
    /// No questions at all
    #[error("the quiz has no questions")]
    Empty,
    /// More questions than a quiz may hold
    #[error("the quiz has {0} questions, at most {max} are allowed", max = MAX_QUESTIONS)]
    TooMany(usize),
    /// A question breaks the data contract
    #[error("question {index} is malformed: {reason}")]
    Malformed {
        /// Position of the offending question
        index: usize,
        /// What was wrong with it
        reason: String,
    },
}

/// A non-empty, validated and immutable list of questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(try_from = "Vec<Question>")]
pub struct QuestionSet(#[garde(length(min = 1, max = MAX_QUESTIONS), dive)] Vec<Question>);

impl TryFrom<Vec<Question>> for QuestionSet {
    type Error = QuestionSetError;

    fn try_from(questions: Vec<Question>) -> Result<Self, Self::Error> {
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        if questions.len() > MAX_QUESTIONS {
            return Err(QuestionSetError::TooMany(questions.len()));
        }
        if let Some((index, report)) = questions
            .iter()
            .enumerate()
            .find_map(|(index, question)| question.validate().err().map(|r| (index, r)))
        {
            return Err(QuestionSetError::Malformed {
                index,
                reason: report.to_string(),
            });
        }
        Ok(Self(questions))
    }
}

impl QuestionSet {
    /// Validates a list of questions
    ///
    /// # Errors
    ///
    /// See [`QuestionSetError`].
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        questions.try_into()
    }

    /// Number of questions, never zero
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The question at `index`
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.0.get(index)
    }

    /// All questions, in play order
    pub fn as_slice(&self) -> &[Question] {
        &self.0
    }
}
