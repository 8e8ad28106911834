//! Quiz play state machine
//!
//! A [`QuizPlayer`] walks a [`QuestionSet`] strictly in order. Each question
//! takes exactly one answer, which locks until [`QuizPlayer::advance`]; the
//! score only grows and counts each question at most once.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tracing::{debug, info};

use super::{
    question::{OptionMark, Question, QuestionSet},
    summary::FinalScore,
};

/// Where the player is in the quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    /// Question `i` is shown and waits for an answer
    AwaitingAnswer(usize),
    /// Question `i` has a locked-in answer
    Answered(usize),
    /// Every question was answered and advanced past
    Complete,
}

/// Outcome of [`QuizPlayer::select_answer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The answer was right and scored
    Correct,
    /// The answer was wrong
    Incorrect,
    /// Already answered, complete, or not an option of the question
    Ignored,
}

/// Outcome of [`QuizPlayer::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the question at this index
    Next(usize),
    /// The last question was left; the quiz is over
    Complete(FinalScore),
    /// No answer locked in, or already complete
    Ignored,
}

/// Snapshot of the current question for presentation
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct View {
    /// Position of the question, starting at 0
    pub index: usize,
    /// Number of questions in the quiz
    pub total: usize,
    /// Fraction of the progress bar to fill
    pub progress: f64,
    /// The question text
    pub prompt: String,
    /// The answer options
    pub options: Vec<String>,
    /// How each option should be shown
    pub marks: Vec<OptionMark>,
    /// Option picked for this question
    pub selected: Option<usize>,
    /// Score so far
    pub score: usize,
    /// Whether advancing leaves the quiz
    pub is_last: bool,
}

/// Plays one quiz from the first question to the final score
#[derive(Debug, Clone)]
pub struct QuizPlayer {
    questions: QuestionSet,
    current_index: usize,
    score: usize,
    selected: Option<usize>,
    complete: bool,
}

impl QuizPlayer {
    /// Starts a session on the first question with a score of zero
    pub fn new(questions: QuestionSet) -> Self {
        Self {
            questions,
            current_index: 0,
            score: 0,
            selected: None,
            complete: false,
        }
    }

    /// The questions being played
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    /// Correct answers so far
    pub fn score(&self) -> usize {
        self.score
    }

    /// Index of the current question
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Option picked for the current question, if any
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Current state of the session
    pub fn state(&self) -> State {
        if self.complete {
            State::Complete
        } else if self.selected.is_some() {
            State::Answered(self.current_index)
        } else {
            State::AwaitingAnswer(self.current_index)
        }
    }

    /// The question on screen, `None` once complete
    pub fn current_question(&self) -> Option<&Question> {
        if self.complete {
            None
        } else {
            self.questions.get(self.current_index)
        }
    }

    /// Fraction of the quiz reached, `(i + 1) / N`
    pub fn progress(&self) -> f64 {
        let reached = if self.complete {
            self.questions.len()
        } else {
            self.current_index + 1
        };
        reached as f64 / self.questions.len() as f64
    }

    /// Presentation class of each option of the current question
    pub fn option_marks(&self) -> Vec<OptionMark> {
        self.current_question()
            .map(|question| question.option_marks(self.selected))
            .unwrap_or_default()
    }

    /// The final score, once complete
    pub fn final_score(&self) -> Option<FinalScore> {
        self.complete.then(|| FinalScore {
            score: self.score,
            total: self.questions.len(),
        })
    }

    /// Locks in an answer for the current question
    ///
    /// Only the first answer per question counts; later calls before
    /// [`QuizPlayer::advance`], calls after completion and option indices
    /// outside the question are ignored.
    pub fn select_answer(&mut self, option: usize) -> Selection {
        let State::AwaitingAnswer(index) = self.state() else {
            return Selection::Ignored;
        };
        let Some(question) = self.questions.get(index) else {
            return Selection::Ignored;
        };
        if option >= question.options().len() {
            debug!(index, option, "answer outside of the options ignored");
            return Selection::Ignored;
        }

        self.selected = Some(option);
        if question.is_correct(option) {
            self.score += 1;
            debug!(index, option, score = self.score, "correct answer");
            Selection::Correct
        } else {
            debug!(index, option, score = self.score, "incorrect answer");
            Selection::Incorrect
        }
    }

    /// Moves past an answered question
    ///
    /// After the last question the session completes and the final score is
    /// returned. Without a locked-in answer this does nothing.
    pub fn advance(&mut self) -> Advance {
        let State::Answered(index) = self.state() else {
            return Advance::Ignored;
        };

        if index + 1 < self.questions.len() {
            self.current_index = index + 1;
            self.selected = None;
            Advance::Next(self.current_index)
        } else {
            self.complete = true;
            let final_score = FinalScore {
                score: self.score,
                total: self.questions.len(),
            };
            info!(
                score = final_score.score,
                total = final_score.total,
                "quiz complete"
            );
            Advance::Complete(final_score)
        }
    }

    /// Snapshot of the current question, `None` once complete
    pub fn view(&self) -> Option<View> {
        let question = self.current_question()?;
        Some(View {
            index: self.current_index,
            total: self.questions.len(),
            progress: self.progress(),
            prompt: question.prompt().to_owned(),
            options: question.options().to_vec(),
            marks: question.option_marks(self.selected),
            selected: self.selected,
            score: self.score,
            is_last: self.current_index + 1 == self.questions.len(),
        })
    }
}
