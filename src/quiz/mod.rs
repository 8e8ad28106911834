//! Playing a generated quiz
//!
//! [`question`] holds the data contract every quiz must satisfy,
//! [`player`] the play state machine and [`summary`] the final score.

pub mod player;
pub mod question;
pub mod summary;

pub use player::QuizPlayer;
pub use question::{OptionMark, Question, QuestionSet, QuestionSetError};
pub use summary::{FinalScore, Praise};
