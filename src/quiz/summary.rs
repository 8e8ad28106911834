//! Final score and praise shown once a quiz is complete

use serde::{Deserialize, Serialize};

use crate::constants::summary::{GREAT_JOB_PERCENT, SUPERSTAR_PERCENT};

/// Score reached at the end of a quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    /// Number of correctly answered questions
    pub score: usize,
    /// Number of questions in the quiz
    pub total: usize,
}

impl FinalScore {
    /// Share of correct answers in whole percent, rounded half up
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.score * 100 + self.total / 2) / self.total) as u32
    }

    /// Praise tier for this score
    pub fn praise(&self) -> Praise {
        match self.percentage() {
            p if p >= SUPERSTAR_PERCENT => Praise::Superstar,
            p if p >= GREAT_JOB_PERCENT => Praise::GreatJob,
            _ => Praise::NiceTry,
        }
    }
}

/// Headline shown above the final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "camelCase")]
pub enum Praise {
    /// 80% and above
    #[display("You're a Superstar! 🌟")]
    Superstar,
    /// 50% and above
    #[display("Great Job! ✨")]
    GreatJob,
    /// Everything else
    #[display("Nice Try! 🚀")]
    NiceTry,
}
