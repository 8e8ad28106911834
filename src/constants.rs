//! Configuration limits for the Tiny Trivia core
//!
//! This module contains the fixed bounds used by the setup wizard, the
//! question contracts and the summary screen, so that validation and
//! defaults agree everywhere in the crate.

/// Child profile limits collected by the setup wizard
pub mod child {
    /// Youngest supported child age
    pub const MIN_AGE: u8 = 3;
    /// Oldest supported child age
    pub const MAX_AGE: u8 = 12;
    /// Age preselected when the wizard starts
    pub const DEFAULT_AGE: u8 = 5;
}

/// Custom interest and custom subject limits
pub mod custom_entries {
    /// Maximum number of entries in a custom interest or subject list
    pub const MAX_COUNT: usize = 5;
}

/// Quiz shape limits
pub mod quiz {
    /// Minimum number of questions a quiz can request
    pub const MIN_QUESTIONS: usize = 5;
    /// Maximum number of questions a quiz can request
    pub const MAX_QUESTIONS: usize = 20;
    /// Question count preselected on the final wizard step
    pub const DEFAULT_QUESTIONS: usize = 10;
    /// Number of answer options every question carries
    pub const OPTION_COUNT: usize = 4;
    /// Highest valid correct option index
    pub const LAST_OPTION_INDEX: usize = OPTION_COUNT - 1;
    /// Maximum length of a quiz title in characters
    pub const MAX_TITLE_LENGTH: usize = 200;
}

/// Locale defaults
pub mod language {
    /// Locale used when the host does not detect one
    pub const DEFAULT: &str = "en-US";
}

/// Summary screen thresholds, in whole percent
pub mod summary {
    /// Minimum percentage for the top praise tier
    pub const SUPERSTAR_PERCENT: u32 = 80;
    /// Minimum percentage for the middle praise tier
    pub const GREAT_JOB_PERCENT: u32 = 50;
}
