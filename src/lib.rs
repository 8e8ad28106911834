//! # Tiny Trivia
//!
//! Core logic of a personalized quiz app for children. A parent walks
//! through the setup wizard to describe the child, a quiz generator turns
//! that into multiple-choice questions, and the child plays them one at a
//! time. Rendering, networking and authentication stay with the host; this
//! crate holds the state machines and the data contracts between them.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]
use serde::Serialize;

pub mod constants;

pub mod app;
pub mod catalog;
pub mod config;
pub mod generator;
pub mod identity;
pub mod quiz;
pub mod setup;
pub mod storage;

/// Snapshot of the current screen, sent to the front end
///
/// Every screen serializes its own view; the variant name tells the front
/// end which one to draw.
#[derive(Debug, Serialize, Clone, derive_more::From)]
pub enum ViewMessage {
    /// Start page
    Landing(app::LandingView),
    /// Saved quizzes of the signed-in parent
    Dashboard(app::DashboardView),
    /// A step of the setup wizard
    Setup(setup::View),
    /// Waiting for the quiz generator
    Generating(app::GeneratingView),
    /// A question of a generated or saved quiz
    Quiz(quiz::player::View),
    /// The final score
    Summary(app::SummaryView),
    /// A question of a shared quiz
    SharedQuiz(app::SharedQuizView),
}

impl ViewMessage {
    /// Converts the view to a JSON string for the front end
    ///
    /// # Panics
    ///
    /// Panics if serialization fails, which cannot happen for these types
    /// with the default JSON serializer.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}
