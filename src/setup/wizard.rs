//! The five-step setup wizard
//!
//! The wizard walks a parent through `details → interests → custom-interests
//! → topics → finalize`, building a [`QuizRequest`]. Every operation belongs
//! to exactly one step; transitions are guarded and a refused transition
//! leaves the wizard where it was with a message for the parent.

use std::sync::Arc;

use enum_map::Enum;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tracing::{debug, info};

use super::request::{finalize, CompletedRequest, QuizRequest, ValidationError};
use crate::{
    catalog::{Catalog, Interest},
    constants::{child, quiz},
};

/// The steps of the wizard, in order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum, derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    /// Child name, age and quiz language
    #[display("details")]
    Details,
    /// Like or skip the age-appropriate interest cards
    #[display("interests")]
    Interests,
    /// Free-text interests
    #[display("custom-interests")]
    CustomInterests,
    /// Learning topics and free-text subjects
    #[display("topics")]
    Topics,
    /// Quiz title and question count
    #[display("finalize")]
    Finalize,
}

impl Step {
    /// Position of the step, starting at 0
    pub fn index(self) -> usize {
        self.into_usize()
    }

    /// The step that follows this one, if any
    pub fn next(self) -> Option<Self> {
        let index = self.into_usize() + 1;
        (index < Self::LENGTH).then(|| Self::from_usize(index))
    }
}

/// Snapshot of the wizard for presentation
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct View {
    /// Current step
    pub step: Step,
    /// Fraction of the progress bar to fill
    pub progress: f64,
    /// The request collected so far
    pub request: QuizRequest,
    /// Interest card to show on the interests step
    pub current_interest: Option<Interest>,
    /// Number of interest cards not yet decided
    pub remaining_interests: usize,
    /// Message to show above the step, if any
    pub error: Option<String>,
}

/// Collects a [`QuizRequest`] one step at a time
#[derive(Debug, Clone)]
pub struct SetupWizard {
    catalog: Arc<Catalog>,
    step: Step,
    request: QuizRequest,
    interest_cursor: usize,
    error: Option<String>,
}

impl SetupWizard {
    /// Creates a wizard on the details step
    ///
    /// # Arguments
    ///
    /// * `catalog` - Interest and topic lists to offer
    /// * `language` - Locale to preselect
    pub fn new(catalog: Arc<Catalog>, language: impl Into<String>) -> Self {
        Self {
            catalog,
            step: Step::Details,
            request: QuizRequest::new(language),
            interest_cursor: 0,
            error: None,
        }
    }

    /// Current step
    pub fn step(&self) -> Step {
        self.step
    }

    /// The request collected so far
    pub fn request(&self) -> &QuizRequest {
        &self.request
    }

    /// Catalog the wizard offers choices from
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Position of the interest card being shown
    pub fn interest_cursor(&self) -> usize {
        self.interest_cursor
    }

    /// Message to show to the parent, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Hides the current message
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Records a failure reported from outside the wizard
    ///
    /// Used when quiz generation fails after submit; the wizard stays on
    /// the finalize step with everything the parent entered.
    pub fn report_failure(&mut self, message: impl std::fmt::Display) {
        self.error = Some(message.to_string());
    }

    /// Interest cards offered for the current age, in catalog order
    pub fn visible_interests(&self) -> Vec<&Interest> {
        self.catalog
            .interests_for_age(self.request.child_age)
            .collect()
    }

    /// The interest card under the cursor
    pub fn current_interest(&self) -> Option<&Interest> {
        self.catalog
            .interests_for_age(self.request.child_age)
            .nth(self.interest_cursor)
    }

    /// Progress through the wizard, in `(0, 1)`
    pub fn progress(&self) -> f64 {
        (self.step.index() + 1) as f64 / (Step::LENGTH + 1) as f64
    }

    fn remaining_interests(&self) -> usize {
        self.catalog
            .interests_for_age(self.request.child_age)
            .count()
            .saturating_sub(self.interest_cursor)
    }

    fn change_step(&mut self, before: Step, after: Step) -> bool {
        if self.step == before {
            debug!(from = %before, to = %after, "wizard step changed");
            self.step = after;
            self.error = None;

            true
        } else {
            false
        }
    }

    fn reject(&mut self, error: ValidationError) -> ValidationError {
        debug!(step = %self.step, %error, "wizard refused action");
        if error.is_user_facing() {
            self.error = Some(error.to_string());
        }
        error
    }

    /// Clears the message after a successful edit, records it otherwise
    fn settle<T>(&mut self, result: Result<T, ValidationError>) -> Result<T, ValidationError> {
        match result {
            Ok(value) => {
                self.error = None;
                Ok(value)
            }
            Err(error) => Err(self.reject(error)),
        }
    }

    fn expect_step(&mut self, expected: Step) -> Result<(), ValidationError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(self.reject(ValidationError::WrongStep {
                expected,
                actual: self.step,
            }))
        }
    }

    /// Sets the child's name as typed
    ///
    /// # Errors
    ///
    /// `ValidationError::WrongStep` outside of the details step
    pub fn set_child_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.expect_step(Step::Details)?;
        name.clone_into(&mut self.request.child_name);
        Ok(())
    }

    /// Sets the child's age
    ///
    /// Every age change restarts the interest cards and forgets the
    /// interests liked so far, since the filtered card list changes.
    ///
    /// # Errors
    ///
    /// * `ValidationError::WrongStep` - outside of the details step
    /// * `ValidationError::AgeOutOfRange` - age outside the supported range
    pub fn set_child_age(&mut self, age: u8) -> Result<(), ValidationError> {
        self.expect_step(Step::Details)?;
        if !(child::MIN_AGE..=child::MAX_AGE).contains(&age) {
            return Err(self.reject(ValidationError::AgeOutOfRange(age)));
        }
        self.request.child_age = age;
        self.interest_cursor = 0;
        self.request.selected_interests.clear();
        Ok(())
    }

    /// Sets the quiz locale
    ///
    /// # Errors
    ///
    /// * `ValidationError::WrongStep` - outside of the details step
    /// * `ValidationError::UnknownLanguage` - locale not in the language catalog
    pub fn set_language(&mut self, language: &str) -> Result<(), ValidationError> {
        self.expect_step(Step::Details)?;
        let Some(known) = self.catalog.language(language) else {
            return Err(self.reject(ValidationError::UnknownLanguage(language.to_owned())));
        };
        known.code.clone_into(&mut self.request.language);
        Ok(())
    }

    /// Likes the interest card under the cursor and moves to the next card
    ///
    /// # Errors
    ///
    /// `ValidationError::WrongStep` outside of the interests step
    pub fn like(&mut self) -> Result<Step, ValidationError> {
        self.decide(true)
    }

    /// Skips the interest card under the cursor and moves to the next card
    ///
    /// # Errors
    ///
    /// `ValidationError::WrongStep` outside of the interests step
    pub fn skip(&mut self) -> Result<Step, ValidationError> {
        self.decide(false)
    }

    /// Records a decision on the current card
    ///
    /// After the last card the wizard moves to the custom interests step.
    /// With no card left to decide (an empty filtered list) this does
    /// nothing; use [`SetupWizard::next`] instead.
    fn decide(&mut self, liked: bool) -> Result<Step, ValidationError> {
        self.expect_step(Step::Interests)?;

        let visible = self
            .catalog
            .interests_for_age(self.request.child_age)
            .count();
        let Some(interest) = self.current_interest() else {
            return Ok(self.step);
        };
        let name = interest.display_name.clone();

        if liked {
            debug!(interest = %name, "interest liked");
            self.request.selected_interests.push(name);
        }
        self.interest_cursor += 1;
        if self.interest_cursor >= visible {
            self.change_step(Step::Interests, Step::CustomInterests);
        }

        Ok(self.step)
    }

    /// Moves to the next step if the current step's guard allows it
    ///
    /// * details: the child's name must not be blank
    /// * interests: every card must be decided (always true for an empty list)
    /// * custom interests: always allowed
    /// * topics: a topic or a custom subject must be chosen
    /// * finalize: nothing follows; use [`SetupWizard::submit`]
    ///
    /// # Errors
    ///
    /// The refused guard, also recorded as the visible message when it is
    /// user-facing.
    pub fn next(&mut self) -> Result<Step, ValidationError> {
        match self.step {
            Step::Details => {
                if !self.request.has_child_name() {
                    return Err(self.reject(ValidationError::MissingChildName));
                }
                self.change_step(Step::Details, Step::Interests);
            }
            Step::Interests => {
                let remaining = self.remaining_interests();
                if remaining > 0 {
                    return Err(self.reject(ValidationError::InterestsPending(remaining)));
                }
                self.change_step(Step::Interests, Step::CustomInterests);
            }
            Step::CustomInterests => {
                self.change_step(Step::CustomInterests, Step::Topics);
            }
            Step::Topics => {
                if !self.request.has_learning_topic() {
                    return Err(self.reject(ValidationError::NoTopics));
                }
                self.change_step(Step::Topics, Step::Finalize);
            }
            Step::Finalize => (),
        }

        Ok(self.step)
    }

    /// Adds a free-text interest
    ///
    /// # Errors
    ///
    /// * `ValidationError::WrongStep` - outside of the custom interests step
    /// * `ValidationError::Entry` - blank, duplicate, inappropriate or over the cap
    pub fn add_custom_interest(&mut self, entry: &str) -> Result<(), ValidationError> {
        self.expect_step(Step::CustomInterests)?;
        let added = self.request.custom_interests.add(entry).map(|_| ());
        self.settle(added.map_err(ValidationError::from))
    }

    /// Removes a free-text interest, returning whether it was present
    ///
    /// # Errors
    ///
    /// `ValidationError::WrongStep` outside of the custom interests step
    pub fn remove_custom_interest(&mut self, entry: &str) -> Result<bool, ValidationError> {
        self.expect_step(Step::CustomInterests)?;
        let removed = self.request.custom_interests.remove(entry);
        self.settle(Ok(removed))
    }

    /// Selects a catalog topic, or deselects it if already selected
    ///
    /// # Returns
    ///
    /// Whether the topic is selected afterwards
    ///
    /// # Errors
    ///
    /// * `ValidationError::WrongStep` - outside of the topics step
    /// * `ValidationError::UnknownTopic` - topic not in the catalog
    pub fn toggle_topic(&mut self, topic: &str) -> Result<bool, ValidationError> {
        self.expect_step(Step::Topics)?;
        if !self.catalog.has_topic(topic) {
            return Err(self.reject(ValidationError::UnknownTopic(topic.to_owned())));
        }

        let topics = &mut self.request.selected_topics;
        let selected = if let Some(position) = topics.iter().position(|t| t == topic) {
            topics.remove(position);
            false
        } else {
            topics.push(topic.to_owned());
            true
        };
        self.settle(Ok(selected))
    }

    /// Adds a free-text learning subject
    ///
    /// # Errors
    ///
    /// * `ValidationError::WrongStep` - outside of the topics step
    /// * `ValidationError::Entry` - blank, duplicate, inappropriate or over the cap
    pub fn add_custom_subject(&mut self, entry: &str) -> Result<(), ValidationError> {
        self.expect_step(Step::Topics)?;
        let added = self.request.custom_subjects.add(entry).map(|_| ());
        self.settle(added.map_err(ValidationError::from))
    }

    /// Removes a free-text learning subject, returning whether it was present
    ///
    /// # Errors
    ///
    /// `ValidationError::WrongStep` outside of the topics step
    pub fn remove_custom_subject(&mut self, entry: &str) -> Result<bool, ValidationError> {
        self.expect_step(Step::Topics)?;
        let removed = self.request.custom_subjects.remove(entry);
        self.settle(Ok(removed))
    }

    /// Sets the quiz title; a blank title is replaced on submit
    ///
    /// # Errors
    ///
    /// `ValidationError::WrongStep` outside of the finalize step
    pub fn set_quiz_title(&mut self, title: &str) -> Result<(), ValidationError> {
        self.expect_step(Step::Finalize)?;
        title.clone_into(&mut self.request.quiz_title);
        Ok(())
    }

    /// Sets how many questions to generate
    ///
    /// # Errors
    ///
    /// * `ValidationError::WrongStep` - outside of the finalize step
    /// * `ValidationError::QuestionCountOutOfRange` - count outside the supported range
    pub fn set_question_count(&mut self, count: usize) -> Result<(), ValidationError> {
        self.expect_step(Step::Finalize)?;
        if !(quiz::MIN_QUESTIONS..=quiz::MAX_QUESTIONS).contains(&count) {
            return Err(self.reject(ValidationError::QuestionCountOutOfRange(count)));
        }
        self.request.question_count = count;
        Ok(())
    }

    /// Completes the request for the quiz generator
    ///
    /// The wizard itself stays on the finalize step so a failed generation
    /// can return to it without losing input.
    ///
    /// # Errors
    ///
    /// * `ValidationError::WrongStep` - outside of the finalize step
    /// * any error of [`finalize`]
    pub fn submit(&mut self) -> Result<CompletedRequest, ValidationError> {
        self.expect_step(Step::Finalize)?;
        let completed = finalize(&self.request).map_err(|e| self.reject(e))?;
        info!(
            title = completed.quiz_title(),
            questions = completed.question_count(),
            language = completed.language(),
            "quiz request submitted"
        );
        self.error = None;
        Ok(completed)
    }

    /// Snapshot of the wizard for presentation
    pub fn view(&self) -> View {
        View {
            step: self.step,
            progress: self.progress(),
            request: self.request.clone(),
            current_interest: match self.step {
                Step::Interests => self.current_interest().cloned(),
                _ => None,
            },
            remaining_interests: self.remaining_interests(),
            error: self.error.clone(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::catalog::Language;
    use pretty_assertions::assert_eq;

    fn wizard() -> SetupWizard {
        SetupWizard::new(Arc::new(Catalog::default()), "en-US")
    }

    fn interest(id: &str, min_age: Option<u8>, max_age: Option<u8>) -> Interest {
        Interest {
            id: id.to_string(),
            display_name: id.to_uppercase(),
            emoji: String::new(),
            min_age,
            max_age,
        }
    }

    fn small_catalog(interests: Vec<Interest>) -> Arc<Catalog> {
        Arc::new(Catalog::new(
            interests,
            vec!["Spelling".to_string(), "Science".to_string()],
            vec![Language {
                code: "en-US".to_string(),
                name: "English (US)".to_string(),
            }],
        ))
    }

    fn wizard_at_topics() -> SetupWizard {
        let mut wizard = SetupWizard::new(small_catalog(vec![]), "en-US");
        wizard.set_child_name("Alex").unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.step(), Step::Topics);
        wizard
    }

    fn wizard_at_finalize() -> SetupWizard {
        let mut wizard = wizard_at_topics();
        wizard.toggle_topic("Spelling").unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.step(), Step::Finalize);
        wizard
    }

    #[test]
    fn test_step_order() {
        assert_eq!(Step::Details.next(), Some(Step::Interests));
        assert_eq!(Step::Interests.next(), Some(Step::CustomInterests));
        assert_eq!(Step::CustomInterests.next(), Some(Step::Topics));
        assert_eq!(Step::Topics.next(), Some(Step::Finalize));
        assert_eq!(Step::Finalize.next(), None);
        assert_eq!(Step::Topics.index(), 3);
        assert_eq!(Step::CustomInterests.to_string(), "custom-interests");
    }

    #[test]
    fn test_details_requires_name() {
        let mut wizard = wizard();
        assert_eq!(wizard.next(), Err(ValidationError::MissingChildName));
        assert_eq!(wizard.step(), Step::Details);
        assert_eq!(wizard.error(), Some("Child's name can't be empty!"));

        wizard.set_child_name("   ").unwrap();
        assert_eq!(wizard.next(), Err(ValidationError::MissingChildName));
        assert_eq!(wizard.step(), Step::Details);

        wizard.set_child_name("Alex").unwrap();
        assert_eq!(wizard.next(), Ok(Step::Interests));
        assert_eq!(wizard.error(), None);
    }

    #[test]
    fn test_like_and_skip_walk_filtered_cards() {
        let catalog = small_catalog(vec![
            interest("a", None, None),
            interest("b", Some(6), None),
            interest("c", None, Some(8)),
        ]);
        let mut wizard = SetupWizard::new(catalog, "en-US");
        wizard.set_child_name("Alex").unwrap();
        wizard.set_child_age(5).unwrap();
        wizard.next().unwrap();

        assert_eq!(
            wizard.visible_interests().iter().map(|i| i.id.as_str()).collect::<Vec<_>>(),
            ["a", "c"]
        );
        assert_eq!(wizard.current_interest().map(|i| i.id.as_str()), Some("a"));
        assert_eq!(wizard.skip(), Ok(Step::Interests));
        assert_eq!(wizard.current_interest().map(|i| i.id.as_str()), Some("c"));
        assert_eq!(wizard.like(), Ok(Step::CustomInterests));
        assert_eq!(wizard.request().selected_interests(), ["C"]);
    }

    #[test]
    fn test_interests_keep_selection_order() {
        let catalog = small_catalog(vec![
            interest("a", None, None),
            interest("b", None, None),
            interest("c", None, None),
        ]);
        let mut wizard = SetupWizard::new(catalog, "en-US");
        wizard.set_child_name("Alex").unwrap();
        wizard.next().unwrap();
        wizard.like().unwrap();
        wizard.skip().unwrap();
        wizard.like().unwrap();
        assert_eq!(wizard.request().selected_interests(), ["A", "C"]);
        assert_eq!(wizard.step(), Step::CustomInterests);
    }

    #[test]
    fn test_next_refused_while_cards_remain() {
        let mut wizard = wizard();
        wizard.set_child_name("Alex").unwrap();
        wizard.next().unwrap();
        let remaining = wizard.visible_interests().len();
        assert_eq!(wizard.next(), Err(ValidationError::InterestsPending(remaining)));
        assert_eq!(wizard.step(), Step::Interests);
        assert_eq!(wizard.error(), None);
    }

    #[test]
    fn test_empty_filtered_view_needs_manual_next() {
        let catalog = small_catalog(vec![interest("teens", Some(12), None)]);
        let mut wizard = SetupWizard::new(catalog, "en-US");
        wizard.set_child_name("Alex").unwrap();
        wizard.next().unwrap();

        assert!(wizard.visible_interests().is_empty());
        assert_eq!(wizard.current_interest(), None);
        // no card to decide on, no auto-advance
        assert_eq!(wizard.like(), Ok(Step::Interests));
        assert!(wizard.request().selected_interests().is_empty());
        assert_eq!(wizard.next(), Ok(Step::CustomInterests));
    }

    #[test]
    fn test_age_change_resets_interest_progress() {
        let mut wizard = wizard();
        wizard.set_child_name("Alex").unwrap();
        wizard.next().unwrap();
        wizard.like().unwrap();
        wizard.like().unwrap();
        assert_eq!(wizard.interest_cursor(), 2);

        // back on details, as after a fresh wizard with the same progress
        wizard.step = Step::Details;
        wizard.set_child_age(5).unwrap();
        assert_eq!(wizard.interest_cursor(), 0);
        assert!(wizard.request().selected_interests().is_empty());

        wizard.set_child_age(9).unwrap();
        assert_eq!(wizard.request().child_age(), 9);
        assert_eq!(wizard.interest_cursor(), 0);
    }

    #[test]
    fn test_age_out_of_range_is_refused() {
        let mut wizard = wizard();
        assert_eq!(
            wizard.set_child_age(13),
            Err(ValidationError::AgeOutOfRange(13))
        );
        assert_eq!(wizard.set_child_age(2), Err(ValidationError::AgeOutOfRange(2)));
        assert_eq!(wizard.request().child_age(), 5);
    }

    #[test]
    fn test_wrong_step_is_refused_without_message() {
        let mut wizard = wizard();
        assert_eq!(
            wizard.toggle_topic("Science"),
            Err(ValidationError::WrongStep {
                expected: Step::Topics,
                actual: Step::Details
            })
        );
        assert!(wizard.like().is_err());
        assert!(wizard.submit().is_err());
        assert_eq!(wizard.error(), None);
        assert_eq!(wizard.step(), Step::Details);
    }

    #[test]
    fn test_custom_interests_are_optional_and_capped() {
        let mut wizard = SetupWizard::new(small_catalog(vec![]), "en-US");
        wizard.set_child_name("Alex").unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.step(), Step::CustomInterests);

        for entry in ["Bluey", "Piano", "Lego", "Trains", "Frogs"] {
            wizard.add_custom_interest(entry).unwrap();
        }
        assert!(wizard.add_custom_interest("Kites").is_err());
        assert_eq!(wizard.error(), Some("You can add up to 5 entries."));
        assert_eq!(wizard.request().custom_interests().len(), 5);

        assert_eq!(wizard.remove_custom_interest("Lego"), Ok(true));
        assert_eq!(wizard.remove_custom_interest("Lego"), Ok(false));
        assert_eq!(wizard.next(), Ok(Step::Topics));
    }

    #[test]
    fn test_successful_edit_clears_message() {
        let mut wizard = SetupWizard::new(small_catalog(vec![]), "en-US");
        wizard.set_child_name("Alex").unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();

        assert!(wizard.add_custom_interest("   ").is_err());
        assert_eq!(wizard.error(), Some("Please type something first."));
        wizard.add_custom_interest("Lego").unwrap();
        assert_eq!(wizard.error(), None);

        assert!(wizard.add_custom_interest("Lego").is_err());
        assert_eq!(wizard.remove_custom_interest("Lego"), Ok(true));
        assert_eq!(wizard.error(), None);

        assert_eq!(wizard.next(), Ok(Step::Topics));
        assert!(wizard.toggle_topic("Astrology").is_err());
        assert!(wizard.error().is_some());
        assert_eq!(wizard.toggle_topic("Science"), Ok(true));
        assert_eq!(wizard.error(), None);
    }

    #[test]
    fn test_message_does_not_follow_to_next_step() {
        let mut wizard = SetupWizard::new(small_catalog(vec![]), "en-US");
        wizard.set_child_name("Alex").unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();

        assert!(wizard.add_custom_interest("   ").is_err());
        assert!(wizard.error().is_some());
        assert_eq!(wizard.next(), Ok(Step::Topics));
        assert_eq!(wizard.error(), None);
    }

    #[test]
    fn test_language_must_be_in_catalog() {
        let mut wizard = wizard();
        assert_eq!(wizard.set_language("fr-FR"), Ok(()));
        assert_eq!(wizard.request().language(), "fr-FR");

        assert_eq!(
            wizard.set_language(""),
            Err(ValidationError::UnknownLanguage(String::new()))
        );
        assert_eq!(
            wizard.set_language("xx-XX"),
            Err(ValidationError::UnknownLanguage("xx-XX".to_string()))
        );
        assert_eq!(wizard.request().language(), "fr-FR");
        assert_eq!(wizard.error(), Some("\"xx-XX\" is not an available language."));
    }

    #[test]
    fn test_leaving_custom_interests_with_none() {
        let mut wizard = SetupWizard::new(small_catalog(vec![]), "en-US");
        wizard.set_child_name("Alex").unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.next(), Ok(Step::Topics));
    }

    #[test]
    fn test_topics_guard() {
        let mut wizard = wizard_at_topics();
        assert_eq!(wizard.next(), Err(ValidationError::NoTopics));
        assert_eq!(wizard.step(), Step::Topics);
        assert_eq!(
            wizard.error(),
            Some("Please choose at least one topic or add a custom subject.")
        );

        wizard.add_custom_subject("Fractions").unwrap();
        assert_eq!(wizard.next(), Ok(Step::Finalize));
        assert_eq!(wizard.error(), None);
    }

    #[test]
    fn test_toggle_topic() {
        let mut wizard = wizard_at_topics();
        assert_eq!(wizard.toggle_topic("Science"), Ok(true));
        assert_eq!(wizard.toggle_topic("Spelling"), Ok(true));
        assert_eq!(wizard.request().selected_topics(), ["Science", "Spelling"]);
        assert_eq!(wizard.toggle_topic("Science"), Ok(false));
        assert_eq!(wizard.request().selected_topics(), ["Spelling"]);
        assert_eq!(
            wizard.toggle_topic("Astrology"),
            Err(ValidationError::UnknownTopic("Astrology".to_string()))
        );
    }

    #[test]
    fn test_deselecting_every_topic_blocks_finalize() {
        let mut wizard = wizard_at_topics();
        wizard.toggle_topic("Science").unwrap();
        wizard.toggle_topic("Science").unwrap();
        assert_eq!(wizard.next(), Err(ValidationError::NoTopics));
    }

    #[test]
    fn test_submit_defaults_title() {
        let mut wizard = wizard_at_finalize();
        let completed = wizard.submit().unwrap();
        assert_eq!(completed.quiz_title(), "Alex's Quiz");
        assert_eq!(completed.selected_topics(), ["Spelling"]);
        assert_eq!(wizard.step(), Step::Finalize);
    }

    #[test]
    fn test_finalize_settings() {
        let mut wizard = wizard_at_finalize();
        wizard.set_quiz_title("Alex vs. the Robots").unwrap();
        wizard.set_question_count(20).unwrap();
        assert_eq!(
            wizard.set_question_count(4),
            Err(ValidationError::QuestionCountOutOfRange(4))
        );

        let completed = wizard.submit().unwrap();
        assert_eq!(completed.quiz_title(), "Alex vs. the Robots");
        assert_eq!(completed.question_count(), 20);
    }

    #[test]
    fn test_next_on_finalize_does_nothing() {
        let mut wizard = wizard_at_finalize();
        assert_eq!(wizard.next(), Ok(Step::Finalize));
    }

    #[test]
    fn test_report_failure_keeps_input() {
        let mut wizard = wizard_at_finalize();
        wizard.report_failure("Failed to generate the quiz. Please try again.");
        assert_eq!(wizard.step(), Step::Finalize);
        assert_eq!(
            wizard.error(),
            Some("Failed to generate the quiz. Please try again.")
        );
        assert_eq!(wizard.request().child_name(), "Alex");
        wizard.dismiss_error();
        assert_eq!(wizard.error(), None);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut wizard = wizard_at_topics();
        let at_topics = wizard.progress();
        wizard.toggle_topic("Science").unwrap();
        wizard.next().unwrap();
        assert!(wizard.progress() > at_topics);
        assert!((wizard.progress() - 5.0 / 6.0).abs() < f64::EPSILON);
        assert!((SetupWizard::new(small_catalog(vec![]), "en-US").progress() - 1.0 / 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_view_shows_current_card_only_on_interests() {
        let mut wizard = wizard();
        assert!(wizard.view().current_interest.is_none());
        wizard.set_child_name("Alex").unwrap();
        wizard.next().unwrap();
        let view = wizard.view();
        assert_eq!(view.step, Step::Interests);
        assert_eq!(
            view.current_interest.map(|i| i.id),
            Some("dinosaurs".to_string())
        );
        let json = serde_json::to_string(&wizard.view()).unwrap();
        assert!(json.contains("\"step\":\"interests\""));
        assert!(!json.contains("\"error\""));
    }
}
