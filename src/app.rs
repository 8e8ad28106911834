//! Application orchestrator
//!
//! [`App`] owns the current screen and moves between them: it creates setup
//! wizards and play sessions, hands submitted requests to the quiz
//! generator and performs the save, load, share and identity side effects
//! through the collaborator traits. Each wizard and play session belongs to
//! exactly one screen and is dropped when the screen is left.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    ViewMessage,
    catalog::Catalog,
    config::Config,
    generator::{GenerationError, QuizGenerator, check_contract, generate_checked},
    identity::Identity,
    quiz::{
        FinalScore, Question, QuestionSet, QuizPlayer,
        player::{Advance, Selection},
    },
    setup::{CompletedRequest, SetupWizard, ValidationError},
    storage::{NewQuiz, QuizId, QuizStore, SavedQuiz, StorageError},
};

/// Errors returned by [`App`] operations
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The setup wizard refused the request
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The generated quiz could not be used
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// The quiz store failed
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The action needs a signed-in parent
    #[error("Please sign in to save quizzes.")]
    SignInRequired,
    /// No saved quiz has this id
    #[error("Quiz not found or has been deleted.")]
    QuizNotFound(QuizId),
    /// The quiz on screen was saved already
    #[error("This quiz is already on your dashboard.")]
    AlreadySaved,
    /// The action does not apply to the current screen
    #[error("this action is not available on the {0} screen")]
    InvalidState(ScreenKind),
}

/// The screens of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreenKind {
    /// Start page
    Landing,
    /// Saved quizzes of the signed-in parent
    Dashboard,
    /// The setup wizard
    Setup,
    /// Waiting for the quiz generator
    Generating,
    /// Playing a generated or saved quiz
    Quiz,
    /// Final score of the last play
    Summary,
    /// Playing a quiz opened from a share link
    SharedQuiz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Generated,
    Saved,
    Shared,
}

/// A quiz being played, with what is needed to save or replay it
#[derive(Debug, Clone)]
struct Play {
    title: String,
    child_name: String,
    player: QuizPlayer,
    origin: Origin,
    saved_as: Option<QuizId>,
}

impl Play {
    fn generated(request: &CompletedRequest, questions: QuestionSet) -> Self {
        Self {
            title: request.quiz_title().to_owned(),
            child_name: request.child_name().to_owned(),
            player: QuizPlayer::new(questions),
            origin: Origin::Generated,
            saved_as: None,
        }
    }

    fn stored(quiz: SavedQuiz, origin: Origin) -> Self {
        Self {
            title: quiz.title,
            child_name: quiz.child_name,
            player: QuizPlayer::new(quiz.questions),
            origin,
            saved_as: Some(quiz.id),
        }
    }

    fn replay(self) -> Self {
        Self {
            player: QuizPlayer::new(self.player.questions().clone()),
            ..self
        }
    }

    fn final_score(&self) -> FinalScore {
        self.player.final_score().unwrap_or(FinalScore {
            score: self.player.score(),
            total: self.player.questions().len(),
        })
    }
}

#[derive(Debug, Clone, Default)]
enum Screen {
    #[default]
    Landing,
    Dashboard(Vec<SavedQuiz>),
    Setup(SetupWizard),
    Generating {
        wizard: SetupWizard,
        request: CompletedRequest,
    },
    Quiz(Play),
    Summary(Play),
    SharedQuiz(Play),
}

impl Screen {
    fn kind(&self) -> ScreenKind {
        match self {
            Self::Landing => ScreenKind::Landing,
            Self::Dashboard(_) => ScreenKind::Dashboard,
            Self::Setup(_) => ScreenKind::Setup,
            Self::Generating { .. } => ScreenKind::Generating,
            Self::Quiz(_) => ScreenKind::Quiz,
            Self::Summary(_) => ScreenKind::Summary,
            Self::SharedQuiz(_) => ScreenKind::SharedQuiz,
        }
    }
}

/// Start page
#[derive(Debug, Clone, Serialize)]
pub struct LandingView {
    /// Whether a parent is signed in
    pub signed_in: bool,
}

/// Saved quizzes, newest first
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// The quizzes of the signed-in parent
    pub quizzes: Vec<SavedQuiz>,
}

/// Shown while the generator works
#[derive(Debug, Clone, Serialize)]
pub struct GeneratingView {
    /// Child the quiz is for
    pub child_name: String,
    /// Title of the quiz being generated
    pub title: String,
}

/// Final score of a play
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    /// Quiz title
    pub title: String,
    /// Correct answers
    pub score: usize,
    /// Number of questions
    pub total: usize,
    /// Share of correct answers in whole percent
    pub percentage: u32,
    /// Headline for the score
    pub praise: String,
    /// Whether a save button should be offered
    pub can_save: bool,
    /// Whether the quiz came from a share link
    pub shared: bool,
}

/// A shared quiz in progress
#[derive(Debug, Clone, Serialize)]
pub struct SharedQuizView {
    /// Quiz title
    pub title: String,
    /// Child the quiz was made for
    pub child_name: String,
    /// The current question
    pub question: crate::quiz::player::View,
}

/// Information shown on every screen
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct Header {
    /// Display name of the signed-in parent
    pub user: Option<String>,
    /// One-off message such as a save confirmation
    pub notice: Option<String>,
}

/// Reads the shared quiz id from a URL query string like `?quizId=...`
pub fn quiz_id_from_query(query: &str) -> Option<QuizId> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "quizId")
        .and_then(|(_, value)| value.parse().ok())
}

/// The application state machine
#[derive(Debug, Clone)]
pub struct App {
    config: Config,
    catalog: Arc<Catalog>,
    identity: Option<Identity>,
    screen: Screen,
    notice: Option<String>,
}

impl App {
    /// Creates the application on the landing screen
    ///
    /// # Arguments
    ///
    /// * `config` - Catalogs and default locale
    /// * `identity` - Parent signed in at startup, usually
    ///   [`crate::identity::IdentityProvider::current`]
    pub fn new(config: Config, identity: Option<Identity>) -> Self {
        let catalog = config.shared_catalog();
        Self {
            config,
            catalog,
            identity,
            screen: Screen::Landing,
            notice: None,
        }
    }

    /// The current screen
    pub fn screen(&self) -> ScreenKind {
        self.screen.kind()
    }

    /// The configuration the application was started with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The signed-in parent
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The current one-off message
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Hides the current one-off message
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// The wizard of the setup or generating screen
    pub fn wizard(&self) -> Option<&SetupWizard> {
        match &self.screen {
            Screen::Setup(wizard) | Screen::Generating { wizard, .. } => Some(wizard),
            _ => None,
        }
    }

    /// The wizard on the setup screen, for step operations
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` on any other screen.
    pub fn wizard_mut(&mut self) -> Result<&mut SetupWizard, Error> {
        match &mut self.screen {
            Screen::Setup(wizard) => Ok(wizard),
            other => Err(Error::InvalidState(other.kind())),
        }
    }

    /// The play session of the quiz, shared quiz or summary screen
    pub fn player(&self) -> Option<&QuizPlayer> {
        match &self.screen {
            Screen::Quiz(play) | Screen::SharedQuiz(play) | Screen::Summary(play) => {
                Some(&play.player)
            }
            _ => None,
        }
    }

    fn set_screen(&mut self, screen: Screen) {
        debug!(screen = %screen.kind(), "screen changed");
        self.screen = screen;
    }

    fn restore(&mut self, screen: Screen) -> Error {
        let kind = screen.kind();
        self.screen = screen;
        Error::InvalidState(kind)
    }

    fn leave_for(&mut self, screen: Screen) -> Result<(), Error> {
        if let Screen::Generating { .. } = self.screen {
            return Err(Error::InvalidState(ScreenKind::Generating));
        }
        self.set_screen(screen);
        Ok(())
    }

    fn fresh_wizard(&self) -> SetupWizard {
        SetupWizard::new(
            Arc::clone(&self.catalog),
            self.config.default_language.clone(),
        )
    }

    /// Opens a fresh setup wizard
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` while a quiz is being generated.
    pub fn start_setup(&mut self) -> Result<(), Error> {
        let wizard = self.fresh_wizard();
        self.leave_for(Screen::Setup(wizard))
    }

    /// Returns to the landing screen
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` while a quiz is being generated.
    pub fn go_home(&mut self) -> Result<(), Error> {
        self.leave_for(Screen::Landing)
    }

    /// Submits the wizard and waits for the generator
    ///
    /// The returned request is what the host passes to its generator; the
    /// result comes back through [`App::receive_generation`].
    ///
    /// # Errors
    ///
    /// * `Error::InvalidState` - not on the setup screen
    /// * `Error::Validation` - the wizard refused to submit
    pub fn submit(&mut self) -> Result<CompletedRequest, Error> {
        match std::mem::take(&mut self.screen) {
            Screen::Setup(mut wizard) => match wizard.submit() {
                Ok(request) => {
                    self.set_screen(Screen::Generating {
                        wizard,
                        request: request.clone(),
                    });
                    Ok(request)
                }
                Err(error) => {
                    self.screen = Screen::Setup(wizard);
                    Err(error.into())
                }
            },
            other => Err(self.restore(other)),
        }
    }

    /// Delivers the generator's answer
    ///
    /// A usable quiz starts playing. Anything else returns to the wizard's
    /// finalize step with the failure shown and the input kept.
    ///
    /// # Returns
    ///
    /// The screen the application moved to
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` if no generation is pending.
    pub fn receive_generation(
        &mut self,
        result: Result<Vec<Question>, GenerationError>,
    ) -> Result<ScreenKind, Error> {
        self.resolve_generation(|request| {
            result.and_then(|questions| check_contract(request, questions))
        })
    }

    /// Submits the wizard and runs `generator` synchronously
    ///
    /// # Errors
    ///
    /// Same as [`App::submit`]; generation failures return to the wizard.
    pub fn generate_with<G: QuizGenerator + ?Sized>(
        &mut self,
        generator: &G,
    ) -> Result<ScreenKind, Error> {
        self.submit()?;
        self.resolve_generation(|request| generate_checked(generator, request))
    }

    fn resolve_generation(
        &mut self,
        outcome: impl FnOnce(&CompletedRequest) -> Result<QuestionSet, GenerationError>,
    ) -> Result<ScreenKind, Error> {
        let (mut wizard, request) = match std::mem::take(&mut self.screen) {
            Screen::Generating { wizard, request } => (wizard, request),
            other => return Err(self.restore(other)),
        };

        match outcome(&request) {
            Ok(questions) => {
                info!(
                    title = request.quiz_title(),
                    questions = questions.len(),
                    "quiz ready to play"
                );
                self.set_screen(Screen::Quiz(Play::generated(&request, questions)));
            }
            Err(error) => {
                warn!(%error, "generation failed, back to setup");
                wizard.report_failure(&error);
                self.set_screen(Screen::Setup(wizard));
            }
        }
        Ok(self.screen())
    }

    /// Answers the current question
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` unless a quiz is being played.
    pub fn select_answer(&mut self, option: usize) -> Result<Selection, Error> {
        match &mut self.screen {
            Screen::Quiz(play) | Screen::SharedQuiz(play) => Ok(play.player.select_answer(option)),
            other => Err(Error::InvalidState(other.kind())),
        }
    }

    /// Moves past the answered question; the last one leads to the summary
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` unless a quiz is being played.
    pub fn advance(&mut self) -> Result<Advance, Error> {
        let outcome = match &mut self.screen {
            Screen::Quiz(play) | Screen::SharedQuiz(play) => play.player.advance(),
            other => return Err(Error::InvalidState(other.kind())),
        };

        if let Advance::Complete(_) = outcome {
            let screen = match std::mem::take(&mut self.screen) {
                Screen::Quiz(play) | Screen::SharedQuiz(play) => Screen::Summary(play),
                other => other,
            };
            self.set_screen(screen);
        }
        Ok(outcome)
    }

    /// Leaves the summary for another round
    ///
    /// A shared quiz is replayed from the start; otherwise a fresh wizard
    /// opens.
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` outside of the summary screen.
    pub fn play_again(&mut self) -> Result<ScreenKind, Error> {
        match std::mem::take(&mut self.screen) {
            Screen::Summary(play) if play.origin == Origin::Shared => {
                self.set_screen(Screen::SharedQuiz(play.replay()));
            }
            Screen::Summary(_) => {
                let wizard = self.fresh_wizard();
                self.set_screen(Screen::Setup(wizard));
            }
            other => return Err(self.restore(other)),
        }
        Ok(self.screen())
    }

    /// Saves the quiz on the summary screen to the parent's dashboard
    ///
    /// The score of the finished play is stored with it.
    ///
    /// # Errors
    ///
    /// * `Error::SignInRequired` - nobody is signed in
    /// * `Error::InvalidState` - not on the summary screen, or a shared quiz
    /// * `Error::AlreadySaved` - the quiz is already stored
    /// * `Error::Storage` - the store failed
    pub fn save_quiz<S: QuizStore + ?Sized>(&mut self, store: &mut S) -> Result<SavedQuiz, Error> {
        let Some(owner_id) = self.identity.as_ref().map(|i| i.id.clone()) else {
            self.notice = Some(Error::SignInRequired.to_string());
            return Err(Error::SignInRequired);
        };
        let kind = self.screen.kind();
        let Screen::Summary(play) = &mut self.screen else {
            return Err(Error::InvalidState(kind));
        };
        if play.origin == Origin::Shared {
            return Err(Error::InvalidState(kind));
        }
        if play.saved_as.is_some() {
            return Err(Error::AlreadySaved);
        }

        let quiz = NewQuiz {
            owner_id,
            title: play.title.clone(),
            child_name: play.child_name.clone(),
            questions: play.player.questions().clone(),
            last_score: Some(play.final_score().score),
        };
        match store.save(quiz) {
            Ok(saved) => {
                play.saved_as = Some(saved.id);
                self.notice = Some("Quiz Saved to Dashboard!".to_owned());
                Ok(saved)
            }
            Err(error) => {
                warn!(%error, "saving quiz failed");
                self.notice = Some(format!("Failed to save quiz: {error}"));
                Err(error.into())
            }
        }
    }

    /// Shows the signed-in parent's saved quizzes
    ///
    /// # Errors
    ///
    /// * `Error::SignInRequired` - nobody is signed in
    /// * `Error::InvalidState` - a quiz is being generated
    /// * `Error::Storage` - the store failed
    pub fn open_dashboard<S: QuizStore + ?Sized>(&mut self, store: &S) -> Result<(), Error> {
        let Some(owner) = self.identity.as_ref().map(|i| i.id.clone()) else {
            return Err(Error::SignInRequired);
        };
        if let Screen::Generating { .. } = self.screen {
            return Err(Error::InvalidState(ScreenKind::Generating));
        }
        let quizzes = store.list_by_owner(&owner).inspect_err(|error| {
            warn!(%error, "loading dashboard failed");
        })?;
        self.leave_for(Screen::Dashboard(quizzes))
    }

    /// Plays a quiz from the dashboard
    ///
    /// # Errors
    ///
    /// * `Error::InvalidState` - not on the dashboard
    /// * `Error::QuizNotFound` - no quiz has this id
    /// * `Error::Storage` - the store failed
    pub fn play_saved<S: QuizStore + ?Sized>(&mut self, id: QuizId, store: &S) -> Result<(), Error> {
        let Screen::Dashboard(_) = self.screen else {
            return Err(Error::InvalidState(self.screen.kind()));
        };
        let quiz = store.get(id)?.ok_or(Error::QuizNotFound(id))?;
        self.set_screen(Screen::Quiz(Play::stored(quiz, Origin::Saved)));
        Ok(())
    }

    /// Opens a quiz from a share link
    ///
    /// Shared quizzes are played without the save option. Works from any
    /// screen except while generating.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidState` - a quiz is being generated
    /// * `Error::QuizNotFound` - no quiz has this id; the screen is kept
    /// * `Error::Storage` - the store failed
    pub fn open_shared<S: QuizStore + ?Sized>(&mut self, id: QuizId, store: &S) -> Result<(), Error> {
        if let Screen::Generating { .. } = self.screen {
            return Err(Error::InvalidState(ScreenKind::Generating));
        }
        let Some(quiz) = store.get(id)? else {
            let error = Error::QuizNotFound(id);
            self.notice = Some(error.to_string());
            return Err(error);
        };
        info!(%id, "opening shared quiz");
        self.leave_for(Screen::SharedQuiz(Play::stored(quiz, Origin::Shared)))
    }

    /// Applies an identity change reported by the identity provider
    ///
    /// Signing out returns to the landing screen, whatever is on screen.
    pub fn set_identity(&mut self, identity: Option<Identity>) {
        let signed_out = self.identity.is_some() && identity.is_none();
        self.identity = identity;
        if signed_out {
            self.notice = None;
            self.set_screen(Screen::Landing);
        }
    }

    /// Menu line and one-off message
    pub fn header(&self) -> Header {
        Header {
            user: self.identity.as_ref().map(|i| i.display_name.clone()),
            notice: self.notice.clone(),
        }
    }

    fn summary_view(&self, play: &Play) -> SummaryView {
        let score = play.final_score();
        SummaryView {
            title: play.title.clone(),
            score: score.score,
            total: score.total,
            percentage: score.percentage(),
            praise: score.praise().to_string(),
            can_save: play.origin == Origin::Generated && play.saved_as.is_none(),
            shared: play.origin == Origin::Shared,
        }
    }

    /// Snapshot of the current screen for a front end
    pub fn view(&self) -> ViewMessage {
        match &self.screen {
            Screen::Landing => LandingView {
                signed_in: self.identity.is_some(),
            }
            .into(),
            Screen::Dashboard(quizzes) => DashboardView {
                quizzes: quizzes.clone(),
            }
            .into(),
            Screen::Setup(wizard) => wizard.view().into(),
            Screen::Generating { request, .. } => GeneratingView {
                child_name: request.child_name().to_owned(),
                title: request.quiz_title().to_owned(),
            }
            .into(),
            Screen::Quiz(play) => play
                .player
                .view()
                .map_or_else(|| self.summary_view(play).into(), Into::into),
            Screen::SharedQuiz(play) => match play.player.view() {
                Some(question) => SharedQuizView {
                    title: play.title.clone(),
                    child_name: play.child_name.clone(),
                    question,
                }
                .into(),
                None => self.summary_view(play).into(),
            },
            Screen::Summary(play) => self.summary_view(play).into(),
        }
    }
}
