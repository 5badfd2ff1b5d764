use omr_core::model::{
    AnswerMap, AnswerZone, ChoiceCount, ChoiceLabel, Mode, QuestionNumber, SheetSession, Toggle,
};
use omr_core::{Report, parse_question_numbers};
use storage::repository::StorageError;
use storage::{ConfigRecord, SheetField, SheetRepository};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::sheet_view::SheetSnapshot;

struct SheetState {
    session: SheetSession,
    draft: ConfigRecord,
}

impl Default for SheetState {
    fn default() -> Self {
        Self {
            session: SheetSession::new(),
            draft: ConfigRecord::cleared(),
        }
    }
}

/// Owns the bubble-sheet session and is the only writer to its persisted entries.
///
/// Commands hold the state lock for their whole duration, persistence
/// included, so each one is atomic with respect to the others. After a
/// command the caller re-reads [`SheetService::snapshot`] to redraw.
pub struct SheetService {
    repo: SheetRepository,
    state: Mutex<SheetState>,
}

impl SheetService {
    /// A service holding the empty default session. Call [`Self::restore`] to
    /// load persisted state.
    #[must_use]
    pub fn new(repo: SheetRepository) -> Self {
        Self {
            repo,
            state: Mutex::new(SheetState::default()),
        }
    }

    /// Rebuild the session from storage.
    ///
    /// Never fails: every unreadable entry degrades to its default, corrupt
    /// entries are removed, and each recovery is logged.
    pub async fn restore(&self) -> SheetSnapshot {
        let mut state = self.state.lock().await;

        let config = self.restore_config().await;
        let questions = parse_question_numbers(&config.questions);
        let choices = restore_choices(&config.choices);
        let user_answers = self.restore_answers(AnswerZone::User).await;
        let correct_answers = self.restore_answers(AnswerZone::Key).await;
        let mode = self.repo.load_mode().await.unwrap_or_else(|err| {
            warn!(%err, "failed to read mode, defaulting to answering");
            Mode::Answering
        });

        let mut session =
            SheetSession::from_persisted(questions, choices, mode, user_answers, correct_answers);

        let results_flag = self.repo.load_results_flag().await.unwrap_or_else(|err| {
            warn!(%err, "failed to read results flag");
            false
        });
        if results_flag {
            if session.mode() == Mode::KeyEntry {
                match session.check() {
                    Ok(_) => info!("restored previous results display"),
                    Err(err) => {
                        warn!(%err, "stored results cannot be shown, clearing flag");
                        self.discard_logged(SheetField::ResultDisplayed).await;
                    }
                }
            } else {
                warn!("results flag set outside key entry, clearing flag");
                self.discard_logged(SheetField::ResultDisplayed).await;
            }
        }

        info!(
            questions = session.questions().len(),
            mode = %session.mode(),
            results = session.results_visible(),
            "restored sheet session"
        );

        state.draft = ConfigRecord::new(config.questions, choices.to_string());
        state.session = session;
        SheetSnapshot::capture(&state.session, &state.draft)
    }

    pub async fn snapshot(&self) -> SheetSnapshot {
        let state = self.state.lock().await;
        SheetSnapshot::capture(&state.session, &state.draft)
    }

    /// Build a new sheet from free-text question numbers.
    ///
    /// Blank input clears the session. Input that yields no valid numbers
    /// also clears it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoValidQuestionNumbers` for non-blank input
    /// without any valid number (after clearing), or `SessionError::Storage`.
    pub async fn generate(
        &self,
        questions_text: &str,
        choices: ChoiceCount,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        let questions = parse_question_numbers(questions_text);

        if questions.is_empty() {
            self.clear_locked(&mut state).await?;
            if questions_text.trim().is_empty() {
                info!("blank question input, sheet cleared");
                return Ok(());
            }
            warn!(input = questions_text, "no valid question numbers, sheet cleared");
            return Err(SessionError::NoValidQuestionNumbers {
                input: questions_text.to_string(),
            });
        }

        info!(questions = questions.len(), %choices, "generating sheet");
        state.session.regenerate(questions, choices);
        state.draft = ConfigRecord::new(questions_text, choices.to_string());

        let empty = AnswerMap::new();
        self.repo.save_answers(AnswerZone::User, &empty).await?;
        self.repo.save_answers(AnswerZone::Key, &empty).await?;
        self.repo.save_config(&state.draft).await?;
        self.repo.save_mode(Mode::Answering).await?;
        self.repo.save_results_flag(false).await?;
        Ok(())
    }

    /// Toggle a bubble in the user or key zone.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Rejected` when the click is not allowed in the
    /// current state (nothing changes), or `SessionError::Storage`.
    pub async fn select(
        &self,
        zone: AnswerZone,
        question: QuestionNumber,
        label: ChoiceLabel,
    ) -> Result<Toggle, SessionError> {
        let mut state = self.state.lock().await;
        let selection = state
            .session
            .select(zone, question, label)
            .inspect_err(|err| debug!(%err, "bubble click ignored"))?;

        if selection.results_cleared {
            self.repo.save_results_flag(false).await?;
        }
        self.repo
            .save_answers(zone, state.session.answers(zone))
            .await?;
        debug!(?zone, %question, %label, toggle = ?selection.toggle, "bubble toggled");
        Ok(selection.toggle)
    }

    /// Lock the user's answers and switch to key entry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Rejected` outside answering mode or on an empty
    /// sheet, or `SessionError::Storage`.
    pub async fn advance(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        state.session.advance()?;
        self.repo.save_mode(Mode::KeyEntry).await?;
        info!(
            skipped = state.session.skipped().len(),
            "entered key entry"
        );
        Ok(())
    }

    /// Go back from key entry to editing the user's answers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Rejected` outside key entry, or `SessionError::Storage`.
    pub async fn edit(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        state.session.edit()?;
        self.repo.save_results_flag(false).await?;
        self.repo.save_mode(Mode::Answering).await?;
        info!("returned to answering");
        Ok(())
    }

    /// Reset everything to defaults, in memory and in storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the cleared state cannot be written.
    pub async fn clear_all(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        self.clear_locked(&mut state).await
    }

    /// Score the sheet and mark the results as displayed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoKeyEntered` when no key was entered and
    /// `SessionError::Rejected` outside key entry; both leave state unchanged.
    pub async fn check_answers(&self) -> Result<Report, SessionError> {
        let mut state = self.state.lock().await;
        let report = state.session.check()?;
        if state.session.results_visible() {
            self.repo.save_results_flag(true).await?;
        }
        info!(
            correct = report.correct(),
            attempted = report.attempted(),
            total = report.total(),
            "answers checked"
        );
        Ok(report)
    }

    /// Persist the raw control values while no sheet is generated.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DraftLocked` while a sheet exists, or `SessionError::Storage`.
    pub async fn update_draft(
        &self,
        questions_text: &str,
        choices_text: &str,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if !state.session.questions().is_empty() {
            return Err(SessionError::DraftLocked);
        }
        state.draft = ConfigRecord::new(questions_text, choices_text);
        self.repo.save_config(&state.draft).await?;
        Ok(())
    }

    async fn clear_locked(&self, state: &mut SheetState) -> Result<(), SessionError> {
        state.session.reset();
        state.draft = ConfigRecord::cleared();

        let empty = AnswerMap::new();
        self.repo.save_answers(AnswerZone::User, &empty).await?;
        self.repo.save_answers(AnswerZone::Key, &empty).await?;
        self.repo.discard(SheetField::ResultDisplayed).await?;
        self.repo.discard(SheetField::AppState).await?;
        self.repo.save_config(&state.draft).await?;
        info!("sheet cleared");
        Ok(())
    }

    async fn restore_config(&self) -> ConfigRecord {
        match self.repo.load_config().await {
            Ok(Some(config)) => config,
            Ok(None) => ConfigRecord::cleared(),
            Err(err @ StorageError::Serialization(_)) => {
                warn!(%err, "discarding corrupt sheet config");
                self.discard_logged(SheetField::Config).await;
                ConfigRecord::cleared()
            }
            Err(err) => {
                warn!(%err, "failed to read sheet config");
                ConfigRecord::cleared()
            }
        }
    }

    async fn restore_answers(&self, zone: AnswerZone) -> AnswerMap {
        match self.repo.load_answers(zone).await {
            Ok(answers) => answers.unwrap_or_default(),
            Err(err @ StorageError::Serialization(_)) => {
                warn!(%err, ?zone, "discarding corrupt answer map");
                self.discard_logged(storage::sheet::answers_field(zone)).await;
                AnswerMap::new()
            }
            Err(err) => {
                warn!(%err, ?zone, "failed to read answer map");
                AnswerMap::new()
            }
        }
    }

    async fn discard_logged(&self, field: SheetField) {
        if let Err(err) = self.repo.discard(field).await {
            warn!(%err, %field, "failed to remove stored entry");
        }
    }
}

fn restore_choices(raw: &str) -> ChoiceCount {
    if raw.trim().is_empty() {
        return ChoiceCount::DEFAULT;
    }
    raw.parse().unwrap_or_else(|err| {
        warn!(%err, "invalid stored choice count, using default");
        ChoiceCount::DEFAULT
    })
}
