use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::answers::{AnswerMap, AnswerZone, Toggle};
use crate::model::choice::{ChoiceCount, ChoiceLabel};
use crate::model::mode::Mode;
use crate::model::question::{QuestionNumber, QuestionSet};
use crate::scoring::{NoKeyEnteredError, Report, score};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// A command that the current state does not accept. The session is unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommandRejected {
    #[error("{zone:?} bubbles are locked while in {mode} mode")]
    WrongZone { zone: AnswerZone, mode: Mode },

    #[error("command requires {expected} mode, sheet is in {actual} mode")]
    WrongMode { expected: Mode, actual: Mode },

    #[error("question {0} was skipped and cannot take a key")]
    SkippedQuestion(QuestionNumber),

    #[error("question {0} is not on the sheet")]
    UnknownQuestion(QuestionNumber),

    #[error("label {label} is outside the {choices} available choices")]
    LabelOutOfRange { label: ChoiceLabel, choices: ChoiceCount },

    #[error("the sheet has no questions")]
    NoQuestions,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CheckError {
    #[error(transparent)]
    Rejected(#[from] CommandRejected),
    #[error(transparent)]
    NoKeyEntered(#[from] NoKeyEnteredError),
}

/// What an accepted bubble click did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub toggle: Toggle,
    /// The click hid a previously displayed report.
    pub results_cleared: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// The whole bubble-sheet state. Every mutation goes through a command method
/// so the mode/flag invariants hold after each call:
///
/// - `KeyEntry` only with a non-empty question set;
/// - results only visible in `KeyEntry`;
/// - stored labels fit the choice count at the time they were stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetSession {
    questions: QuestionSet,
    choices: ChoiceCount,
    mode: Mode,
    user_answers: AnswerMap,
    correct_answers: AnswerMap,
    results_visible: bool,
    skipped: BTreeSet<QuestionNumber>,
    report: Option<Report>,
}

impl SheetSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from persisted parts. A persisted `KeyEntry` mode is
    /// only honoured when there are questions; results start hidden.
    #[must_use]
    pub fn from_persisted(
        questions: QuestionSet,
        choices: ChoiceCount,
        mode: Mode,
        user_answers: AnswerMap,
        correct_answers: AnswerMap,
    ) -> Self {
        let mut session = Self {
            questions,
            choices,
            mode: Mode::Answering,
            user_answers,
            correct_answers,
            ..Self::default()
        };
        if mode == Mode::KeyEntry && !session.questions.is_empty() {
            session.enter_key_entry();
        }
        session
    }

    /// Replace the sheet layout and start over in `Answering` mode.
    pub fn regenerate(&mut self, questions: QuestionSet, choices: ChoiceCount) {
        *self = Self {
            questions,
            choices,
            ..Self::default()
        };
    }

    /// Back to the empty default session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Toggle `label` for `question` in `zone`.
    ///
    /// # Errors
    ///
    /// Returns `CommandRejected` when the zone is locked in the current mode,
    /// the question is skipped or unknown, or the label is out of range.
    pub fn select(
        &mut self,
        zone: AnswerZone,
        question: QuestionNumber,
        label: ChoiceLabel,
    ) -> Result<Selection, CommandRejected> {
        let writable = match zone {
            AnswerZone::User => self.mode == Mode::Answering,
            AnswerZone::Key => self.mode == Mode::KeyEntry,
        };
        if !writable {
            return Err(CommandRejected::WrongZone {
                zone,
                mode: self.mode,
            });
        }
        if !self.questions.contains(question) {
            return Err(CommandRejected::UnknownQuestion(question));
        }
        if zone == AnswerZone::Key && self.skipped.contains(&question) {
            return Err(CommandRejected::SkippedQuestion(question));
        }
        if !self.choices.allows(label) {
            return Err(CommandRejected::LabelOutOfRange {
                label,
                choices: self.choices,
            });
        }

        let results_cleared = self.hide_results();
        let map = match zone {
            AnswerZone::User => &mut self.user_answers,
            AnswerZone::Key => &mut self.correct_answers,
        };
        Ok(Selection {
            toggle: map.toggle(question, label),
            results_cleared,
        })
    }

    /// `Answering` → `KeyEntry`; unanswered questions become skipped.
    ///
    /// # Errors
    ///
    /// Returns `CommandRejected` outside `Answering` or on an empty sheet.
    pub fn advance(&mut self) -> Result<(), CommandRejected> {
        self.require_mode(Mode::Answering)?;
        if self.questions.is_empty() {
            return Err(CommandRejected::NoQuestions);
        }
        self.enter_key_entry();
        Ok(())
    }

    /// `KeyEntry` → `Answering`.
    ///
    /// # Errors
    ///
    /// Returns `CommandRejected::WrongMode` outside `KeyEntry`.
    pub fn edit(&mut self) -> Result<(), CommandRejected> {
        self.require_mode(Mode::KeyEntry)?;
        self.mode = Mode::Answering;
        self.skipped.clear();
        self.hide_results();
        Ok(())
    }

    /// Score the sheet and display the report.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::Rejected` outside `KeyEntry` and
    /// `CheckError::NoKeyEntered` when no key was entered. Both leave the
    /// session untouched.
    pub fn check(&mut self) -> Result<Report, CheckError> {
        self.require_mode(Mode::KeyEntry)?;
        let report = score(&self.questions, &self.user_answers, &self.correct_answers)?;
        if report.is_empty() {
            self.hide_results();
        } else {
            self.results_visible = true;
            self.report = Some(report.clone());
        }
        Ok(report)
    }

    /// Hide the report and its row markings. Returns whether it was shown.
    pub fn hide_results(&mut self) -> bool {
        self.report = None;
        std::mem::replace(&mut self.results_visible, false)
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn choices(&self) -> ChoiceCount {
        self.choices
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn answers(&self, zone: AnswerZone) -> &AnswerMap {
        match zone {
            AnswerZone::User => &self.user_answers,
            AnswerZone::Key => &self.correct_answers,
        }
    }

    #[must_use]
    pub fn user_answers(&self) -> &AnswerMap {
        &self.user_answers
    }

    #[must_use]
    pub fn correct_answers(&self) -> &AnswerMap {
        &self.correct_answers
    }

    #[must_use]
    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    #[must_use]
    pub fn skipped(&self) -> &BTreeSet<QuestionNumber> {
        &self.skipped
    }

    #[must_use]
    pub fn is_skipped(&self, question: QuestionNumber) -> bool {
        self.skipped.contains(&question)
    }

    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    fn require_mode(&self, expected: Mode) -> Result<(), CommandRejected> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(CommandRejected::WrongMode {
                expected,
                actual: self.mode,
            })
        }
    }

    fn enter_key_entry(&mut self) {
        self.mode = Mode::KeyEntry;
        self.skipped = self
            .questions
            .iter()
            .filter(|q| !self.user_answers.contains(*q))
            .collect();
        self.hide_results();
    }
}
