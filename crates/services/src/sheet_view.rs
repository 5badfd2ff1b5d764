use std::collections::BTreeSet;

use omr_core::Report;
use omr_core::model::{AnswerMap, ChoiceCount, Mode, QuestionNumber, QuestionSet, SheetSession};
use storage::ConfigRecord;

/// Everything the renderer needs after a command, detached from the service lock.
///
/// Carries state only. Labels and visibility rules live in the UI view model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetSnapshot {
    pub questions: QuestionSet,
    pub choices: ChoiceCount,
    pub mode: Mode,
    pub user_answers: AnswerMap,
    pub correct_answers: AnswerMap,
    pub results_visible: bool,
    pub skipped: BTreeSet<QuestionNumber>,
    pub report: Option<Report>,
    /// Raw control values to prefill the question/choice inputs.
    pub draft: ConfigRecord,
}

impl SheetSnapshot {
    #[must_use]
    pub fn capture(session: &SheetSession, draft: &ConfigRecord) -> Self {
        Self {
            questions: session.questions().clone(),
            choices: session.choices(),
            mode: session.mode(),
            user_answers: session.user_answers().clone(),
            correct_answers: session.correct_answers().clone(),
            results_visible: session.results_visible(),
            skipped: session.skipped().clone(),
            report: session.report().cloned(),
            draft: draft.clone(),
        }
    }

    #[must_use]
    pub fn has_sheet(&self) -> bool {
        !self.questions.is_empty()
    }
}
