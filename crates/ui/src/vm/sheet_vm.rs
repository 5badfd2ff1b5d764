use omr_core::Annotation;
use omr_core::model::{AnswerZone, ChoiceCount, ChoiceLabel, Mode, QuestionNumber};
use services::{SessionError, SheetService, SheetSnapshot};

use super::report_vm::{ReportVm, map_report};

/// Values offered by the choice-count select.
pub const CHOICE_OPTIONS: std::ops::RangeInclusive<u8> = 2..=10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MainAction {
    Advance,
    Check,
}

/// A bubble click forwarded from a question row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BubbleClick {
    pub zone: AnswerZone,
    pub question: QuestionNumber,
    pub label: ChoiceLabel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetIntent {
    Generate { questions: String, choices: String },
    SaveDraft { questions: String, choices: String },
    Select(BubbleClick),
    Main(MainAction),
    Edit,
    ClearAll,
}

impl SheetIntent {
    /// Whether the control inputs reload from the snapshot draft afterwards.
    #[must_use]
    pub fn resets_controls(&self) -> bool {
        matches!(self, Self::Generate { .. } | Self::ClearAll)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BubbleVm {
    pub label: ChoiceLabel,
    pub selected: bool,
}

impl BubbleVm {
    #[must_use]
    pub fn class(self) -> &'static str {
        if self.selected {
            "option-btn selected"
        } else {
            "option-btn"
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowVm {
    pub question: QuestionNumber,
    pub number_label: String,
    pub class: String,
    pub user_bubbles: Vec<BubbleVm>,
    pub key_bubbles: Vec<BubbleVm>,
    pub user_enabled: bool,
    pub show_key: bool,
    pub key_enabled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SheetVm {
    pub show_controls: bool,
    pub sheet_class: String,
    pub main_action: MainAction,
    pub main_action_label: &'static str,
    pub show_edit: bool,
    pub show_user_heading: bool,
    pub show_key_heading: bool,
    pub rows: Vec<RowVm>,
    pub report: Option<ReportVm>,
}

/// Pure projection of a snapshot into what the sheet page draws.
#[must_use]
pub fn map_sheet(snapshot: &SheetSnapshot) -> SheetVm {
    let has_sheet = snapshot.has_sheet();
    let key_entry = snapshot.mode == Mode::KeyEntry;
    let results = snapshot.results_visible && key_entry;

    let mut sheet_class = String::from("omr-sheet");
    if key_entry {
        sheet_class.push_str(" key-entry-active");
    }
    if results {
        sheet_class.push_str(" show-results");
    }

    let (main_action, main_action_label) = match snapshot.mode {
        Mode::Answering => (MainAction::Advance, "Submit Answers & Enter Key"),
        Mode::KeyEntry => (MainAction::Check, "Check Answers"),
    };

    let rows = snapshot
        .questions
        .iter()
        .map(|question| map_row(snapshot, question, results))
        .collect();

    SheetVm {
        show_controls: !has_sheet,
        sheet_class,
        main_action,
        main_action_label,
        show_edit: has_sheet && key_entry,
        show_user_heading: has_sheet && (results || !key_entry),
        show_key_heading: has_sheet && key_entry,
        rows,
        report: snapshot
            .report
            .as_ref()
            .filter(|_| results)
            .map(map_report),
    }
}

fn map_row(snapshot: &SheetSnapshot, question: QuestionNumber, results: bool) -> RowVm {
    let skipped = snapshot.skipped.contains(&question);
    let key_entry = snapshot.mode == Mode::KeyEntry;

    let mut class = String::from("question-row");
    if skipped {
        class.push_str(" skipped");
    }
    if results {
        match snapshot.report.as_ref().and_then(|r| r.annotation(question)) {
            Some(Annotation::Correct) => class.push_str(" correct"),
            Some(Annotation::Incorrect) => class.push_str(" incorrect"),
            None => {}
        }
    }

    RowVm {
        question,
        number_label: format!("{question}."),
        class,
        user_bubbles: bubbles(snapshot.choices, snapshot.user_answers.get(question)),
        key_bubbles: bubbles(snapshot.choices, snapshot.correct_answers.get(question)),
        user_enabled: !key_entry,
        show_key: key_entry,
        key_enabled: key_entry && !skipped,
    }
}

fn bubbles(choices: ChoiceCount, selected: Option<ChoiceLabel>) -> Vec<BubbleVm> {
    choices
        .labels()
        .map(|label| BubbleVm {
            label,
            selected: selected == Some(label),
        })
        .collect()
}

/// Run one intent against the service.
///
/// # Errors
///
/// Returns the service error; the caller decides whether it becomes a notice.
pub async fn run_intent(service: &SheetService, intent: SheetIntent) -> Result<(), SessionError> {
    match intent {
        SheetIntent::Generate { questions, choices } => {
            let choices = choices.parse::<ChoiceCount>().unwrap_or_default();
            service.generate(&questions, choices).await
        }
        SheetIntent::SaveDraft { questions, choices } => {
            service.update_draft(&questions, &choices).await
        }
        SheetIntent::Select(click) => service
            .select(click.zone, click.question, click.label)
            .await
            .map(|_| ()),
        SheetIntent::Main(MainAction::Advance) => service.advance().await,
        SheetIntent::Main(MainAction::Check) => service.check_answers().await.map(|_| ()),
        SheetIntent::Edit => service.edit().await,
        SheetIntent::ClearAll => service.clear_all().await,
    }
}
