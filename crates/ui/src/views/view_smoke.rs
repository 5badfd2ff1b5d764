use omr_core::model::{AnswerZone, QuestionNumber};
use storage::repository::{InMemoryStore, KeyValueStore};

use super::test_harness::setup_view_harness;
use crate::vm::{BubbleClick, MainAction, SheetIntent, run_intent};

fn q(value: u32) -> QuestionNumber {
    QuestionNumber::new(value).unwrap()
}

#[tokio::test(flavor = "current_thread")]
async fn empty_store_renders_controls() {
    let mut harness = setup_view_harness(InMemoryStore::new()).await;
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Generate Sheet"), "missing generate button in {html}");
    assert!(html.contains("e.g. 1-10, 15, 20-25"), "missing placeholder in {html}");
    assert!(!html.contains("Clear All"), "clear shown without sheet in {html}");
    assert!(!html.contains("Your Answers"), "heading shown without sheet in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn answering_sheet_renders_rows_and_submit() {
    let store = InMemoryStore::with_entries([
        ("omrConfigV2", r#"{"questions":"3-4","choices":"5"}"#),
        ("omrUserAnswersV2", r#"{"4":"E"}"#),
    ]);
    let mut harness = setup_view_harness(store).await;
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("3."), "missing row 3 in {html}");
    assert!(html.contains("4."), "missing row 4 in {html}");
    assert!(html.contains("option-btn selected"), "missing selection in {html}");
    assert!(html.contains("Submit Answers"), "missing submit in {html}");
    assert!(html.contains("Your Answers"), "missing heading in {html}");
    assert!(!html.contains("Correct Key"), "key heading too early in {html}");
    assert!(!html.contains("Edit My Answers"), "edit shown in answering in {html}");
    assert!(html.contains("Clear All"), "missing clear in {html}");
    assert!(!html.contains("Generate Sheet"), "controls shown with sheet in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn key_entry_marks_skipped_rows() {
    let store = InMemoryStore::with_entries([
        ("omrConfigV2", r#"{"questions":"1-2","choices":"4"}"#),
        ("omrUserAnswersV2", r#"{"1":"A"}"#),
        ("omrAppStateV2", "keyEntry"),
    ]);
    let mut harness = setup_view_harness(store).await;
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("key-entry-active"), "missing mode class in {html}");
    assert!(html.contains("question-row skipped"), "missing skipped row in {html}");
    assert!(html.contains("Check Answers"), "missing check button in {html}");
    assert!(html.contains("Edit My Answers"), "missing edit button in {html}");
    assert!(html.contains("Correct Key"), "missing key heading in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn restored_results_render_report() {
    let store = InMemoryStore::with_entries([
        ("omrConfigV2", r#"{"questions":"1-3","choices":"4"}"#),
        ("omrUserAnswersV2", r#"{"1":"A","2":"B","3":"C"}"#),
        ("omrCorrectAnswersV2", r#"{"1":"A","2":"C"}"#),
        ("omrAppStateV2", "keyEntry"),
        ("omrResultDisplayedV2", "true"),
    ]);
    let mut harness = setup_view_harness(store).await;
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("show-results"), "missing results class in {html}");
    assert!(html.contains("question-row correct"), "missing correct row in {html}");
    assert!(html.contains("question-row incorrect"), "missing incorrect row in {html}");
    assert!(html.contains("Score: 1 / 3 (Attempted)"), "missing score in {html}");
    assert!(html.contains("Accuracy (on attempted): 33.3%"), "missing accuracy in {html}");
    assert!(
        html.contains("Answer Key Provided For: 2 / 3 questions"),
        "missing key coverage in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn intents_drive_service_through_a_round() {
    let harness = setup_view_harness(InMemoryStore::new()).await;
    let sheet = &harness.sheet;

    run_intent(
        sheet,
        SheetIntent::Generate {
            questions: "1-2".to_string(),
            choices: "4".to_string(),
        },
    )
    .await
    .unwrap();
    for (zone, question, label) in [
        (AnswerZone::User, 1, "B"),
        (AnswerZone::User, 2, "D"),
    ] {
        run_intent(
            sheet,
            SheetIntent::Select(BubbleClick {
                zone,
                question: q(question),
                label: label.parse().unwrap(),
            }),
        )
        .await
        .unwrap();
    }
    run_intent(sheet, SheetIntent::Main(MainAction::Advance))
        .await
        .unwrap();

    let err = run_intent(sheet, SheetIntent::Main(MainAction::Check))
        .await
        .unwrap_err();
    assert!(!err.is_rejection());

    run_intent(
        sheet,
        SheetIntent::Select(BubbleClick {
            zone: AnswerZone::Key,
            question: q(1),
            label: "B".parse().unwrap(),
        }),
    )
    .await
    .unwrap();
    run_intent(sheet, SheetIntent::Main(MainAction::Check))
        .await
        .unwrap();

    let snapshot = sheet.snapshot().await;
    let report = snapshot.report.expect("report after check");
    assert_eq!(report.correct(), 1);
    assert_eq!(
        harness
            .store
            .get("omrResultDisplayedV2")
            .await
            .unwrap()
            .as_deref(),
        Some("true")
    );

    run_intent(sheet, SheetIntent::ClearAll).await.unwrap();
    assert!(!sheet.snapshot().await.has_sheet());
}

#[tokio::test(flavor = "current_thread")]
async fn rejected_generate_leaves_cleared_controls() {
    let harness = setup_view_harness(InMemoryStore::new()).await;
    let sheet = &harness.sheet;
    let intent = SheetIntent::Generate {
        questions: "abc, 9-2".to_string(),
        choices: "6".to_string(),
    };
    assert!(intent.resets_controls());

    let err = run_intent(sheet, intent).await.unwrap_err();
    assert!(!err.is_rejection());

    let snapshot = sheet.snapshot().await;
    assert!(!snapshot.has_sheet());
    assert_eq!(snapshot.draft.questions, "");
    assert_eq!(snapshot.draft.choices, "4");
    assert!(!SheetIntent::Edit.resets_controls());
}
