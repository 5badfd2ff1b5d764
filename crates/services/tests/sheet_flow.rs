use std::sync::Arc;

use omr_core::Annotation;
use omr_core::model::{
    AnswerZone, ChoiceCount, ChoiceLabel, CommandRejected, Mode, QuestionNumber, Toggle,
};
use services::{SessionError, SheetService, SheetSnapshot};
use storage::repository::{InMemoryStore, KeyValueStore, StorageError};
use storage::{SheetRepository, StorageKeys};

fn q(value: u32) -> QuestionNumber {
    QuestionNumber::new(value).unwrap()
}

fn label(raw: &str) -> ChoiceLabel {
    raw.parse().unwrap()
}

fn four() -> ChoiceCount {
    ChoiceCount::new(4).unwrap()
}

fn service_over(store: &InMemoryStore) -> SheetService {
    SheetService::new(SheetRepository::new(
        Arc::new(store.clone()),
        StorageKeys::default(),
    ))
}

async fn restored(store: &InMemoryStore) -> (SheetService, SheetSnapshot) {
    let service = service_over(store);
    let snapshot = service.restore().await;
    (service, snapshot)
}

fn assert_default(snapshot: &SheetSnapshot) {
    assert!(snapshot.questions.is_empty());
    assert_eq!(snapshot.choices, ChoiceCount::DEFAULT);
    assert_eq!(snapshot.mode, Mode::Answering);
    assert!(snapshot.user_answers.is_empty());
    assert!(snapshot.correct_answers.is_empty());
    assert!(!snapshot.results_visible);
    assert!(snapshot.skipped.is_empty());
    assert!(snapshot.report.is_none());
}

#[tokio::test]
async fn reselecting_a_bubble_clears_the_answer() {
    let store = InMemoryStore::new();
    let (service, _) = restored(&store).await;
    service.generate("1-3", four()).await.unwrap();

    let first = service
        .select(AnswerZone::User, q(2), label("B"))
        .await
        .unwrap();
    let second = service
        .select(AnswerZone::User, q(2), label("B"))
        .await
        .unwrap();

    assert_eq!(first, Toggle::Selected);
    assert_eq!(second, Toggle::Deselected);
    assert_eq!(service.snapshot().await.user_answers.get(q(2)), None);
    assert_eq!(
        store.get("omrUserAnswersV2").await.unwrap().as_deref(),
        Some("{}")
    );
}

#[tokio::test]
async fn skipped_questions_reject_key_entry() {
    let store = InMemoryStore::new();
    let (service, _) = restored(&store).await;
    service.generate("1,2,3", four()).await.unwrap();
    service
        .select(AnswerZone::User, q(1), label("A"))
        .await
        .unwrap();
    service.advance().await.unwrap();

    let snapshot = service.snapshot().await;
    assert_eq!(snapshot.mode, Mode::KeyEntry);
    assert_eq!(snapshot.skipped.iter().copied().collect::<Vec<_>>(), vec![q(2), q(3)]);

    let err = service
        .select(AnswerZone::Key, q(2), label("C"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Rejected(CommandRejected::SkippedQuestion(_))
    ));
    assert!(err.is_rejection());
    assert!(service.snapshot().await.correct_answers.is_empty());
}

#[tokio::test]
async fn check_without_key_keeps_key_entry() {
    let store = InMemoryStore::new();
    let (service, _) = restored(&store).await;
    service.generate("1-3", four()).await.unwrap();
    service.advance().await.unwrap();

    let err = service.check_answers().await.unwrap_err();
    assert!(matches!(err, SessionError::NoKeyEntered));

    let snapshot = service.snapshot().await;
    assert_eq!(snapshot.mode, Mode::KeyEntry);
    assert!(!snapshot.results_visible);
    assert_eq!(store.get("omrResultDisplayedV2").await.unwrap(), None);
}

#[tokio::test]
async fn full_round_scores_and_survives_restart() {
    let store = InMemoryStore::new();
    let (service, _) = restored(&store).await;
    service.generate("1-3", four()).await.unwrap();
    service
        .select(AnswerZone::User, q(1), label("A"))
        .await
        .unwrap();
    service
        .select(AnswerZone::User, q(2), label("B"))
        .await
        .unwrap();
    service
        .select(AnswerZone::User, q(3), label("D"))
        .await
        .unwrap();
    service.advance().await.unwrap();
    service
        .select(AnswerZone::Key, q(1), label("A"))
        .await
        .unwrap();
    service
        .select(AnswerZone::Key, q(2), label("C"))
        .await
        .unwrap();

    let report = service.check_answers().await.unwrap();
    assert_eq!(report.correct(), 1);
    assert_eq!(report.attempted(), 3);
    assert_eq!(report.key_provided(), 2);
    assert_eq!(report.total(), 3);
    assert_eq!(
        store.get("omrResultDisplayedV2").await.unwrap().as_deref(),
        Some("true")
    );

    let (_, reloaded) = restored(&store).await;
    assert_eq!(reloaded.mode, Mode::KeyEntry);
    assert!(reloaded.results_visible);
    let report = reloaded.report.expect("report restored");
    assert_eq!(report.annotation(q(1)), Some(Annotation::Correct));
    assert_eq!(report.annotation(q(2)), Some(Annotation::Incorrect));
    assert_eq!(report.annotation(q(3)), None);
}

#[tokio::test]
async fn key_click_after_check_hides_results() {
    let store = InMemoryStore::new();
    let (service, _) = restored(&store).await;
    service.generate("1", four()).await.unwrap();
    service
        .select(AnswerZone::User, q(1), label("A"))
        .await
        .unwrap();
    service.advance().await.unwrap();
    service
        .select(AnswerZone::Key, q(1), label("A"))
        .await
        .unwrap();
    service.check_answers().await.unwrap();

    service
        .select(AnswerZone::Key, q(1), label("B"))
        .await
        .unwrap();

    let snapshot = service.snapshot().await;
    assert!(!snapshot.results_visible);
    assert!(snapshot.report.is_none());
    assert_eq!(store.get("omrResultDisplayedV2").await.unwrap(), None);
}

#[tokio::test]
async fn edit_returns_to_answering_and_persists_mode() {
    let store = InMemoryStore::new();
    let (service, _) = restored(&store).await;
    service.generate("1-2", four()).await.unwrap();
    service.advance().await.unwrap();
    assert_eq!(
        store.get("omrAppStateV2").await.unwrap().as_deref(),
        Some("keyEntry")
    );

    service.edit().await.unwrap();
    assert_eq!(
        store.get("omrAppStateV2").await.unwrap().as_deref(),
        Some("answering")
    );
    assert!(service.snapshot().await.skipped.is_empty());

    let err = service.edit().await.unwrap_err();
    assert!(err.is_rejection());
}

#[tokio::test]
async fn corrupt_user_answers_do_not_affect_key() {
    let store = InMemoryStore::with_entries([
        ("omrConfigV2", r#"{"questions":"1-3","choices":"4"}"#),
        ("omrUserAnswersV2", "{not json"),
        ("omrCorrectAnswersV2", r#"{"1":"A","3":"C"}"#),
        ("omrAppStateV2", "keyEntry"),
    ]);
    let (_, snapshot) = restored(&store).await;

    assert!(snapshot.user_answers.is_empty());
    assert_eq!(snapshot.correct_answers.len(), 2);
    assert_eq!(snapshot.correct_answers.get(q(3)), Some(label("C")));
    assert_eq!(snapshot.mode, Mode::KeyEntry);
    assert_eq!(store.get("omrUserAnswersV2").await.unwrap(), None);
}

#[tokio::test]
async fn corrupt_config_resets_to_defaults() {
    let store = InMemoryStore::with_entries([
        ("omrConfigV2", "][".to_string()),
        ("omrAppStateV2", "keyEntry".to_string()),
    ]);
    let (_, snapshot) = restored(&store).await;

    assert_default(&snapshot);
    assert_eq!(store.get("omrConfigV2").await.unwrap(), None);
}

#[tokio::test]
async fn stale_results_flag_without_key_is_cleared() {
    let store = InMemoryStore::with_entries([
        ("omrConfigV2", r#"{"questions":"1-2","choices":"4"}"#),
        ("omrAppStateV2", "keyEntry"),
        ("omrResultDisplayedV2", "true"),
    ]);
    let (_, snapshot) = restored(&store).await;

    assert_eq!(snapshot.mode, Mode::KeyEntry);
    assert!(!snapshot.results_visible);
    assert_eq!(store.get("omrResultDisplayedV2").await.unwrap(), None);
}

#[tokio::test]
async fn results_flag_outside_key_entry_is_cleared() {
    let store = InMemoryStore::with_entries([
        ("omrConfigV2", r#"{"questions":"1-2","choices":"4"}"#),
        ("omrUserAnswersV2", r#"{"1":"A","2":"B"}"#),
        ("omrCorrectAnswersV2", r#"{"1":"A"}"#),
        ("omrAppStateV2", "answering"),
        ("omrResultDisplayedV2", "true"),
    ]);
    let (_, snapshot) = restored(&store).await;

    assert_eq!(snapshot.mode, Mode::Answering);
    assert!(!snapshot.results_visible);
    assert!(snapshot.report.is_none());
    assert_eq!(store.get("omrResultDisplayedV2").await.unwrap(), None);
}

#[tokio::test]
async fn clear_then_restore_yields_defaults() {
    let store = InMemoryStore::new();
    let (service, _) = restored(&store).await;
    service.generate("1-5", ChoiceCount::new(5).unwrap()).await.unwrap();
    service
        .select(AnswerZone::User, q(1), label("E"))
        .await
        .unwrap();
    service.advance().await.unwrap();

    service.clear_all().await.unwrap();
    assert_default(&service.snapshot().await);
    assert_eq!(store.get("omrAppStateV2").await.unwrap(), None);
    assert_eq!(store.get("omrResultDisplayedV2").await.unwrap(), None);

    let (_, reloaded) = restored(&store).await;
    assert_default(&reloaded);
}

#[tokio::test]
async fn generate_with_garbage_clears_and_reports() {
    let store = InMemoryStore::new();
    let (service, _) = restored(&store).await;
    service.generate("1-3", four()).await.unwrap();

    let err = service.generate("x, 9-2", four()).await.unwrap_err();
    assert!(matches!(err, SessionError::NoValidQuestionNumbers { .. }));
    assert_default(&service.snapshot().await);

    service.generate("1-3", four()).await.unwrap();
    service.generate("   ", four()).await.unwrap();
    assert_default(&service.snapshot().await);
}

#[tokio::test]
async fn regenerate_wipes_previous_answers() {
    let store = InMemoryStore::new();
    let (service, _) = restored(&store).await;
    service.generate("1-3", four()).await.unwrap();
    service
        .select(AnswerZone::User, q(1), label("A"))
        .await
        .unwrap();

    service.generate("10-12", four()).await.unwrap();
    let snapshot = service.snapshot().await;
    assert!(snapshot.user_answers.is_empty());
    assert_eq!(snapshot.draft.questions, "10-12");
    assert_eq!(
        store.get("omrUserAnswersV2").await.unwrap().as_deref(),
        Some("{}")
    );
}

#[tokio::test]
async fn draft_is_saved_only_without_sheet() {
    let store = InMemoryStore::new();
    let (service, _) = restored(&store).await;

    service.update_draft("1-4", "3").await.unwrap();
    let (_, reloaded) = restored(&store).await;
    assert_eq!(reloaded.draft.questions, "1-4");
    assert_eq!(reloaded.draft.choices, "3");
    assert_eq!(reloaded.questions.len(), 4);

    service.generate("1-2", four()).await.unwrap();
    let err = service.update_draft("7", "4").await.unwrap_err();
    assert!(matches!(err, SessionError::DraftLocked));
}

struct UnreadableStore;

#[async_trait::async_trait]
impl KeyValueStore for UnreadableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("offline".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".to_string()))
    }
}

#[tokio::test]
async fn unreadable_store_restores_defaults_and_surfaces_writes() {
    let service = SheetService::new(SheetRepository::new(
        Arc::new(UnreadableStore),
        StorageKeys::default(),
    ));
    let snapshot = service.restore().await;
    assert_default(&snapshot);

    let err = service.generate("1", four()).await.unwrap_err();
    assert!(matches!(err, SessionError::Storage(_)));
}
