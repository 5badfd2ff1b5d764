//! Typed access to the persisted sheet entries on top of a [`KeyValueStore`].
//!
//! Every field is encoded and decoded on its own, so one corrupt entry never
//! takes the others down with it.

use std::collections::BTreeMap;
use std::sync::Arc;

use omr_core::model::{AnswerMap, AnswerZone, ChoiceCount, ChoiceLabel, Mode, QuestionNumber};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::keys::{SheetField, StorageKeys};
use crate::repository::{KeyValueStore, StorageError};

const RESULT_DISPLAYED: &str = "true";

/// Raw control values, stored as typed by the user and re-parsed on load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    #[serde(default)]
    pub questions: String,
    #[serde(default)]
    pub choices: String,
}

impl ConfigRecord {
    #[must_use]
    pub fn new(questions: impl Into<String>, choices: impl Into<String>) -> Self {
        Self {
            questions: questions.into(),
            choices: choices.into(),
        }
    }

    /// The config written by a full clear.
    #[must_use]
    pub fn cleared() -> Self {
        Self::new("", ChoiceCount::DEFAULT.to_string())
    }
}

/// # Errors
///
/// Returns `StorageError::Serialization` if the map cannot be encoded.
pub fn encode_answers(answers: &AnswerMap) -> Result<String, StorageError> {
    let raw: BTreeMap<String, String> = answers
        .iter()
        .map(|(q, label)| (q.to_string(), label.to_string()))
        .collect();
    serde_json::to_string(&raw).map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Decoded answer map plus the raw keys of entries that had to be dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodedAnswers {
    pub answers: AnswerMap,
    pub dropped: Vec<String>,
}

/// Decode a JSON object of question → label.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if `raw` is not a JSON object.
/// Entries with a non-numeric question or an invalid label are dropped
/// individually.
pub fn decode_answers(raw: &str) -> Result<DecodedAnswers, StorageError> {
    let entries: BTreeMap<String, Value> =
        serde_json::from_str(raw).map_err(|err| StorageError::Serialization(err.to_string()))?;

    let mut decoded = DecodedAnswers::default();
    for (key, value) in entries {
        let question = key.parse::<QuestionNumber>().ok();
        let label = value.as_str().and_then(|v| v.parse::<ChoiceLabel>().ok());
        match (question, label) {
            (Some(question), Some(label)) => decoded.answers.insert(question, label),
            _ => decoded.dropped.push(key),
        }
    }
    Ok(decoded)
}

/// Sheet-level repository over a raw key/value backend.
#[derive(Clone)]
pub struct SheetRepository {
    kv: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl SheetRepository {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { kv, keys }
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed JSON, or backend errors.
    pub async fn load_config(&self) -> Result<Option<ConfigRecord>, StorageError> {
        let Some(raw) = self.get(SheetField::Config).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the config cannot be encoded or stored.
    pub async fn save_config(&self, config: &ConfigRecord) -> Result<(), StorageError> {
        let raw = serde_json::to_string(config)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.set(SheetField::Config, &raw).await
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the entry is not a JSON object,
    /// or backend errors.
    pub async fn load_answers(&self, zone: AnswerZone) -> Result<Option<AnswerMap>, StorageError> {
        let field = answers_field(zone);
        let Some(raw) = self.get(field).await? else {
            return Ok(None);
        };
        let decoded = decode_answers(&raw)?;
        if !decoded.dropped.is_empty() {
            warn!(
                key = %self.keys.key(field),
                dropped = ?decoded.dropped,
                "dropping unreadable answer entries"
            );
        }
        Ok(Some(decoded.answers))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the map cannot be encoded or stored.
    pub async fn save_answers(
        &self,
        zone: AnswerZone,
        answers: &AnswerMap,
    ) -> Result<(), StorageError> {
        let raw = encode_answers(answers)?;
        self.set(answers_field(zone), &raw).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on backend errors.
    pub async fn load_mode(&self) -> Result<Mode, StorageError> {
        let raw = self.get(SheetField::AppState).await?;
        Ok(Mode::from_persisted(raw.as_deref()))
    }

    /// # Errors
    ///
    /// Returns `StorageError` on backend errors.
    pub async fn save_mode(&self, mode: Mode) -> Result<(), StorageError> {
        self.set(SheetField::AppState, mode.as_str()).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on backend errors.
    pub async fn load_results_flag(&self) -> Result<bool, StorageError> {
        let raw = self.get(SheetField::ResultDisplayed).await?;
        Ok(raw.as_deref() == Some(RESULT_DISPLAYED))
    }

    /// Visible results write `"true"`; hidden results remove the entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend errors.
    pub async fn save_results_flag(&self, visible: bool) -> Result<(), StorageError> {
        if visible {
            self.set(SheetField::ResultDisplayed, RESULT_DISPLAYED).await
        } else {
            self.discard(SheetField::ResultDisplayed).await
        }
    }

    /// Remove a field so the next load sees it as absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend errors.
    pub async fn discard(&self, field: SheetField) -> Result<(), StorageError> {
        self.kv.remove(&self.keys.key(field)).await
    }

    async fn get(&self, field: SheetField) -> Result<Option<String>, StorageError> {
        self.kv.get(&self.keys.key(field)).await
    }

    async fn set(&self, field: SheetField, value: &str) -> Result<(), StorageError> {
        self.kv.set(&self.keys.key(field), value).await
    }
}

#[must_use]
pub fn answers_field(zone: AnswerZone) -> SheetField {
    match zone {
        AnswerZone::User => SheetField::UserAnswers,
        AnswerZone::Key => SheetField::CorrectAnswers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;

    fn repo_with(entries: &[(&str, &str)]) -> (SheetRepository, InMemoryStore) {
        let store = InMemoryStore::with_entries(entries.iter().copied());
        let repo = SheetRepository::new(Arc::new(store.clone()), StorageKeys::default());
        (repo, store)
    }

    fn q(value: u32) -> QuestionNumber {
        QuestionNumber::new(value).unwrap()
    }

    #[test]
    fn decode_drops_bad_entries_only() {
        let decoded =
            decode_answers(r#"{"1":"A","2":"ab","x":"B","3":5,"4":"C"}"#).unwrap();
        assert_eq!(decoded.answers.len(), 2);
        assert_eq!(decoded.answers.get(q(4)), Some("C".parse().unwrap()));
        assert_eq!(decoded.dropped, vec!["2", "3", "x"]);
    }

    #[test]
    fn decode_rejects_non_objects() {
        assert!(matches!(
            decode_answers("[1,2]"),
            Err(StorageError::Serialization(_))
        ));
        assert!(matches!(
            decode_answers("{not json"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn encode_uses_string_keys() {
        let answers: AnswerMap = [(q(10), "B".parse().unwrap()), (q(2), "A".parse().unwrap())]
            .into_iter()
            .collect();
        assert_eq!(encode_answers(&answers).unwrap(), r#"{"10":"B","2":"A"}"#);
    }

    #[tokio::test]
    async fn config_missing_fields_default_to_empty() {
        let (repo, _) = repo_with(&[("omrConfigV2", r#"{"questions":"1-5"}"#)]);
        let config = repo.load_config().await.unwrap().unwrap();
        assert_eq!(config, ConfigRecord::new("1-5", ""));
    }

    #[tokio::test]
    async fn malformed_config_is_a_serialization_error() {
        let (repo, _) = repo_with(&[("omrConfigV2", "{oops")]);
        assert!(matches!(
            repo.load_config().await,
            Err(StorageError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn results_flag_false_removes_entry() {
        let (repo, store) = repo_with(&[]);
        repo.save_results_flag(true).await.unwrap();
        assert!(repo.load_results_flag().await.unwrap());

        repo.save_results_flag(false).await.unwrap();
        assert_eq!(store.get("omrResultDisplayedV2").await.unwrap(), None);
        assert!(!repo.load_results_flag().await.unwrap());
    }

    #[tokio::test]
    async fn mode_round_trips_through_raw_strings() {
        let (repo, store) = repo_with(&[]);
        repo.save_mode(Mode::KeyEntry).await.unwrap();
        assert_eq!(
            store.get("omrAppStateV2").await.unwrap().as_deref(),
            Some("keyEntry")
        );
        assert_eq!(repo.load_mode().await.unwrap(), Mode::KeyEntry);
    }
}
