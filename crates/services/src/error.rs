//! Shared error types for the services crate.

use thiserror::Error;

use omr_core::model::{CheckError, CommandRejected};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `SheetService` commands.
///
/// Only `NoValidQuestionNumbers` changes state (the sheet is cleared before
/// it is returned); every other variant leaves the session as it was.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no valid question numbers found in {input:?}")]
    NoValidQuestionNumbers { input: String },
    #[error("no correct answers entered yet")]
    NoKeyEntered,
    #[error("question input is locked while a sheet is active")]
    DraftLocked,
    #[error(transparent)]
    Rejected(#[from] CommandRejected),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// True for guard failures that the UI treats as a silent no-op.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, SessionError::Rejected(_) | SessionError::DraftLocked)
    }
}

impl From<CheckError> for SessionError {
    fn from(err: CheckError) -> Self {
        match err {
            CheckError::Rejected(rejected) => SessionError::Rejected(rejected),
            CheckError::NoKeyEntered(_) => SessionError::NoKeyEntered,
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
