//! Grades user answers against the entered key.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{AnswerMap, QuestionNumber, QuestionSet};

/// Raised when the sheet has questions but none of them has a key entry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no correct answers have been entered")]
pub struct NoKeyEnteredError;

/// Per-row marking shown once results are displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Annotation {
    Correct,
    Incorrect,
}

/// Scoring summary for one sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    correct: u32,
    attempted: u32,
    key_provided: u32,
    total: u32,
    annotations: BTreeMap<QuestionNumber, Annotation>,
}

impl Report {
    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn attempted(&self) -> u32 {
        self.attempted
    }

    #[must_use]
    pub fn key_provided(&self) -> u32 {
        self.key_provided
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Share of attempted questions answered correctly, `None` when nothing was attempted.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        (self.attempted > 0).then(|| f64::from(self.correct) / f64::from(self.attempted))
    }

    /// Marking for a row; `None` when the row had no key or no answer.
    #[must_use]
    pub fn annotation(&self, question: QuestionNumber) -> Option<Annotation> {
        self.annotations.get(&question).copied()
    }

    /// True for the report of an empty sheet, which is never displayed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Score `user` against `key` over every question on the sheet.
///
/// # Errors
///
/// Returns `NoKeyEnteredError` when the sheet is non-empty but no question
/// has a key entry.
pub fn score(
    questions: &QuestionSet,
    user: &AnswerMap,
    key: &AnswerMap,
) -> Result<Report, NoKeyEnteredError> {
    let mut report = Report {
        total: u32::try_from(questions.len()).unwrap_or(u32::MAX),
        ..Report::default()
    };

    for question in questions.iter() {
        let expected = key.get(question);
        if expected.is_some() {
            report.key_provided += 1;
        }
        let Some(given) = user.get(question) else {
            continue;
        };
        report.attempted += 1;
        if let Some(expected) = expected {
            let mark = if given == expected {
                report.correct += 1;
                Annotation::Correct
            } else {
                Annotation::Incorrect
            };
            report.annotations.insert(question, mark);
        }
    }

    if report.key_provided == 0 && !questions.is_empty() {
        return Err(NoKeyEnteredError);
    }
    Ok(report)
}
