use std::collections::BTreeMap;

use crate::model::choice::ChoiceLabel;
use crate::model::question::QuestionNumber;

/// Which half of a question row a bubble belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnswerZone {
    /// The user's own answers.
    User,
    /// The correct-answer key.
    Key,
}

/// Result of clicking a bubble that was accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
}

/// Question number → chosen label. Absent means unanswered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerMap(BTreeMap<QuestionNumber, ChoiceLabel>);

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, question: QuestionNumber) -> Option<ChoiceLabel> {
        self.0.get(&question).copied()
    }

    #[must_use]
    pub fn contains(&self, question: QuestionNumber) -> bool {
        self.0.contains_key(&question)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionNumber, ChoiceLabel)> + '_ {
        self.0.iter().map(|(q, label)| (*q, *label))
    }

    pub fn insert(&mut self, question: QuestionNumber, label: ChoiceLabel) {
        self.0.insert(question, label);
    }

    /// Re-clicking the current label clears it; any other label replaces it.
    pub fn toggle(&mut self, question: QuestionNumber, label: ChoiceLabel) -> Toggle {
        if self.get(question) == Some(label) {
            self.0.remove(&question);
            Toggle::Deselected
        } else {
            self.0.insert(question, label);
            Toggle::Selected
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<(QuestionNumber, ChoiceLabel)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (QuestionNumber, ChoiceLabel)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
