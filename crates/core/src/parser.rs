//! Turns free-text question input such as `"1-5, 8, 10-12"` into a [`QuestionSet`].

use tracing::warn;

use crate::model::{QuestionNumber, QuestionSet};

/// Parse comma-separated question numbers and `start-end` ranges.
///
/// Each number is read from its leading digits, so `"3a"` counts as 3.
/// Empty tokens are ignored. Tokens that do not parse, and ranges whose start
/// is greater than their end, are skipped with a warning; they never fail the
/// whole input.
#[must_use]
pub fn parse_question_numbers(input: &str) -> QuestionSet {
    let mut numbers = Vec::new();

    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if token.contains('-') {
            match parse_range(token) {
                Some((start, end)) => {
                    numbers.extend((start.value()..=end.value()).filter_map(|value| {
                        QuestionNumber::new(value).ok()
                    }));
                }
                None => warn!(token, "invalid range format, skipping"),
            }
        } else {
            match QuestionNumber::parse_leading(token) {
                Ok(number) => numbers.push(number),
                Err(err) => warn!(token, %err, "invalid number format, skipping"),
            }
        }
    }

    numbers.into_iter().collect()
}

fn parse_range(token: &str) -> Option<(QuestionNumber, QuestionNumber)> {
    let mut parts = token.split('-');
    let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    let start = QuestionNumber::parse_leading(start).ok()?;
    let end = QuestionNumber::parse_leading(end).ok()?;
    (start <= end).then_some((start, end))
}
