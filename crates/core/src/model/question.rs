use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionNumberError {
    #[error("not a whole number: {0:?}")]
    NotANumber(String),

    #[error("question numbers start at 1")]
    Zero,

    #[error("question numbers cannot be negative: {0:?}")]
    Negative(String),

    #[error("question number {0} exceeds the maximum of 10000")]
    TooLarge(u64),
}

//
// ─── QUESTION NUMBER ───────────────────────────────────────────────────────────
//

/// A positive question number as printed on the sheet.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionNumber(u32);

impl QuestionNumber {
    /// Largest question number a sheet may carry.
    pub const MAX: u32 = 10_000;

    /// Creates a `QuestionNumber`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionNumberError` for zero or values above [`Self::MAX`].
    pub fn new(value: u32) -> Result<Self, QuestionNumberError> {
        match value {
            0 => Err(QuestionNumberError::Zero),
            v if v > Self::MAX => Err(QuestionNumberError::TooLarge(u64::from(v))),
            v => Ok(Self(v)),
        }
    }

    /// Reads the leading integer of typed input, ignoring whatever follows
    /// the digits: `"3a"` is 3 and `"+5"` is 5. Input must start (after
    /// trimming and an optional sign) with a digit.
    ///
    /// # Errors
    ///
    /// Returns `QuestionNumberError` when there is no leading digit, the
    /// value is negative or zero, or it exceeds [`Self::MAX`].
    pub fn parse_leading(raw: &str) -> Result<Self, QuestionNumberError> {
        let trimmed = raw.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'+') => (false, &trimmed[1..]),
            Some(b'-') => (true, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let digits_end = unsigned
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(unsigned.len());
        let digits = &unsigned[..digits_end];
        if digits.is_empty() {
            return Err(QuestionNumberError::NotANumber(trimmed.to_string()));
        }
        let value: u64 = digits.parse().unwrap_or(u64::MAX);
        if negative && value != 0 {
            return Err(QuestionNumberError::Negative(trimmed.to_string()));
        }
        let value = u32::try_from(value).map_err(|_| QuestionNumberError::TooLarge(value))?;
        Self::new(value)
    }

    /// Returns the underlying value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl FromStr for QuestionNumber {
    type Err = QuestionNumberError;

    /// Strict parse: the trimmed input must be all ASCII digits. Stored
    /// answer keys go through here; typed input uses [`Self::parse_leading`].
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(QuestionNumberError::NotANumber(trimmed.to_string()));
        }
        let value: u64 = trimmed
            .parse()
            .map_err(|_| QuestionNumberError::TooLarge(u64::MAX))?;
        let value = u32::try_from(value).map_err(|_| QuestionNumberError::TooLarge(value))?;
        Self::new(value)
    }
}

impl fmt::Debug for QuestionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

impl fmt::Display for QuestionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── QUESTION SET ──────────────────────────────────────────────────────────────
//

/// Strictly increasing, de-duplicated list of question numbers on a sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestionSet(Vec<QuestionNumber>);

impl QuestionSet {
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, question: QuestionNumber) -> bool {
        self.0.binary_search(&question).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = QuestionNumber> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[QuestionNumber] {
        &self.0
    }

    /// Comma-joined form that the parser reads back into the same set.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<QuestionNumber> for QuestionSet {
    fn from_iter<I: IntoIterator<Item = QuestionNumber>>(iter: I) -> Self {
        let unique: BTreeSet<QuestionNumber> = iter.into_iter().collect();
        Self(unique.into_iter().collect())
    }
}
