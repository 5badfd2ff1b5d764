use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChoiceError {
    #[error("choice count must be a whole number: {0:?}")]
    InvalidCount(String),

    #[error("choice count must be between 1 and 26, got {0}")]
    CountOutOfRange(u32),

    #[error("choice label must be a single letter A-Z: {0:?}")]
    InvalidLabel(String),
}

//
// ─── CHOICE COUNT ──────────────────────────────────────────────────────────────
//

/// Number of lettered options (`A`, `B`, ...) offered per question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChoiceCount(u8);

impl ChoiceCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 26;
    pub const DEFAULT: Self = Self(4);

    /// # Errors
    ///
    /// Returns `ChoiceError::CountOutOfRange` outside `1..=26`.
    pub fn new(count: u32) -> Result<Self, ChoiceError> {
        u8::try_from(count)
            .ok()
            .filter(|c| (Self::MIN..=Self::MAX).contains(c))
            .map(Self)
            .ok_or(ChoiceError::CountOutOfRange(count))
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Labels `A..` up to this count, in order.
    pub fn labels(self) -> impl Iterator<Item = ChoiceLabel> {
        (0..self.0).map(|index| ChoiceLabel(b'A' + index))
    }

    #[must_use]
    pub fn allows(self, label: ChoiceLabel) -> bool {
        label.index() < self.0
    }
}

impl Default for ChoiceCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for ChoiceCount {
    type Err = ChoiceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let count: u32 = raw
            .trim()
            .parse()
            .map_err(|_| ChoiceError::InvalidCount(raw.trim().to_string()))?;
        Self::new(count)
    }
}

impl fmt::Display for ChoiceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── CHOICE LABEL ──────────────────────────────────────────────────────────────
//

/// A single uppercase option letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChoiceLabel(u8);

impl ChoiceLabel {
    /// # Errors
    ///
    /// Returns `ChoiceError::InvalidLabel` for anything other than `A`-`Z`.
    pub fn from_char(ch: char) -> Result<Self, ChoiceError> {
        if ch.is_ascii_uppercase() {
            // ASCII uppercase always fits in a byte.
            Ok(Self(ch as u8))
        } else {
            Err(ChoiceError::InvalidLabel(ch.to_string()))
        }
    }

    /// Zero-based position (`A` = 0).
    #[must_use]
    pub fn index(self) -> u8 {
        self.0 - b'A'
    }

    #[must_use]
    pub fn as_char(self) -> char {
        char::from(self.0)
    }
}

impl FromStr for ChoiceLabel {
    type Err = ChoiceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Self::from_char(ch),
            _ => Err(ChoiceError::InvalidLabel(raw.to_string())),
        }
    }
}

impl fmt::Debug for ChoiceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChoiceLabel({})", self.as_char())
    }
}

impl fmt::Display for ChoiceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
