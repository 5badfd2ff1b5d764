use std::fmt;

/// The independently persisted pieces of a sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SheetField {
    Config,
    UserAnswers,
    CorrectAnswers,
    AppState,
    ResultDisplayed,
}

impl SheetField {
    fn suffix(self) -> &'static str {
        match self {
            SheetField::Config => "Config",
            SheetField::UserAnswers => "UserAnswers",
            SheetField::CorrectAnswers => "CorrectAnswers",
            SheetField::AppState => "AppState",
            SheetField::ResultDisplayed => "ResultDisplayed",
        }
    }
}

impl fmt::Display for SheetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Builds versioned store keys such as `omrConfigV2`.
///
/// Bumping [`StorageKeys::VERSION`] orphans data written by older layouts
/// instead of trying to read it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl StorageKeys {
    pub const DEFAULT_PREFIX: &'static str = "omr";
    pub const VERSION: &'static str = "V2";

    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn key(&self, field: SheetField) -> String {
        format!("{}{}{}", self.prefix, field.suffix(), Self::VERSION)
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}
