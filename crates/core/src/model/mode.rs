use std::fmt;

/// Which answer map the sheet currently accepts input for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Answering,
    KeyEntry,
}

impl Mode {
    /// Persisted string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Answering => "answering",
            Mode::KeyEntry => "keyEntry",
        }
    }

    /// Anything other than the exact `keyEntry` string reads as `Answering`.
    #[must_use]
    pub fn from_persisted(raw: Option<&str>) -> Self {
        match raw {
            Some("keyEntry") => Mode::KeyEntry,
            _ => Mode::Answering,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
