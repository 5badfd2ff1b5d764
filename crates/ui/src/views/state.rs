use services::SessionError;

/// Transient message shown above the sheet after a failed command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    NoValidQuestionNumbers,
    KeyRequired,
    Unknown,
}

impl Notice {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Notice::NoValidQuestionNumbers => {
                "No valid question numbers found. Please use formats like 1-10, 15, 20-25."
            }
            Notice::KeyRequired => "Please enter the correct answers before checking.",
            Notice::Unknown => "Something went wrong. Please try again.",
        }
    }

    /// Rejected clicks are silent; everything else surfaces.
    #[must_use]
    pub fn from_error(err: &SessionError) -> Option<Self> {
        match err {
            SessionError::NoValidQuestionNumbers { .. } => Some(Notice::NoValidQuestionNumbers),
            SessionError::NoKeyEntered => Some(Notice::KeyRequired),
            SessionError::Storage(_) => Some(Notice::Unknown),
            SessionError::Rejected(_) | SessionError::DraftLocked => None,
        }
    }
}
