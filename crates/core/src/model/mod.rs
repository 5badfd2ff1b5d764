mod answers;
mod choice;
mod mode;
mod question;
mod session;

pub use answers::{AnswerMap, AnswerZone, Toggle};
pub use choice::{ChoiceCount, ChoiceError, ChoiceLabel};
pub use mode::Mode;
pub use question::{QuestionNumber, QuestionNumberError, QuestionSet};
pub use session::{CheckError, CommandRejected, Selection, SheetSession};
