mod answer;
mod question;
mod session;

pub use answer::{AnswerIndex, OPTION_COUNT};
pub use question::{Question, QuestionSet};
pub use session::{Progress, Session, SessionError, SessionStatus, SubmitResult};
