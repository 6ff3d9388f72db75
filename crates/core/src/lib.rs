#![forbid(unsafe_code)]

pub mod model;
pub mod payload;
pub mod scoring;
pub mod shuffle;
pub mod time;

pub use model::{
    AnswerIndex, OPTION_COUNT, Progress, Question, QuestionSet, Session, SessionError,
    SessionStatus, SubmitResult,
};
pub use payload::{PayloadError, parse_payload, validate_payload};
pub use scoring::{FinalScore, percentage};
pub use time::Clock;
