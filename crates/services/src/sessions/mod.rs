mod service;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use service::{QuizService, QuizStatus};
pub use workflow::{BootOutcome, QuizLoopService, REMOTE_LOAD_FAILED, local_failure_message};
