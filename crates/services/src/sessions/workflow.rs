use std::sync::Arc;

use crate::error::{LoadError, TransportError};
use crate::loader::{QuizLoader, QuizSource};

use super::service::QuizService;

/// Shown when the question data could not be loaded from the app itself.
pub const REMOTE_LOAD_FAILED: &str =
    "Failed to load the quiz data. Please choose a local JSON file.";

/// Result of the startup load.
#[derive(Debug)]
pub enum BootOutcome {
    Ready(QuizService),
    /// The remote load failed; the user has to pick a local file.
    NeedsLocalFile { message: String },
}

/// Orchestrates loading question data and starting quizzes over it.
#[derive(Clone)]
pub struct QuizLoopService {
    loader: Arc<QuizLoader>,
    data_path: String,
    seed: Option<u64>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(loader: Arc<QuizLoader>, data_path: impl Into<String>) -> Self {
        Self {
            loader,
            data_path: data_path.into(),
            seed: None,
        }
    }

    /// Use a fixed shuffle seed for every quiz started by this service.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load from `source` and start a quiz over the result.
    ///
    /// # Errors
    ///
    /// Returns the `LoadError` of the underlying load.
    pub async fn start(&self, source: &QuizSource) -> Result<QuizService, LoadError> {
        let questions = self.loader.load(source).await?;
        let mut quiz = self.new_quiz();
        quiz.replace_questions(questions);
        Ok(quiz)
    }

    /// Startup flow: try the bundled data, fall back to asking for a local file.
    ///
    /// Any remote failure, transport or payload, routes to the local path.
    pub async fn boot(&self) -> BootOutcome {
        match self.start(&QuizSource::remote(self.data_path.clone())).await {
            Ok(quiz) => BootOutcome::Ready(quiz),
            Err(err) => {
                tracing::warn!(error = %err, "remote quiz data unavailable, asking for a file");
                BootOutcome::NeedsLocalFile {
                    message: REMOTE_LOAD_FAILED.to_string(),
                }
            }
        }
    }

    /// Start a quiz from a user-chosen local source.
    ///
    /// # Errors
    ///
    /// Returns a user-readable message; the caller stays on the file prompt.
    pub async fn load_local(&self, source: &QuizSource) -> Result<QuizService, String> {
        self.start(source)
            .await
            .map_err(|err| local_failure_message(&err))
    }

    fn new_quiz(&self) -> QuizService {
        self.seed.map_or_else(QuizService::new, QuizService::with_seed)
    }
}

/// Message shown inline when a local file cannot be used.
#[must_use]
pub fn local_failure_message(err: &LoadError) -> String {
    match err {
        LoadError::Transport(TransportError::Io { .. }) => {
            "Could not read the file. Please try another file.".to_string()
        }
        other => format!("Could not read the JSON file: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::PayloadError;

    #[test]
    fn local_messages_distinguish_read_failures() {
        let io = LoadError::Transport(TransportError::Io {
            path: "quizzes.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        });
        assert_eq!(
            local_failure_message(&io),
            "Could not read the file. Please try another file."
        );

        let payload = LoadError::Payload(PayloadError::MalformedPayload);
        assert!(local_failure_message(&payload).starts_with("Could not read the JSON file: "));
    }
}
