use std::sync::Arc;
use std::time::Duration;

use services::{QuizLoopService, QuizSource};

/// What the composition root hands to the UI.
pub trait UiApp: Send + Sync {
    fn quiz_loop(&self) -> Arc<QuizLoopService>;

    /// Delay between showing feedback and moving to the next question.
    fn auto_advance(&self) -> Duration;

    /// A source given on the command line replaces the startup fetch.
    fn initial_source(&self) -> Option<QuizSource> {
        None
    }
}

#[derive(Clone)]
pub struct AppContext {
    quiz_loop: Arc<QuizLoopService>,
    auto_advance: Duration,
    initial_source: Option<QuizSource>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz_loop: app.quiz_loop(),
            auto_advance: app.auto_advance(),
            initial_source: app.initial_source(),
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn auto_advance(&self) -> Duration {
        self.auto_advance
    }

    #[must_use]
    pub fn initial_source(&self) -> Option<QuizSource> {
        self.initial_source.clone()
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
