use std::fmt;

use rand::rngs::StdRng;
use rand::{SeedableRng, rng};

use quiz_core::{
    AnswerIndex, FinalScore, Progress, Question, QuestionSet, Session, SessionStatus,
    SubmitResult,
};

use crate::error::QuizError;

/// Coarse lifecycle of the quiz, including the time before any session exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Hosts the active question set and the current session.
///
/// This is the surface the presentation layer talks to: it forwards commands
/// (`select_option`, `submit`, `advance`, `reset`) and reads state back.
pub struct QuizService {
    questions: Option<QuestionSet>,
    session: Option<Session>,
    rng: StdRng,
}

impl Default for QuizService {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizService {
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_rng(&mut rng()))
    }

    /// Reproducible shuffles for tests and demos.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            questions: None,
            session: None,
            rng,
        }
    }

    /// Replace the active data wholesale and start a fresh session over it.
    pub fn replace_questions(&mut self, questions: QuestionSet) -> &Session {
        let session = Session::start(&questions, &mut self.rng);
        self.questions = Some(questions);
        self.install(session)
    }

    /// Start a session over the active data.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` if nothing has been loaded.
    pub fn start(&mut self) -> Result<&Session, QuizError> {
        let questions = self.questions.as_ref().ok_or(QuizError::NoQuestions)?;
        let session = Session::start(questions, &mut self.rng);
        Ok(self.install(session))
    }

    /// Re-shuffle and zero the score. Allowed in any state once data is loaded.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` if nothing has been loaded.
    pub fn reset(&mut self) -> Result<&Session, QuizError> {
        self.start()
    }

    fn install(&mut self, session: Session) -> &Session {
        tracing::debug!(questions = session.order().len(), "quiz session started");
        self.session.insert(session)
    }

    #[must_use]
    pub fn status(&self) -> QuizStatus {
        match self.session.as_ref().map(Session::status) {
            None => QuizStatus::NotStarted,
            Some(SessionStatus::InProgress) => QuizStatus::InProgress,
            Some(SessionStatus::Completed) => QuizStatus::Completed,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn questions(&self) -> Option<&QuestionSet> {
        self.questions.as_ref()
    }

    /// # Errors
    ///
    /// Returns `QuizError::InvalidOption` for indices outside `0..=3`, and
    /// session errors when the current question cannot take a selection.
    pub fn select_option(&mut self, index: u8) -> Result<(), QuizError> {
        let index = AnswerIndex::new(index).ok_or(QuizError::InvalidOption(index))?;
        self.session_mut()?.select_option(index)?;
        Ok(())
    }

    /// Submit the current selection; `Ok(None)` when nothing is selected.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotStarted` or the underlying session error.
    pub fn submit(&mut self) -> Result<Option<SubmitResult>, QuizError> {
        let result = self.session_mut()?.submit()?;
        if let Some(result) = result {
            tracing::debug!(correct = result.is_correct, "answer submitted");
        }
        Ok(result)
    }

    /// # Errors
    ///
    /// Returns `QuizError::NotStarted` or the underlying session error.
    pub fn advance(&mut self) -> Result<SessionStatus, QuizError> {
        let session = self.session_mut()?;
        let status = session.advance()?;
        if let Some(score) = session.final_score() {
            tracing::info!(
                score = score.score,
                total = score.total,
                percentage = score.percentage,
                "quiz completed"
            );
        }
        Ok(status)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session.as_ref().and_then(Session::current_question)
    }

    #[must_use]
    pub fn current_progress(&self) -> Option<Progress> {
        self.session.as_ref().map(Session::progress)
    }

    #[must_use]
    pub fn submit_result(&self) -> Option<SubmitResult> {
        self.session.as_ref().and_then(Session::last_result)
    }

    #[must_use]
    pub fn final_score(&self) -> Option<FinalScore> {
        self.session.as_ref().and_then(Session::final_score)
    }

    fn session_mut(&mut self) -> Result<&mut Session, QuizError> {
        self.session.as_mut().ok_or(QuizError::NotStarted)
    }
}

impl fmt::Debug for QuizService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizService")
            .field("questions_len", &self.questions.as_ref().map(QuestionSet::len))
            .field("status", &self.status())
            .field("progress", &self.current_progress())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::SessionError;

    fn question(prompt: &str, correct: u8) -> Question {
        Question::new(
            prompt,
            ["a".into(), "b".into(), "c".into(), "d".into()],
            AnswerIndex::new(correct).unwrap(),
        )
    }

    fn set(n: usize) -> QuestionSet {
        QuestionSet::new((0..n).map(|i| question(&format!("Q{i}"), 0)).collect()).unwrap()
    }

    #[test]
    fn not_started_until_data_arrives() {
        let mut quiz = QuizService::with_seed(1);
        assert_eq!(quiz.status(), QuizStatus::NotStarted);
        assert_eq!(quiz.start().unwrap_err(), QuizError::NoQuestions);
        assert_eq!(quiz.select_option(0).unwrap_err(), QuizError::NotStarted);
        assert!(quiz.current_question().is_none());
        assert!(quiz.current_progress().is_none());
    }

    #[test]
    fn replace_questions_starts_in_progress() {
        let mut quiz = QuizService::with_seed(1);
        quiz.replace_questions(set(3));
        assert_eq!(quiz.status(), QuizStatus::InProgress);
        assert_eq!(
            quiz.current_progress(),
            Some(Progress {
                position: 0,
                total: 3
            })
        );
    }

    #[test]
    fn invalid_option_is_rejected() {
        let mut quiz = QuizService::with_seed(1);
        quiz.replace_questions(set(1));
        assert_eq!(quiz.select_option(4).unwrap_err(), QuizError::InvalidOption(4));
    }

    #[test]
    fn reset_from_completed_starts_fresh() {
        let mut quiz = QuizService::with_seed(9);
        quiz.replace_questions(set(2));
        for _ in 0..2 {
            quiz.select_option(0).unwrap();
            quiz.submit().unwrap();
            quiz.advance().unwrap();
        }
        assert_eq!(quiz.status(), QuizStatus::Completed);
        assert_eq!(quiz.final_score().map(|s| s.percentage), Some(100));
        assert_eq!(
            quiz.advance().unwrap_err(),
            QuizError::Session(SessionError::Completed)
        );

        quiz.reset().unwrap();
        assert_eq!(quiz.status(), QuizStatus::InProgress);
        assert_eq!(quiz.session().map(Session::score), Some(0));
        assert!(quiz.final_score().is_none());
    }

    #[test]
    fn reset_mid_question_drops_lock() {
        let mut quiz = QuizService::with_seed(3);
        quiz.replace_questions(set(2));
        quiz.select_option(1).unwrap();
        quiz.submit().unwrap();
        assert!(quiz.submit_result().is_some());

        quiz.reset().unwrap();
        assert!(quiz.submit_result().is_none());
        assert_eq!(quiz.session().and_then(Session::selected), None);
        quiz.select_option(2).unwrap();
    }

    #[test]
    fn same_seed_same_order() {
        let mut a = QuizService::with_seed(77);
        let mut b = QuizService::with_seed(77);
        let order_a = a.replace_questions(set(10)).order().to_vec();
        let order_b = b.replace_questions(set(10)).order().to_vec();
        assert_eq!(order_a, order_b);
    }
}
