use rand::Rng;
use thiserror::Error;

use crate::model::{AnswerIndex, Question, QuestionSet};
use crate::scoring::FinalScore;
use crate::shuffle::fisher_yates;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session already completed")]
    Completed,

    #[error("the current question has already been answered")]
    AnswerLocked,

    #[error("the current question has not been answered yet")]
    NotSubmitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Completed,
}

/// Outcome of submitting an answer, kept until the session advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitResult {
    pub selected: AnswerIndex,
    pub correct_index: AnswerIndex,
    pub is_correct: bool,
}

/// Position within the session: `position` questions are behind the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub position: usize,
    pub total: usize,
}

impl Progress {
    /// 1-based number of the question on screen, capped at `total`.
    #[must_use]
    pub fn display_number(&self) -> usize {
        (self.position + 1).min(self.total)
    }
}

/// One attempt at a question set.
///
/// The order is shuffled once at start. `position == order.len()` marks
/// completion. `score` never exceeds `position` plus the locked current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    order: Vec<Question>,
    position: usize,
    score: u32,
    selected: Option<AnswerIndex>,
    submitted: Option<SubmitResult>,
}

impl Session {
    /// Start a session over a freshly shuffled copy of `questions`.
    pub fn start<R: Rng + ?Sized>(questions: &QuestionSet, rng: &mut R) -> Self {
        Self::start_with_order(fisher_yates(questions.questions(), rng))
    }

    /// Start a session with an explicit question order.
    #[must_use]
    pub fn start_with_order(order: Vec<Question>) -> Self {
        Self {
            order,
            position: 0,
            score: 0,
            selected: None,
            submitted: None,
        }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.position >= self.order.len() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status() == SessionStatus::Completed
    }

    #[must_use]
    pub fn order(&self) -> &[Question] {
        &self.order
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn selected(&self) -> Option<AnswerIndex> {
        self.selected
    }

    /// True between `submit` and `advance`.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.submitted.is_some()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.order.get(self.position)
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            position: self.position,
            total: self.order.len(),
        }
    }

    /// Verdict for the current question, if it has been submitted.
    #[must_use]
    pub fn last_result(&self) -> Option<SubmitResult> {
        self.submitted
    }

    /// Available only once every question has been answered.
    #[must_use]
    pub fn final_score(&self) -> Option<FinalScore> {
        if !self.is_complete() {
            return None;
        }
        let total = u32::try_from(self.order.len()).unwrap_or(u32::MAX);
        Some(FinalScore::new(self.score, total))
    }

    /// Pick an option for the current question. The last call wins.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the last question and
    /// `SessionError::AnswerLocked` once the current question was submitted.
    pub fn select_option(&mut self, index: AnswerIndex) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.selected = Some(index);
        Ok(())
    }

    /// Score the current selection and lock the question.
    ///
    /// Returns `Ok(None)` without touching any state when nothing is selected.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` or `SessionError::AnswerLocked` when
    /// the current question cannot take an answer.
    pub fn submit(&mut self) -> Result<Option<SubmitResult>, SessionError> {
        self.ensure_open()?;
        let Some(selected) = self.selected else {
            return Ok(None);
        };
        let question = self.current_question().ok_or(SessionError::Completed)?;
        let correct_index = question.correct_index();
        let is_correct = selected == correct_index;
        if is_correct {
            self.score = self.score.saturating_add(1);
        }
        let result = SubmitResult {
            selected,
            correct_index,
            is_correct,
        };
        self.submitted = Some(result);
        Ok(Some(result))
    }

    /// Move past a submitted question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the last question and
    /// `SessionError::NotSubmitted` when the current question is still open.
    pub fn advance(&mut self) -> Result<SessionStatus, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if self.submitted.is_none() {
            return Err(SessionError::NotSubmitted);
        }
        self.position += 1;
        self.selected = None;
        self.submitted = None;
        Ok(self.status())
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if self.is_locked() {
            return Err(SessionError::AnswerLocked);
        }
        Ok(())
    }
}
