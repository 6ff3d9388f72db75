use crate::model::answer::{AnswerIndex, OPTION_COUNT};
use crate::payload::PayloadError;

/// A single multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: [String; OPTION_COUNT],
    correct: AnswerIndex,
}

impl Question {
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct: AnswerIndex,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            options,
            correct,
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: AnswerIndex) -> &str {
        &self.options[index.as_usize()]
    }

    #[must_use]
    pub fn correct_index(&self) -> AnswerIndex {
        self.correct
    }

    #[must_use]
    pub fn is_correct(&self, answer: AnswerIndex) -> bool {
        self.correct == answer
    }
}

/// The validated, non-empty collection of questions produced by one load.
///
/// A new load replaces the whole set; there is no merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// # Errors
    ///
    /// Returns `PayloadError::EmptyQuestionSet` if `questions` is empty.
    pub fn new(questions: Vec<Question>) -> Result<Self, PayloadError> {
        if questions.is_empty() {
            return Err(PayloadError::EmptyQuestionSet);
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(prompt: &str, correct: u8) -> Question {
        Question::new(
            prompt,
            ["a".into(), "b".into(), "c".into(), "d".into()],
            AnswerIndex::new(correct).unwrap(),
        )
    }

    #[test]
    fn question_reports_correctness() {
        let q = question("Q", 2);
        assert!(q.is_correct(AnswerIndex::new(2).unwrap()));
        assert!(!q.is_correct(AnswerIndex::new(0).unwrap()));
        assert_eq!(q.option(AnswerIndex::new(1).unwrap()), "b");
    }

    #[test]
    fn empty_set_is_rejected() {
        let err = QuestionSet::new(Vec::new()).unwrap_err();
        assert_eq!(err, PayloadError::EmptyQuestionSet);
    }

    #[test]
    fn set_keeps_order() {
        let set = QuestionSet::new(vec![question("one", 0), question("two", 1)]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).map(Question::prompt), Some("two"));
    }
}
