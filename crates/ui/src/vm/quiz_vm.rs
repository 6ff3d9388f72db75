use quiz_core::{AnswerIndex, SubmitResult};
use services::{QuizError, QuizService, QuizStatus};

/// User actions on the quiz screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(u8),
    Submit,
    Advance,
    Retry,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizOutcome {
    /// Nothing changed (e.g. submit without a selection).
    Ignored,
    Updated,
    /// An answer was scored; the caller schedules the advance.
    Submitted(FeedbackVm),
    Completed(ResultVm),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Idle,
    Selected,
    Correct,
    Incorrect,
}

impl OptionState {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Idle => "option",
            Self::Selected => "option selected",
            Self::Correct => "option correct",
            Self::Incorrect => "option incorrect",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: u8,
    pub label: &'static str,
    pub text: String,
    pub state: OptionState,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub progress_label: String,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub can_submit: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub correct: bool,
    pub text: &'static str,
}

impl FeedbackVm {
    fn from_result(result: SubmitResult) -> Self {
        Self {
            correct: result.is_correct,
            text: if result.is_correct {
                "Correct!"
            } else {
                "Incorrect"
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub summary: String,
    pub accuracy: String,
}

/// Screen-facing wrapper around a `QuizService`.
#[derive(Debug)]
pub struct QuizVm {
    quiz: QuizService,
}

impl QuizVm {
    #[must_use]
    pub fn new(quiz: QuizService) -> Self {
        Self { quiz }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.quiz.status() == QuizStatus::Completed
    }

    /// # Errors
    ///
    /// Returns the `QuizError` of a command the current state does not allow;
    /// the quiz is unchanged then.
    pub fn apply(&mut self, intent: QuizIntent) -> Result<QuizOutcome, QuizError> {
        match intent {
            QuizIntent::Select(index) => {
                self.quiz.select_option(index)?;
                Ok(QuizOutcome::Updated)
            }
            QuizIntent::Submit => Ok(self
                .quiz
                .submit()?
                .map_or(QuizOutcome::Ignored, |result| {
                    QuizOutcome::Submitted(FeedbackVm::from_result(result))
                })),
            QuizIntent::Advance => {
                self.quiz.advance()?;
                Ok(self.result().map_or(QuizOutcome::Updated, QuizOutcome::Completed))
            }
            QuizIntent::Retry => {
                self.quiz.reset()?;
                Ok(QuizOutcome::Updated)
            }
        }
    }

    #[must_use]
    pub fn question(&self) -> Option<QuestionVm> {
        let question = self.quiz.current_question()?;
        let progress = self.quiz.current_progress()?;
        let selected = self.quiz.session().and_then(|session| session.selected());
        let submitted = self.quiz.submit_result();

        let options = AnswerIndex::all()
            .map(|index| OptionVm {
                index: index.value(),
                label: index.label(),
                text: question.option(index).to_string(),
                state: option_state(index, selected, submitted),
                disabled: submitted.is_some(),
            })
            .collect();

        Some(QuestionVm {
            progress_label: format!(
                "Question {}/{}",
                progress.display_number(),
                progress.total
            ),
            prompt: question.prompt().to_string(),
            options,
            can_submit: selected.is_some() && submitted.is_none(),
        })
    }

    #[must_use]
    pub fn feedback(&self) -> Option<FeedbackVm> {
        self.quiz.submit_result().map(FeedbackVm::from_result)
    }

    #[must_use]
    pub fn result(&self) -> Option<ResultVm> {
        self.quiz.final_score().map(|score| ResultVm {
            summary: format!("{} of {} correct", score.score, score.total),
            accuracy: format!("Accuracy: {}%", score.percentage),
        })
    }
}

fn option_state(
    index: AnswerIndex,
    selected: Option<AnswerIndex>,
    submitted: Option<SubmitResult>,
) -> OptionState {
    match submitted {
        Some(result) if index == result.correct_index => OptionState::Correct,
        Some(result) if index == result.selected => OptionState::Incorrect,
        Some(_) => OptionState::Idle,
        None if selected == Some(index) => OptionState::Selected,
        None => OptionState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::{Question, QuestionSet};

    fn quiz(correct: &[u8]) -> QuizVm {
        let questions = correct
            .iter()
            .enumerate()
            .map(|(i, answer)| {
                Question::new(
                    format!("Q{}", i + 1),
                    ["w".into(), "x".into(), "y".into(), "z".into()],
                    AnswerIndex::new(*answer).unwrap(),
                )
            })
            .collect();
        let mut service = QuizService::with_seed(1);
        service.replace_questions(QuestionSet::new(questions).unwrap());
        QuizVm::new(service)
    }

    fn correct_now(vm: &QuizVm) -> u8 {
        vm.quiz.current_question().unwrap().correct_index().value()
    }

    #[test]
    fn fresh_question_has_four_idle_options() {
        let vm = quiz(&[0, 1]);
        let question = vm.question().unwrap();
        assert_eq!(question.progress_label, "Question 1/2");
        let labels: Vec<_> = question.options.iter().map(|o| o.label).collect();
        assert_eq!(labels, ["A", "B", "C", "D"]);
        assert!(question.options.iter().all(|o| o.state == OptionState::Idle));
        assert!(!question.can_submit);
        assert!(vm.feedback().is_none());
    }

    #[test]
    fn selection_enables_submit_and_moves_between_options() {
        let mut vm = quiz(&[0]);
        vm.apply(QuizIntent::Select(1)).unwrap();
        vm.apply(QuizIntent::Select(3)).unwrap();
        let question = vm.question().unwrap();
        assert!(question.can_submit);
        assert_eq!(question.options[1].state, OptionState::Idle);
        assert_eq!(question.options[3].state, OptionState::Selected);
    }

    #[test]
    fn empty_submit_is_ignored() {
        let mut vm = quiz(&[0]);
        assert_eq!(vm.apply(QuizIntent::Submit).unwrap(), QuizOutcome::Ignored);
        assert!(vm.feedback().is_none());
    }

    #[test]
    fn wrong_answer_highlights_both_options() {
        let mut vm = quiz(&[2]);
        vm.apply(QuizIntent::Select(0)).unwrap();
        let outcome = vm.apply(QuizIntent::Submit).unwrap();
        assert_eq!(
            outcome,
            QuizOutcome::Submitted(FeedbackVm {
                correct: false,
                text: "Incorrect"
            })
        );

        let question = vm.question().unwrap();
        assert_eq!(question.options[0].state, OptionState::Incorrect);
        assert_eq!(question.options[2].state, OptionState::Correct);
        assert_eq!(question.options[1].state, OptionState::Idle);
        assert!(question.options.iter().all(|o| o.disabled));
        assert!(!question.can_submit);
        assert!(vm.apply(QuizIntent::Select(1)).is_err());
    }

    #[test]
    fn finishing_reports_result_and_retry_restarts() {
        let mut vm = quiz(&[1, 3]);
        let first = correct_now(&vm);
        vm.apply(QuizIntent::Select(first)).unwrap();
        assert_eq!(
            vm.apply(QuizIntent::Submit).unwrap(),
            QuizOutcome::Submitted(FeedbackVm {
                correct: true,
                text: "Correct!"
            })
        );
        assert_eq!(vm.apply(QuizIntent::Advance).unwrap(), QuizOutcome::Updated);

        let wrong = (correct_now(&vm) + 1) % 4;
        vm.apply(QuizIntent::Select(wrong)).unwrap();
        vm.apply(QuizIntent::Submit).unwrap();
        let outcome = vm.apply(QuizIntent::Advance).unwrap();
        assert_eq!(
            outcome,
            QuizOutcome::Completed(ResultVm {
                summary: "1 of 2 correct".into(),
                accuracy: "Accuracy: 50%".into(),
            })
        );
        assert!(vm.is_complete());
        assert!(vm.question().is_none());

        vm.apply(QuizIntent::Retry).unwrap();
        assert!(!vm.is_complete());
        assert_eq!(vm.question().unwrap().progress_label, "Question 1/2");
        assert!(vm.result().is_none());
    }
}
