mod quiz_vm;

pub use quiz_vm::{
    FeedbackVm, OptionState, OptionVm, QuestionVm, QuizIntent, QuizOutcome, QuizVm, ResultVm,
};
