//! Validation of the question-data document.
//!
//! The document shape is `{"quizzes": [{"question", "options", "correctAnswer"}]}`.
//! Parsing goes through `serde_json::Value` so every shape problem maps onto
//! [`PayloadError`] instead of a generic decode error.

use serde_json::Value;
use thiserror::Error;

use crate::model::{AnswerIndex, OPTION_COUNT, Question, QuestionSet};

/// Reasons a question-data document is rejected.
///
/// `index` is zero-based; messages show the 1-based question number.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PayloadError {
    #[error("malformed quiz data: the `quizzes` array is missing")]
    MalformedPayload,

    #[error("quiz data is empty: add at least one question")]
    EmptyQuestionSet,

    #[error("question {} is invalid: it needs a prompt and exactly 4 options", .index + 1)]
    InvalidQuestion { index: usize },

    #[error("question {}: correctAnswer must be a number from 0 to 3", .index + 1)]
    InvalidAnswerIndex { index: usize },
}

/// Parse raw JSON text and validate it into a `QuestionSet`.
///
/// # Errors
///
/// Returns `PayloadError::MalformedPayload` for text that is not JSON, and the
/// errors of [`validate_payload`] otherwise.
pub fn parse_payload(text: &str) -> Result<QuestionSet, PayloadError> {
    let value: Value = serde_json::from_str(text).map_err(|_| PayloadError::MalformedPayload)?;
    validate_payload(&value)
}

/// Run the validation pipeline over an already parsed document.
///
/// # Errors
///
/// Returns the first failing check, in document order.
pub fn validate_payload(value: &Value) -> Result<QuestionSet, PayloadError> {
    let quizzes = value
        .get("quizzes")
        .and_then(Value::as_array)
        .ok_or(PayloadError::MalformedPayload)?;

    if quizzes.is_empty() {
        return Err(PayloadError::EmptyQuestionSet);
    }

    let questions = quizzes
        .iter()
        .enumerate()
        .map(|(index, raw)| validate_question(index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    QuestionSet::new(questions)
}

fn validate_question(index: usize, raw: &Value) -> Result<Question, PayloadError> {
    let prompt = raw
        .get("question")
        .and_then(Value::as_str)
        .filter(|prompt| !prompt.is_empty())
        .ok_or(PayloadError::InvalidQuestion { index })?;

    let options = raw
        .get("options")
        .and_then(Value::as_array)
        .filter(|options| options.len() == OPTION_COUNT)
        .ok_or(PayloadError::InvalidQuestion { index })?;

    let texts = options
        .iter()
        .map(|option| option.as_str().map(str::to_owned))
        .collect::<Option<Vec<_>>>()
        .ok_or(PayloadError::InvalidQuestion { index })?;
    let options: [String; OPTION_COUNT] = texts
        .try_into()
        .map_err(|_| PayloadError::InvalidQuestion { index })?;

    let correct = raw
        .get("correctAnswer")
        .and_then(whole_number)
        .and_then(|value| usize::try_from(value).ok())
        .and_then(AnswerIndex::from_usize)
        .ok_or(PayloadError::InvalidAnswerIndex { index })?;

    Ok(Question::new(prompt, options, correct))
}

/// JSON numbers written as `3.0` or `-0` are still whole numbers.
fn whole_number(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let n = value.as_f64()?;
    if n.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&n) {
        return None;
    }
    Some(n as u64)
}
