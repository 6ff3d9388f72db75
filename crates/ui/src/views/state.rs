/// Reasons a screen cannot show a quiz.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// No usable question data yet; the message says what to do next.
    DataUnavailable(String),
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::DataUnavailable(message) => message,
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Error(ViewError),
}

impl<T> ViewState<T> {
    #[must_use]
    pub fn from_result(result: Result<T, ViewError>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Error(err),
        }
    }

    #[must_use]
    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Loading | Self::Error(_) => None,
        }
    }
}
