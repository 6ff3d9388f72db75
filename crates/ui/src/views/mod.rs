mod load_error;
pub(crate) mod quiz;
mod result;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use load_error::LoadErrorScreen;
pub use quiz::{QuizScreen, QuizView};
pub use result::ResultScreen;
pub use state::{ViewError, ViewState};
