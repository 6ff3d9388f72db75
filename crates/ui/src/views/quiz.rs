use dioxus::prelude::*;

use services::{BootOutcome, QuizSource};

use crate::context::AppContext;
use crate::views::{LoadErrorScreen, ResultScreen, ViewError, ViewState};
use crate::vm::{FeedbackVm, OptionVm, QuestionVm, QuizIntent, QuizOutcome, QuizVm, ResultVm};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// What the quiz page shows; derived from the view state on every render.
enum Screen {
    Loading,
    LoadError(String),
    Question(QuestionVm, Option<FeedbackVm>),
    Result(ResultVm),
}

fn screen_for(state: &ViewState<QuizVm>) -> Screen {
    match state {
        ViewState::Loading => Screen::Loading,
        ViewState::Error(err) => Screen::LoadError(err.message().to_string()),
        ViewState::Ready(vm) => match (vm.result(), vm.question()) {
            (Some(result), _) => Screen::Result(result),
            (None, Some(question)) => Screen::Question(question, vm.feedback()),
            (None, None) => Screen::LoadError(ViewError::Unknown.message().to_string()),
        },
    }
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let delay = ctx.auto_advance();
    let state = use_signal(|| ViewState::<QuizVm>::Loading);
    let pending = use_signal(|| None::<Task>);

    {
        let quiz_loop = ctx.quiz_loop();
        let source = ctx.initial_source();
        use_future(move || {
            let quiz_loop = quiz_loop.clone();
            let source = source.clone();
            let mut state = state;
            async move {
                let loaded = match source {
                    Some(source) => quiz_loop
                        .load_local(&source)
                        .await
                        .map_err(ViewError::DataUnavailable),
                    None => match quiz_loop.boot().await {
                        BootOutcome::Ready(quiz) => Ok(quiz),
                        BootOutcome::NeedsLocalFile { message } => {
                            Err(ViewError::DataUnavailable(message))
                        }
                    },
                };
                state.set(ViewState::from_result(loaded.map(QuizVm::new)));
            }
        });
    }

    let dispatch = use_callback(move |intent: QuizIntent| {
        let mut state = state;
        let mut pending = pending;

        if intent == QuizIntent::Retry {
            if let Some(task) = pending.write().take() {
                task.cancel();
            }
        }

        let outcome = match state.write().ready_mut() {
            Some(vm) => vm.apply(intent),
            None => return,
        };

        match outcome {
            Ok(QuizOutcome::Submitted(_)) => {
                let task = spawn(async move {
                    tokio::time::sleep(delay).await;
                    pending.set(None);
                    if let Some(vm) = state.write().ready_mut() {
                        if let Err(err) = vm.apply(QuizIntent::Advance) {
                            tracing::warn!(error = %err, "auto-advance rejected");
                        }
                    }
                });
                pending.set(Some(task));
            }
            Ok(QuizOutcome::Completed(_) | QuizOutcome::Updated | QuizOutcome::Ignored) => {}
            Err(err) => {
                tracing::debug!(error = %err, ?intent, "quiz command rejected");
            }
        }
    });

    let load_file = {
        let quiz_loop = ctx.quiz_loop();
        use_callback(move |path: String| {
            if path.is_empty() {
                return;
            }
            let quiz_loop = quiz_loop.clone();
            let mut state = state;
            spawn(async move {
                let next = match quiz_loop.load_local(&QuizSource::file(path)).await {
                    Ok(quiz) => ViewState::Ready(QuizVm::new(quiz)),
                    Err(message) => ViewState::Error(ViewError::DataUnavailable(message)),
                };
                state.set(next);
            });
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch, load_file);
            }
        }
    }

    let screen = screen_for(&state.read());

    rsx! {
        div { class: "page quiz",
            match screen {
                Screen::Loading => rsx! {
                    p { class: "loading", "Loading..." }
                },
                Screen::LoadError(message) => rsx! {
                    LoadErrorScreen { message, on_load: load_file }
                },
                Screen::Question(question, feedback) => rsx! {
                    QuizScreen { question, feedback, on_intent: dispatch }
                },
                Screen::Result(result) => rsx! {
                    ResultScreen {
                        result,
                        on_retry: move |()| dispatch.call(QuizIntent::Retry),
                    }
                },
            }
        }
    }
}

#[component]
pub fn QuizScreen(
    question: QuestionVm,
    feedback: Option<FeedbackVm>,
    on_intent: EventHandler<QuizIntent>,
) -> Element {
    let feedback = feedback.map(|feedback| {
        let class = if feedback.correct {
            "feedback correct"
        } else {
            "feedback incorrect"
        };
        (class, feedback.text)
    });

    rsx! {
        section { class: "quiz-screen",
            p { class: "progress", "{question.progress_label}" }
            h2 { class: "question", "{question.prompt}" }
            div { class: "options",
                for option in question.options.iter().cloned() {
                    OptionButton { key: "{option.index}", option, on_intent }
                }
            }
            button {
                id: "answer-button",
                class: "primary",
                disabled: !question.can_submit,
                onclick: move |_| on_intent.call(QuizIntent::Submit),
                "Answer"
            }
            if let Some((class, text)) = feedback {
                p { class, "{text}" }
            }
        }
    }
}

#[component]
fn OptionButton(option: OptionVm, on_intent: EventHandler<QuizIntent>) -> Element {
    let index = option.index;
    rsx! {
        button {
            class: option.state.class(),
            disabled: option.disabled,
            onclick: move |_| on_intent.call(QuizIntent::Select(index)),
            span { class: "option-label", "{option.label}" }
            span { class: "option-text", "{option.text}" }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    load_file: Rc<RefCell<Option<Callback<String>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, load_file: Callback<String>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.load_file.borrow_mut() = Some(load_file);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn load_file(&self) -> Callback<String> {
        (*self.load_file.borrow()).expect("load callback registered")
    }
}
