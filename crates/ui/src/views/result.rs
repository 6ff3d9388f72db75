use dioxus::prelude::*;

use crate::vm::ResultVm;

#[component]
pub fn ResultScreen(result: ResultVm, on_retry: EventHandler<()>) -> Element {
    rsx! {
        section { class: "result-screen",
            h2 { "Result" }
            p { class: "score", "{result.summary}" }
            p { class: "accuracy", "{result.accuracy}" }
            button {
                id: "retry-button",
                class: "primary",
                onclick: move |_| on_retry.call(()),
                "Retry"
            }
        }
    }
}
