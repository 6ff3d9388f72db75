use dioxus::prelude::*;

/// Shown when no question data could be loaded. The user can point at a
/// local JSON file instead; failures replace `message`.
#[component]
pub fn LoadErrorScreen(message: String, on_load: EventHandler<String>) -> Element {
    let mut path = use_signal(String::new);
    let can_load = !path.read().trim().is_empty();

    rsx! {
        section { class: "error-screen",
            h2 { "Could not start the quiz" }
            p { class: "error-message", "{message}" }
            label { r#for: "file-input", "Local JSON file" }
            input {
                id: "file-input",
                r#type: "text",
                placeholder: "path/to/quizzes.json",
                value: "{path}",
                oninput: move |evt| path.set(evt.value()),
            }
            button {
                id: "load-button",
                class: "primary",
                disabled: !can_load,
                onclick: move |_| on_load.call(path.read().trim().to_string()),
                "Load"
            }
        }
    }
}
