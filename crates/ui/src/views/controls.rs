use dioxus::prelude::*;

use crate::vm::CHOICE_OPTIONS;

/// Question/choice inputs shown while no sheet is generated.
#[component]
pub(super) fn ControlsPanel(
    questions: Signal<String>,
    choices: Signal<String>,
    on_generate: EventHandler<()>,
    on_draft_change: EventHandler<()>,
) -> Element {
    let mut questions = questions;
    let mut choices = choices;
    let current_choices = choices();

    rsx! {
        div { class: "controls",
            label { r#for: "question-numbers", "Question numbers" }
            input {
                id: "question-numbers",
                r#type: "text",
                placeholder: "e.g. 1-10, 15, 20-25",
                value: "{questions}",
                oninput: move |evt| questions.set(evt.value()),
                onchange: move |_| on_draft_change.call(()),
            }
            label { r#for: "choice-count", "Choices" }
            select {
                id: "choice-count",
                value: "{current_choices}",
                onchange: move |evt| {
                    choices.set(evt.value());
                    on_draft_change.call(());
                },
                for count in CHOICE_OPTIONS {
                    option {
                        value: "{count}",
                        selected: current_choices == count.to_string(),
                        "{count}"
                    }
                }
            }
            button {
                id: "generate-sheet",
                r#type: "button",
                onclick: move |_| on_generate.call(()),
                "Generate Sheet"
            }
        }
    }
}
