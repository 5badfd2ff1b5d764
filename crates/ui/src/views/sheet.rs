use dioxus::prelude::*;
use omr_core::model::AnswerZone;
use tracing::debug;

use crate::context::AppContext;
use crate::vm::{BubbleClick, BubbleVm, MainAction, RowVm, SheetIntent, map_sheet, run_intent};

use super::controls::ControlsPanel;
use super::report::ReportPanel;
use super::state::Notice;

#[component]
pub fn SheetView() -> Element {
    let ctx = use_context::<AppContext>();
    let sheet_service = ctx.sheet_service();

    let snapshot = use_signal(|| ctx.initial_snapshot());
    let notice = use_signal(|| None::<Notice>);
    let questions_input = use_signal(|| snapshot.peek().draft.questions.clone());
    let choices_input = use_signal(|| snapshot.peek().draft.choices.clone());

    let dispatch_intent = {
        let sheet_service = sheet_service.clone();
        use_callback(move |intent: SheetIntent| {
            let sheet_service = sheet_service.clone();
            let mut snapshot = snapshot;
            let mut notice = notice;
            let mut questions_input = questions_input;
            let mut choices_input = choices_input;
            spawn(async move {
                debug!(?intent, "dispatching sheet intent");
                let resets_controls = intent.resets_controls();
                let outcome = run_intent(&sheet_service, intent).await;
                notice.set(outcome.err().and_then(|err| Notice::from_error(&err)));
                let next = sheet_service.snapshot().await;
                if resets_controls {
                    questions_input.set(next.draft.questions.clone());
                    choices_input.set(next.draft.choices.clone());
                }
                snapshot.set(next);
            });
        })
    };

    let on_generate = use_callback(move |()| {
        dispatch_intent.call(SheetIntent::Generate {
            questions: questions_input(),
            choices: choices_input(),
        });
    });
    let on_draft_change = use_callback(move |()| {
        dispatch_intent.call(SheetIntent::SaveDraft {
            questions: questions_input(),
            choices: choices_input(),
        });
    });
    let on_select = use_callback(move |click: BubbleClick| {
        dispatch_intent.call(SheetIntent::Select(click));
    });

    let vm = map_sheet(&snapshot.read());
    let main_action = vm.main_action;

    rsx! {
        div { class: "page sheet-page",
            h2 { "OMR Answer Sheet" }

            if let Some(current) = notice() {
                div { class: "notice", role: "alert", "{current.message()}" }
            }

            if vm.show_controls {
                ControlsPanel {
                    questions: questions_input,
                    choices: choices_input,
                    on_generate,
                    on_draft_change,
                }
            } else {
                div { class: "{vm.sheet_class}",
                    div { class: "omr-sheet__headings",
                        if vm.show_user_heading {
                            h3 { class: "zone-heading", "Your Answers" }
                        }
                        if vm.show_key_heading {
                            h3 { class: "zone-heading", "Correct Key" }
                        }
                    }
                    for row in vm.rows.iter().cloned() {
                        QuestionRow { key: "{row.number_label}", row: row.clone(), on_select }
                    }
                }

                div { class: "sheet-actions",
                    button {
                        id: "main-action",
                        r#type: "button",
                        onclick: move |_| dispatch_intent.call(SheetIntent::Main(main_action)),
                        "{vm.main_action_label}"
                    }
                    if vm.show_edit {
                        button {
                            id: "edit-answers",
                            r#type: "button",
                            onclick: move |_| dispatch_intent.call(SheetIntent::Edit),
                            "Edit My Answers"
                        }
                    }
                    button {
                        id: "clear-all",
                        r#type: "button",
                        onclick: move |_| dispatch_intent.call(SheetIntent::ClearAll),
                        "Clear All"
                    }
                }

                if let Some(report) = vm.report.clone() {
                    ReportPanel { report }
                }
            }
        }
    }
}

#[component]
fn QuestionRow(row: RowVm, on_select: EventHandler<BubbleClick>) -> Element {
    let question = row.question;

    rsx! {
        div { class: "{row.class}",
            span { class: "question-number", "{row.number_label}" }
            div { class: "options options--user",
                for bubble in row.user_bubbles.iter().copied() {
                    Bubble {
                        bubble,
                        disabled: !row.user_enabled,
                        on_click: move |()| on_select.call(BubbleClick {
                            zone: AnswerZone::User,
                            question,
                            label: bubble.label,
                        }),
                    }
                }
            }
            if row.show_key {
                div { class: "options options--key",
                    for bubble in row.key_bubbles.iter().copied() {
                        Bubble {
                            bubble,
                            disabled: !row.key_enabled,
                            on_click: move |()| on_select.call(BubbleClick {
                                zone: AnswerZone::Key,
                                question,
                                label: bubble.label,
                            }),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn Bubble(bubble: BubbleVm, disabled: bool, on_click: EventHandler<()>) -> Element {
    rsx! {
        button {
            class: "{bubble.class()}",
            r#type: "button",
            disabled,
            onclick: move |_| on_click.call(()),
            "{bubble.label}"
        }
    }
}
