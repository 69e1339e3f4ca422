use dioxus::prelude::*;

/// Prompt entry, the streaming toggle, and the send affordance. Sending is
/// disabled proactively whenever the prompt is blank or `can_send` is false
/// (empty selection, or a load/dispatch already in flight).
#[component]
pub fn PromptPanel(can_send: bool, on_send: EventHandler<(String, bool)>) -> Element {
    let mut prompt = use_signal(String::new);
    let mut streaming_enabled = use_signal(|| false);

    let has_prompt = !prompt.read().trim().is_empty();
    let disabled = !has_prompt || !can_send;

    let submit = move |_| {
        let text = prompt.read().trim().to_string();
        if !text.is_empty() {
            on_send.call((text, *streaming_enabled.read()));
        }
    };

    rsx! {
        section {
            class: "prompt-panel",

            label {
                class: "field-label",
                r#for: "prompt-input",
                "Prompt"
            }

            textarea {
                id: "prompt-input",
                value: "{prompt}",
                oninput: move |evt| prompt.set(evt.value()),
                placeholder: "Ask every selected model the same question...",
                class: "prompt-textarea",
            }

            div {
                class: "prompt-panel-row",

                label {
                    class: "streaming-toggle",
                    input {
                        r#type: "checkbox",
                        checked: *streaming_enabled.read(),
                        onchange: move |evt| streaming_enabled.set(evt.checked()),
                    }
                    "Stream responses"
                }

                button {
                    onclick: submit,
                    disabled,
                    class: "primary-button",
                    "Send Prompt"
                }
            }
        }
    }
}
