use dioxus::prelude::*;

/// API key entry plus the catalog load trigger. The key is prefilled from
/// settings on startup; loading disables and relabels the button.
#[component]
pub fn KeyPanel(
    initial_key: String,
    is_loading: bool,
    on_load_models: EventHandler<String>,
) -> Element {
    let mut api_key = use_signal(|| initial_key);
    let loading = is_loading;

    rsx! {
        section {
            class: "key-panel",

            label {
                class: "field-label",
                r#for: "api-key",
                "OpenRouter API Key"
            }

            div {
                class: "key-panel-row",

                input {
                    id: "api-key",
                    r#type: "password",
                    value: "{api_key}",
                    oninput: move |evt| api_key.set(evt.value()),
                    placeholder: "sk-or-...",
                    class: "text-input",
                }

                button {
                    onclick: move |_| on_load_models.call(api_key.read().clone()),
                    disabled: loading,
                    class: "primary-button",
                    if loading { "Loading..." } else { "Load Models" }
                }
            }
        }
    }
}
