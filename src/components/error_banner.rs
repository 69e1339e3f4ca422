use dioxus::prelude::*;

/// Transient catalog-level failure banner. The owner clears the message
/// after a few seconds; rendering is plain text only.
#[component]
pub fn ErrorBanner(message: Option<String>) -> Element {
    let Some(text) = message else {
        return rsx! { Fragment {} };
    };

    rsx! {
        div {
            class: "error-banner",
            "{text}"
        }
    }
}
