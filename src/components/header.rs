use crate::utils::ThemeMode;
use dioxus::prelude::*;

#[component]
pub fn Header(theme_mode: ThemeMode, on_toggle_mode: EventHandler<()>) -> Element {
    let is_dark = theme_mode == ThemeMode::Dark;

    rsx! {
        header {
            class: "app-header",

            div {
                class: "app-header-inner",

                div {
                    class: "app-title",
                    span { class: "app-title-name", "modelgrid" }
                    span { class: "app-title-tag", "AI model comparison" }
                }

                button {
                    onclick: move |_| on_toggle_mode.call(()),
                    class: "mode-toggle",
                    title: if is_dark { "Switch to light mode" } else { "Switch to dark mode" },
                    if is_dark { "☀" } else { "☾" }
                }
            }
        }
    }
}
