use crate::utils::ModelSelector;
use dioxus::prelude::*;

const CHIP_NAME_MAX: usize = 25;

fn chip_label(name: &str) -> String {
    if name.chars().count() > CHIP_NAME_MAX {
        let truncated: String = name.chars().take(CHIP_NAME_MAX).collect();
        format!("{truncated}...")
    } else {
        name.to_string()
    }
}

#[derive(Clone, PartialEq)]
struct OptionRow {
    id: String,
    name: String,
    provider: &'static str,
    selected: bool,
}

#[derive(Clone, PartialEq)]
struct ChipRow {
    id: String,
    label: String,
    full_name: String,
}

/// Searchable multi-select over the model catalog: filtered options, bulk
/// select/clear scoped to the filter, and one removable chip per selection.
#[component]
pub fn ModelDropdown(selector: Signal<ModelSelector>) -> Element {
    let mut selector = selector;
    let mut dropdown_open = use_signal(|| false);

    // Snapshot everything the view needs so no read borrow survives into the
    // event handlers below.
    let (search_term, options, chips, count_text, catalog_empty) = {
        let state = selector.read();

        let options: Vec<OptionRow> = state
            .visible()
            .iter()
            .map(|id| OptionRow {
                id: id.clone(),
                name: state.catalog().display_name_for(id).to_string(),
                provider: crate::utils::provider_label(id),
                selected: state.is_selected(id),
            })
            .collect();

        let chips: Vec<ChipRow> = state
            .selected()
            .iter()
            .map(|id| {
                let full_name = state.catalog().display_name_for(id).to_string();
                ChipRow {
                    id: id.clone(),
                    label: chip_label(&full_name),
                    full_name,
                }
            })
            .collect();

        let count_text = match state.selected().len() {
            0 => "No models selected".to_string(),
            1 => "1 model selected".to_string(),
            n => format!("{n} models selected"),
        };

        (
            state.search_term().to_string(),
            options,
            chips,
            count_text,
            state.catalog().is_empty(),
        )
    };

    rsx! {
        section {
            class: "model-dropdown",

            label {
                class: "field-label",
                r#for: "model-search",
                "Models"
            }

            div {
                class: "model-dropdown-header",

                input {
                    id: "model-search",
                    r#type: "text",
                    value: "{search_term}",
                    oninput: move |evt| selector.write().set_search_term(&evt.value()),
                    onfocus: move |_| dropdown_open.set(true),
                    placeholder: "Search models...",
                    class: "text-input",
                }

                button {
                    onclick: move |_| dropdown_open.set(!dropdown_open()),
                    class: "ghost-button",
                    if *dropdown_open.read() { "▲" } else { "▼" }
                }
            }

            if !chips.is_empty() {
                div {
                    class: "selected-chips",

                    for chip in chips.iter() {
                        {
                            let chip_id = chip.id.clone();
                            rsx! {
                                div {
                                    key: "{chip.id}",
                                    class: "selected-chip",
                                    span {
                                        class: "chip-name",
                                        title: "{chip.full_name}",
                                        "{chip.label}"
                                    }
                                    button {
                                        class: "chip-remove",
                                        onclick: move |_| selector.write().remove(&chip_id),
                                        "×"
                                    }
                                }
                            }
                        }
                    }
                }
            }

            if *dropdown_open.read() {
                div {
                    class: "model-dropdown-options",

                    div {
                        class: "model-dropdown-actions",
                        button {
                            class: "ghost-button",
                            onclick: move |_| selector.write().select_all_visible(),
                            "Select All"
                        }
                        button {
                            class: "ghost-button",
                            onclick: move |_| selector.write().clear_all_visible(),
                            "Clear All"
                        }
                    }

                    if catalog_empty {
                        div {
                            class: "model-dropdown-empty",
                            "No models available"
                        }
                    } else if options.is_empty() {
                        div {
                            class: "model-dropdown-empty",
                            "No models found matching your search."
                        }
                    } else {
                        div {
                            class: "model-option-list",

                            for option in options.iter() {
                                {
                                    let option_id = option.id.clone();
                                    let selected = option.selected;
                                    rsx! {
                                        button {
                                            key: "{option.id}",
                                            class: if selected { "model-option selected" } else { "model-option" },
                                            onclick: move |_| selector.write().toggle(&option_id, !selected),

                                            span {
                                                class: "model-option-mark",
                                                if selected { "✓" } else { "○" }
                                            }
                                            span {
                                                class: "model-option-info",
                                                span { class: "model-option-name", "{option.name}" }
                                                span { class: "model-option-provider", "{option.provider}" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            div {
                class: "selected-count",
                "{count_text}"
            }
        }
    }
}
