use crate::utils::{
    parse_message_content, provider_label, CardState, ContentSegment, ModelSelector,
    RequestOutcome, ResponseBoard,
};
use dioxus::prelude::*;

/// One card per model for the current dispatch, each updating independently
/// as its result or streaming increments arrive.
#[component]
pub fn ResponseGrid(
    board: ReadSignal<ResponseBoard>,
    selector: ReadSignal<ModelSelector>,
) -> Element {
    let cards: Vec<(String, String, &'static str, CardState)> = {
        let board = board.read();
        let state = selector.read();
        board
            .cards()
            .iter()
            .map(|card| {
                (
                    card.model_id.clone(),
                    state.catalog().display_name_for(&card.model_id).to_string(),
                    provider_label(&card.model_id),
                    card.state.clone(),
                )
            })
            .collect()
    };

    if cards.is_empty() {
        return rsx! { Fragment {} };
    }

    let grid_class = match cards.len() {
        0 | 1 => "response-grid",
        2 => "response-grid response-grid-2",
        3 => "response-grid response-grid-3",
        _ => "response-grid response-grid-4",
    };

    rsx! {
        section {
            class: "results-section",

            h2 { class: "results-title", "Responses" }

            div {
                class: "{grid_class}",

                for (model_id, display_name, provider, state) in cards.into_iter() {
                    ResponseCard {
                        key: "{model_id}",
                        display_name,
                        provider: provider.to_string(),
                        state,
                    }
                }
            }
        }
    }
}

#[component]
fn ResponseCard(display_name: String, provider: String, state: CardState) -> Element {
    let card_class = match &state {
        CardState::Pending | CardState::Streaming(_) => "response-card loading-response",
        CardState::Settled(outcome) if outcome.is_success() => "response-card success-response",
        CardState::Settled(_) => "response-card error-response",
    };

    rsx! {
        div {
            class: "{card_class}",

            div {
                class: "model-header",
                div { class: "model-title", "{display_name}" }
                div { class: "model-subtitle", "{provider}" }
            }

            div {
                class: "response-content",

                match &state {
                    CardState::Pending => rsx! {
                        div {
                            class: "pending-line",
                            span { class: "spinner" }
                            "Generating response..."
                        }
                    },
                    CardState::Streaming(content) => rsx! {
                        div { class: "streaming-text", "{content}" }
                    },
                    CardState::Settled(RequestOutcome::Success { content, .. }) => rsx! {
                        FormattedText { content: content.clone() }
                    },
                    // Error text is rendered as a plain text node, never markup.
                    CardState::Settled(RequestOutcome::Failure { error, .. }) => rsx! {
                        div { class: "error-text", "Error: {error}" }
                    },
                }
            }

            div {
                class: "response-footer",

                match &state {
                    CardState::Pending | CardState::Streaming(_) => rsx! {
                        span { "Processing..." }
                    },
                    CardState::Settled(RequestOutcome::Success { elapsed_ms, tokens_used, .. }) => rsx! {
                        span { "{elapsed_ms}ms" }
                        span { "{tokens_used} tokens" }
                    },
                    CardState::Settled(RequestOutcome::Failure { elapsed_ms, .. }) => rsx! {
                        span { "{elapsed_ms}ms" }
                    },
                }
            }
        }
    }
}

/// Model output rendered as text with code spans pulled out. Content never
/// reaches the DOM as markup.
#[component]
pub fn FormattedText(content: String) -> Element {
    let segments = parse_message_content(&content);

    rsx! {
        div {
            class: "formatted-text",

            for (index, segment) in segments.iter().enumerate() {
                match segment {
                    ContentSegment::Text(text) => rsx! {
                        span {
                            key: "{index}",
                            class: "text-segment",
                            "{text}"
                        }
                    },
                    ContentSegment::InlineCode(code) => rsx! {
                        code {
                            key: "{index}",
                            class: "inline-code",
                            "{code}"
                        }
                    },
                    ContentSegment::CodeBlock { language, code } => rsx! {
                        div {
                            key: "{index}",
                            class: "code-block",
                            if !language.is_empty() {
                                div { class: "code-block-language", "{language}" }
                            }
                            pre {
                                code { "{code}" }
                            }
                        }
                    },
                }
            }
        }
    }
}
