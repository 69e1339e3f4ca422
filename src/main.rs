use dioxus::prelude::*;
use std::sync::Arc;
use tracing::{error, info, warn};

mod components;
mod utils;

use components::{ErrorBanner, Header, KeyPanel, ModelDropdown, PromptPanel, ResponseGrid};
use utils::{Dispatcher, GatewayError, ModelSelector, OpenRouterClient, ResponseBoard, Settings};

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    dioxus::launch(App);
}

/// Raise the transient banner and schedule its dismissal. A newer message
/// bumps the epoch so an older timer never clears it early.
fn show_banner(mut banner: Signal<Option<String>>, mut epoch: Signal<u64>, message: String) {
    let current = {
        let mut epoch = epoch.write();
        *epoch += 1;
        *epoch
    };
    banner.set(Some(message));

    spawn(async move {
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        if *epoch.read() == current {
            banner.set(None);
        }
    });
}

/// Fetch the catalog and replace the selector's view of it. Failures leave
/// the prior catalog and selection untouched.
fn fetch_catalog(
    gateway: Arc<OpenRouterClient>,
    mut selector: Signal<ModelSelector>,
    banner: Signal<Option<String>>,
    banner_epoch: Signal<u64>,
    mut is_loading: Signal<bool>,
) {
    is_loading.set(true);

    spawn(async move {
        match gateway.fetch_models().await {
            Ok(models) => {
                info!(count = models.len(), "loaded model catalog");
                selector.write().replace_catalog(models);
            }
            Err(e) => {
                error!("failed to load models: {e}");
                show_banner(banner, banner_epoch, e.to_string());
            }
        }
        is_loading.set(false);
    });
}

#[component]
fn App() -> Element {
    // Persisted state, loaded once at startup.
    let mut app_settings = use_signal(|| {
        Settings::load().unwrap_or_else(|e| {
            warn!("failed to load settings: {e}");
            Settings::default()
        })
    });

    // Gateway client, present once a key has been supplied.
    let mut client = use_signal(|| {
        app_settings.read().get_api_key().and_then(|key| {
            OpenRouterClient::new(key.to_string())
                .map(Arc::new)
                .map_err(|e| error!("failed to build gateway client: {e}"))
                .ok()
        })
    });

    // Core application state.
    let selector = use_signal(ModelSelector::new);
    let mut board = use_signal(ResponseBoard::new);
    let banner = use_signal(|| None::<String>);
    let banner_epoch = use_signal(|| 0u64);
    let is_loading_catalog = use_signal(|| false);
    let mut is_dispatching = use_signal(|| false);

    // A saved key triggers an automatic catalog load on startup.
    use_hook(|| {
        if let Some(gateway) = client.read().clone() {
            fetch_catalog(gateway, selector, banner, banner_epoch, is_loading_catalog);
        }
    });

    // Persist the key eagerly, then fetch. The key reaches disk before the
    // gateway has said anything about its validity.
    let load_models = move |api_key: String| {
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            show_banner(banner, banner_epoch, GatewayError::MissingCredential.to_string());
            return;
        }

        {
            let mut settings = app_settings.write();
            settings.set_api_key(api_key.clone());
            if let Err(e) = settings.save() {
                warn!("failed to save settings: {e}");
            }
        }

        let gateway = match OpenRouterClient::new(api_key) {
            Ok(gateway) => Arc::new(gateway),
            Err(e) => {
                show_banner(banner, banner_epoch, e.to_string());
                return;
            }
        };
        client.set(Some(gateway.clone()));

        fetch_catalog(gateway, selector, banner, banner_epoch, is_loading_catalog);
    };

    // One placeholder card per selected model, then updates streamed in as
    // each request settles on its own schedule.
    let send_prompt = move |(prompt, streaming): (String, bool)| {
        let Some(gateway) = client.read().clone() else {
            warn!("prompt submitted without a gateway client");
            return;
        };

        let selection = selector.read().selected().to_vec();
        let dispatcher = Dispatcher::new(gateway);

        match dispatcher.dispatch(&prompt, &selection, streaming) {
            Ok(mut rx) => {
                let generation = board.write().show_placeholders(&selection);
                is_dispatching.set(true);

                spawn(async move {
                    while let Some(update) = rx.recv().await {
                        board.write().apply(generation, update);
                    }
                    // Only the dispatch that still owns the board may clear
                    // the busy flag.
                    if board.read().generation() == Some(generation) {
                        is_dispatching.set(false);
                    }
                });
            }
            Err(e) => show_banner(banner, banner_epoch, e.to_string()),
        }
    };

    let toggle_mode = move |_| {
        let mut settings = app_settings.write();
        settings.theme_mode = settings.theme_mode.toggled();
        if let Err(e) = settings.save() {
            warn!("failed to save settings: {e}");
        }
    };

    let theme_mode = app_settings.read().theme_mode;
    let loading_catalog = *is_loading_catalog.read();
    let dispatching = *is_dispatching.read();
    let can_send = client.read().is_some()
        && !selector.read().selected().is_empty()
        && !loading_catalog
        && !dispatching;
    let initial_key = app_settings
        .read()
        .get_api_key()
        .unwrap_or_default()
        .to_string();
    let banner_message = banner.read().clone();

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        div {
            "data-theme": "{theme_mode.data_theme()}",
            class: "app-shell",

            Header {
                theme_mode,
                on_toggle_mode: toggle_mode,
            }

            main {
                class: "app-main",

                ErrorBanner { message: banner_message }

                KeyPanel {
                    initial_key,
                    is_loading: loading_catalog,
                    on_load_models: load_models,
                }

                ModelDropdown { selector }

                PromptPanel {
                    can_send,
                    on_send: send_prompt,
                }

                if dispatching {
                    div {
                        class: "loading-indicator",
                        span { class: "spinner" }
                        "Waiting for responses..."
                    }
                }

                ResponseGrid { board, selector }
            }
        }
    }
}
