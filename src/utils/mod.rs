mod board;
mod catalog;
mod dispatch;
mod error;
mod formatting;
mod openrouter;
mod selection;
mod settings;

pub use board::{CardState, ResponseBoard, ResponseCard};
pub use catalog::{provider_label, Model, ModelCatalog};
pub use dispatch::{
    Completion, CompletionStream, DispatchUpdate, Dispatcher, Gateway, RequestOutcome,
};
pub use error::{DispatchError, GatewayError};
pub use formatting::{parse_message_content, ContentSegment};
pub use openrouter::{
    OpenRouterClient, StreamEvent, MAX_OUTPUT_TOKENS, NO_RESPONSE_PLACEHOLDER,
    SAMPLING_TEMPERATURE,
};
pub use selection::ModelSelector;
pub use settings::{Settings, SettingsError, ThemeMode};
