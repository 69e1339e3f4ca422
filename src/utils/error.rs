use thiserror::Error;

/// Failures talking to the inference gateway. Catalog-level instances surface
/// as a transient banner; per-model instances stay inside that model's card.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("Please enter your OpenRouter API key")]
    MissingCredential,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("OpenRouter error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse gateway response: {0}")]
    MalformedResponse(String),

    /// Error reported inside an otherwise successful response body or on a
    /// streaming frame.
    #[error("{0}")]
    Api(String),
}

/// Rejected before any network activity. The UI disables the send button in
/// these states, so these are a defensive second line.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Cannot send an empty prompt")]
    EmptyPrompt,

    #[error("No models selected")]
    EmptySelection,
}
