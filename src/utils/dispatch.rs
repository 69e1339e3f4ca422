use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::error::{DispatchError, GatewayError};
use super::openrouter::{StreamEvent, NO_RESPONSE_PLACEHOLDER};

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub tokens_used: u32,
}

pub type CompletionStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// Seam between the dispatcher and the HTTP gateway, so dispatch and
/// presentation logic can be exercised against stub backends.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn complete(&self, model_id: &str, prompt: &str) -> Result<Completion, GatewayError>;

    async fn stream_complete(
        &self,
        model_id: &str,
        prompt: &str,
    ) -> Result<CompletionStream, GatewayError>;
}

/// Final state of one model's request. Produced exactly once per model per
/// dispatch; elapsed time is wall-clock from request start to settle, and 0
/// for failures.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    Success {
        content: String,
        elapsed_ms: u64,
        tokens_used: u32,
    },
    Failure {
        elapsed_ms: u64,
        error: String,
    },
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Success { .. })
    }

    pub fn elapsed_ms(&self) -> u64 {
        match self {
            RequestOutcome::Success { elapsed_ms, .. } => *elapsed_ms,
            RequestOutcome::Failure { elapsed_ms, .. } => *elapsed_ms,
        }
    }
}

/// What the dispatcher reports back while a dispatch is in flight. Deltas
/// only ever precede the `Settled` for their model.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchUpdate {
    /// Accumulated content so far for a still-pending model.
    Delta { model_id: String, content: String },
    /// The model's request settled; sent exactly once per model.
    Settled {
        model_id: String,
        outcome: RequestOutcome,
    },
}

/// Fires one request per selected model, all initiated up front and each
/// awaited independently. Individual failures become per-model `Failure`
/// outcomes and never abort sibling requests.
pub struct Dispatcher {
    gateway: Arc<dyn Gateway>,
}

impl Dispatcher {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Validates preconditions, then starts every request and returns the
    /// update channel. The channel closes once every model has settled.
    pub fn dispatch(
        &self,
        prompt: &str,
        model_ids: &[String],
        streaming: bool,
    ) -> Result<mpsc::UnboundedReceiver<DispatchUpdate>, DispatchError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(DispatchError::EmptyPrompt);
        }
        if model_ids.is_empty() {
            return Err(DispatchError::EmptySelection);
        }

        debug!(models = model_ids.len(), streaming, "dispatching prompt");

        let (tx, rx) = mpsc::unbounded_channel();
        for model_id in model_ids {
            tokio::spawn(run_model_request(
                self.gateway.clone(),
                model_id.clone(),
                prompt.to_string(),
                streaming,
                tx.clone(),
            ));
        }

        Ok(rx)
    }
}

async fn run_model_request(
    gateway: Arc<dyn Gateway>,
    model_id: String,
    prompt: String,
    streaming: bool,
    tx: mpsc::UnboundedSender<DispatchUpdate>,
) {
    let started = Instant::now();

    let result = if streaming {
        let delta_model = model_id.clone();
        let delta_tx = tx.clone();
        stream_to_completion(gateway.as_ref(), &model_id, &prompt, move |content| {
            let _ = delta_tx.send(DispatchUpdate::Delta {
                model_id: delta_model.clone(),
                content: content.to_string(),
            });
        })
        .await
    } else {
        gateway.complete(&model_id, &prompt).await
    };

    let outcome = match result {
        Ok(completion) => RequestOutcome::Success {
            content: completion.content,
            elapsed_ms: started.elapsed().as_millis() as u64,
            tokens_used: completion.tokens_used,
        },
        Err(error) => {
            warn!(model = %model_id, "model request failed: {error}");
            RequestOutcome::Failure {
                elapsed_ms: 0,
                error: error.to_string(),
            }
        }
    };

    // Receiver dropped means the dispatch was abandoned; nothing to do.
    let _ = tx.send(DispatchUpdate::Settled { model_id, outcome });
}

/// Drains a streaming response, surfacing the accumulated content after every
/// delta and folding usage frames into the final count. An empty accumulation
/// finalizes as the placeholder string.
async fn stream_to_completion(
    gateway: &dyn Gateway,
    model_id: &str,
    prompt: &str,
    mut on_delta: impl FnMut(&str),
) -> Result<Completion, GatewayError> {
    let mut stream = gateway.stream_complete(model_id, prompt).await?;

    let mut content = String::new();
    let mut tokens_used = 0u32;

    while let Some(event) = stream.next().await {
        match event {
            StreamEvent::Content(chunk) => {
                content.push_str(&chunk);
                on_delta(&content);
            }
            StreamEvent::Usage(total) => tokens_used = total,
            StreamEvent::Done => break,
            StreamEvent::Error(message) => return Err(GatewayError::Api(message)),
        }
    }

    if content.is_empty() {
        content = NO_RESPONSE_PLACEHOLDER.to_string();
    }

    Ok(Completion {
        content,
        tokens_used,
    })
}
