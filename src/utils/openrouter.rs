use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::catalog::Model;
use super::dispatch::{Completion, CompletionStream, Gateway};
use super::error::GatewayError;

// ============================================================================
// Constants
// ============================================================================

const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
const APP_TITLE: &str = "modelgrid";
const APP_REFERER: &str = "https://github.com/modelgrid/modelgrid";

/// Bounded generation budget applied to every completion request.
pub const MAX_OUTPUT_TOKENS: u32 = 1000;
/// Sampling temperature applied to every completion request.
pub const SAMPLING_TEMPERATURE: f32 = 0.7;

// ============================================================================
// API Types - Request
// ============================================================================

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

impl ChatCompletionRequest {
    fn prompt(model_id: &str, prompt: &str, stream: bool) -> Self {
        Self {
            model: model_id.to_string(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: SAMPLING_TEMPERATURE,
            stream: stream.then_some(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

// ============================================================================
// API Types - Response
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub delta: Option<Delta>,
    /// Legacy completion shape some providers still return.
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub total_tokens: Option<u32>,
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
    #[serde(default)]
    pub completion_tokens: Option<u32>,
}

impl Usage {
    /// Aggregate token count, falling back to prompt + completion when the
    /// gateway reports no total.
    pub fn total(&self) -> u32 {
        match self.total_tokens {
            Some(total) if total > 0 => total,
            _ => self.prompt_tokens.unwrap_or(0) + self.completion_tokens.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ModelsResponse {
    data: Vec<Model>,
}

/// Shown when the gateway answers without any choices.
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response generated";
const NO_CONTENT_PLACEHOLDER: &str = "No content in response";

/// Fold a non-streaming response into content and a token count, applying
/// the documented fallback chain at every optional field.
pub fn extract_completion(response: &ChatCompletionResponse) -> Completion {
    let content = match response.choices.first() {
        None => NO_RESPONSE_PLACEHOLDER.to_string(),
        Some(choice) => choice
            .message
            .as_ref()
            .and_then(|m| m.content.as_deref())
            .filter(|c| !c.is_empty())
            .or(choice.text.as_deref().filter(|c| !c.is_empty()))
            .unwrap_or(NO_CONTENT_PLACEHOLDER)
            .to_string(),
    };

    Completion {
        content,
        tokens_used: response.usage.as_ref().map(Usage::total).unwrap_or(0),
    }
}

// ============================================================================
// Stream Event Types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// One incremental content delta.
    Content(String),
    /// Token usage reported on a frame; overwrites any earlier count.
    Usage(u32),
    /// The `data: [DONE]` terminator.
    Done,
    Error(String),
}

// ============================================================================
// OpenRouter Client
// ============================================================================

#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: Arc<String>,
}

impl PartialEq for OpenRouterClient {
    fn eq(&self, other: &Self) -> bool {
        self.api_key == other.api_key
    }
}

impl OpenRouterClient {
    pub fn new(api_key: String) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: Arc::new(api_key),
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{OPENROUTER_API_BASE}{path}"))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", APP_REFERER)
            .header("X-Title", APP_TITLE)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{OPENROUTER_API_BASE}{path}"))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", APP_REFERER)
            .header("X-Title", APP_TITLE)
            .header("Content-Type", "application/json")
    }

    /// List the models the gateway currently offers.
    pub async fn fetch_models(&self) -> Result<Vec<Model>, GatewayError> {
        let response = self
            .get("/models")
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let models: ModelsResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        Ok(models.data)
    }

    /// Single-shot completion for one model.
    pub async fn chat_completion(
        &self,
        model_id: &str,
        prompt: &str,
    ) -> Result<ChatCompletionResponse, GatewayError> {
        let request = ChatCompletionRequest::prompt(model_id, prompt, false);

        let response = self
            .post("/chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        if let Some(error) = &completion.error {
            return Err(GatewayError::Api(error.message.clone()));
        }

        Ok(completion)
    }

    /// Streaming completion for one model. Frames arrive as newline-delimited
    /// `data: <json>` SSE events and are re-assembled across arbitrary
    /// network chunk boundaries.
    pub async fn stream_chat_completion(
        &self,
        model_id: &str,
        prompt: &str,
    ) -> Result<CompletionStream, GatewayError> {
        let request = ChatCompletionRequest::prompt(model_id, prompt, true);

        let response = self
            .post("/chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let stream = futures::stream::unfold(
            (
                response.bytes_stream(),
                String::new(),
                VecDeque::<StreamEvent>::new(),
                false,
            ),
            |(mut bytes_stream, mut partial, mut pending, mut finished)| async move {
                loop {
                    if let Some(event) = pending.pop_front() {
                        return Some((event, (bytes_stream, partial, pending, finished)));
                    }

                    if finished {
                        return None;
                    }

                    match bytes_stream.next().await {
                        Some(Ok(bytes)) => {
                            partial.push_str(&String::from_utf8_lossy(&bytes));
                            pending.extend(parse_sse_from_buffer(&mut partial, false));
                        }
                        Some(Err(e)) => {
                            pending.push_back(StreamEvent::Error(format!("Stream error: {e}")));
                            finished = true;
                        }
                        None => {
                            pending.extend(parse_sse_from_buffer(&mut partial, true));
                            finished = true;
                        }
                    }
                }
            },
        );

        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl Gateway for OpenRouterClient {
    async fn complete(&self, model_id: &str, prompt: &str) -> Result<Completion, GatewayError> {
        let response = self.chat_completion(model_id, prompt).await?;
        Ok(extract_completion(&response))
    }

    async fn stream_complete(
        &self,
        model_id: &str,
        prompt: &str,
    ) -> Result<CompletionStream, GatewayError> {
        self.stream_chat_completion(model_id, prompt).await
    }
}

// ============================================================================
// Error Decoding
// ============================================================================

async fn status_error(response: reqwest::Response) -> GatewayError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    GatewayError::Status {
        status: status.as_u16(),
        message: gateway_message(&body, status),
    }
}

/// The gateway wraps failures as `{"error": {"message": ...}}`; fall back to
/// the raw body, then to the bare status line.
fn gateway_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            let message = value.get("error")?.get("message")?.as_str()?;
            Some(message.to_string())
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.to_string()
            }
        })
}

// ============================================================================
// SSE Parsing
// ============================================================================

fn parse_sse_from_buffer(buffer: &mut String, flush_remaining: bool) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    while let Some(newline_idx) = buffer.find('\n') {
        let line: String = buffer.drain(..=newline_idx).collect();
        parse_sse_line(&line, &mut events);
    }

    if flush_remaining && !buffer.trim().is_empty() {
        let line = std::mem::take(buffer);
        parse_sse_line(&line, &mut events);
    }

    events
}

fn parse_sse_line(line: &str, events: &mut Vec<StreamEvent>) {
    let line = line.trim();

    // Skip blank keep-alives and comment frames.
    if line.is_empty() || line.starts_with(':') {
        return;
    }

    let Some(data) = line.strip_prefix("data: ") else {
        return;
    };

    if data == "[DONE]" {
        events.push(StreamEvent::Done);
        return;
    }

    match serde_json::from_str::<ChatCompletionResponse>(data) {
        Ok(frame) => {
            if let Some(error) = frame.error {
                events.push(StreamEvent::Error(error.message));
                return;
            }

            if let Some(content) = frame
                .choices
                .first()
                .and_then(|choice| choice.delta.as_ref())
                .and_then(|delta| delta.content.as_ref())
            {
                if !content.is_empty() {
                    events.push(StreamEvent::Content(content.clone()));
                }
            }

            if let Some(usage) = &frame.usage {
                events.push(StreamEvent::Usage(usage.total()));
            }
        }
        Err(e) => {
            // Malformed frames are skipped, never fatal. Log the length only
            // to keep prompt and response contents out of the logs.
            warn!(payload_len = data.len(), "skipping unparseable SSE frame: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_sse_chunk(text: &str) -> Vec<StreamEvent> {
        let mut buffer = text.to_string();
        parse_sse_from_buffer(&mut buffer, true)
    }

    fn decode(json: &str) -> ChatCompletionResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extract_completion_message_content() {
        let response = decode(
            r#"{"choices":[{"message":{"content":"hi"}}],"usage":{"total_tokens":7}}"#,
        );
        let completion = extract_completion(&response);
        assert_eq!(completion.content, "hi");
        assert_eq!(completion.tokens_used, 7);
    }

    #[test]
    fn test_extract_completion_text_fallback() {
        let response = decode(r#"{"choices":[{"text":"legacy shape"}]}"#);
        assert_eq!(extract_completion(&response).content, "legacy shape");
    }

    #[test]
    fn test_extract_completion_placeholders() {
        let empty = decode(r#"{"choices":[]}"#);
        assert_eq!(extract_completion(&empty).content, NO_RESPONSE_PLACEHOLDER);

        let hollow = decode(r#"{"choices":[{"message":{"role":"assistant"}}]}"#);
        assert_eq!(extract_completion(&hollow).content, NO_CONTENT_PLACEHOLDER);
    }

    #[test]
    fn test_extract_completion_sums_split_token_counts() {
        let response = decode(
            r#"{"choices":[{"message":{"content":"x"}}],
                "usage":{"prompt_tokens":10,"completion_tokens":5}}"#,
        );
        assert_eq!(extract_completion(&response).tokens_used, 15);
    }

    #[test]
    fn test_parse_sse_done() {
        let events = parse_sse_chunk("data: [DONE]\n");
        assert_eq!(events, vec![StreamEvent::Done]);
    }

    #[test]
    fn test_parse_sse_comment_ignored() {
        assert!(parse_sse_chunk(": OPENROUTER PROCESSING\n").is_empty());
    }

    #[test]
    fn test_parse_sse_malformed_frame_skipped() {
        let events = parse_sse_chunk("data: {not json}\ndata: [DONE]\n");
        assert_eq!(events, vec![StreamEvent::Done]);
    }

    #[test]
    fn test_parse_sse_delta_and_usage() {
        let events = parse_sse_chunk(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\
             data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}],\"usage\":{\"total_tokens\":12}}\n\
             data: [DONE]\n",
        );
        assert_eq!(
            events,
            vec![
                StreamEvent::Content("Hel".to_string()),
                StreamEvent::Content("lo".to_string()),
                StreamEvent::Usage(12),
                StreamEvent::Done,
            ]
        );
    }

    #[test]
    fn test_parse_sse_buffered_split_chunks() {
        let mut buffer = String::new();
        buffer.push_str("data: {\"choices\":[{\"delta\":{\"content\":\"Hel");
        let events = parse_sse_from_buffer(&mut buffer, false);
        assert!(events.is_empty());

        buffer.push_str("lo\"}}]}\n");
        let events = parse_sse_from_buffer(&mut buffer, false);
        assert_eq!(events, vec![StreamEvent::Content("Hello".to_string())]);
    }

    #[test]
    fn test_gateway_message_fallbacks() {
        let status = StatusCode::UNAUTHORIZED;
        assert_eq!(
            gateway_message(r#"{"error":{"message":"bad key"}}"#, status),
            "bad key"
        );
        assert_eq!(gateway_message("plain body", status), "plain body");
        assert_eq!(gateway_message("", status), "HTTP 401 Unauthorized");
    }

    #[test]
    fn test_usage_total_fallback() {
        let usage = Usage {
            total_tokens: Some(0),
            prompt_tokens: Some(3),
            completion_tokens: Some(4),
        };
        assert_eq!(usage.total(), 7);

        let reported = Usage {
            total_tokens: Some(20),
            prompt_tokens: Some(3),
            completion_tokens: Some(4),
        };
        assert_eq!(reported.total(), 20);
    }
}
