//! Anthropic Provider - Implementation of AIProvider for Anthropic's Messages API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-sonnet-4-5-20250929")
//!     .with_base_url("https://api.anthropic.com");
//!
//! let provider = AnthropicProvider::new(config)?;
//! ```
//!
//! Each call makes a single HTTP request. Transient failures are classified
//! into [`AIError`] variants and surfaced to the caller, which owns retries.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ContentBlock};

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "claude-sonnet-4-5-20250929").
    pub model: String,
    /// Base URL for the API (default: https://api.anthropic.com).
    pub base_url: String,
    /// Default request timeout, used when a request carries none.
    pub timeout: Duration,
    /// Default max tokens, used when a request carries none.
    pub max_tokens: u32,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-5-20250929".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(60),
            max_tokens: 4096,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the default max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Anthropic API provider implementation.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `AIError::InvalidRequest` if the HTTP client cannot be built.
    pub fn new(config: AnthropicConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the messages endpoint URL.
    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts our request to Anthropic's format.
    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        let messages = request
            .messages
            .iter()
            .map(|msg| AnthropicMessage {
                role: "user",
                content: msg.content.clone(),
            })
            .collect();

        AnthropicRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
        }
    }

    /// Sends a request.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let anthropic_request = self.to_anthropic_request(request);
        let timeout = request.timeout.unwrap_or(self.config.timeout);

        self.client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .timeout(timeout)
            .json(&anthropic_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::timeout(timeout)
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(classify_status(status.as_u16(), error_body))
    }

    /// Parses a non-streaming response.
    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let response = self.handle_response_status(response).await?;

        let anthropic_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        Ok(anthropic_response.into())
    }
}

/// Maps a non-success HTTP status to an error.
fn classify_status(status: u16, error_body: String) -> AIError {
    match status {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(parse_retry_after(&error_body)),
        400 => {
            if error_body.contains("prompt is too long") {
                AIError::ContextTooLong(error_message(&error_body))
            } else {
                AIError::InvalidRequest(error_message(&error_body))
            }
        }
        500..=599 => AIError::unavailable(format!(
            "Server error {}: {}",
            status,
            error_message(&error_body)
        )),
        _ => AIError::network(format!(
            "Unexpected status {}: {}",
            status,
            error_message(&error_body)
        )),
    }
}

/// Pulls `error.message` out of an Anthropic error body, falling back to the raw body.
fn error_message(error_body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(error_body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| error_body.to_string())
}

/// Parses retry-after from error response.
fn parse_retry_after(error_body: &str) -> u32 {
    let message = error_message(error_body);
    if let Some(idx) = message.find("try again in ") {
        let rest = &message[idx + "try again in ".len()..];
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Ok(secs) = digits.parse::<u32>() {
            return secs;
        }
    }
    60
}

impl From<AnthropicResponse> for CompletionResponse {
    fn from(response: AnthropicResponse) -> Self {
        let content = response
            .content
            .into_iter()
            .map(|block| match (block.block_type.as_str(), block.text) {
                ("text", Some(text)) => ContentBlock::Text(text),
                (other, _) => ContentBlock::Other(other.to_string()),
            })
            .collect();

        CompletionResponse {
            content,
            model: response.model,
        }
    }
}

#[async_trait]
impl AIProvider for AnthropicProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send_request(&request).await?;
        self.parse_response(response).await
    }
}

// ----- Anthropic API Types -----

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    model: String,
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorContent,
}

#[derive(Debug, Deserialize)]
struct ErrorContent {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::EstimateId;
    use crate::ports::RequestMetadata;

    fn provider(config: AnthropicConfig) -> AnthropicProvider {
        AnthropicProvider::new(config).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(EstimateId::new()))
    }

    #[test]
    fn config_builder_works() {
        let config = AnthropicConfig::new("test-key")
            .with_model("claude-3-opus-20240229")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30))
            .with_max_tokens(1024);

        assert_eq!(config.model, "claude-3-opus-20240229");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn config_debug_does_not_leak_key() {
        let config = AnthropicConfig::new("sk-ant-secret");
        assert!(!format!("{:?}", config).contains("sk-ant-secret"));
    }

    #[test]
    fn messages_url_tolerates_trailing_slash() {
        let p = provider(AnthropicConfig::new("k").with_base_url("http://localhost:9000/"));
        assert_eq!(p.messages_url(), "http://localhost:9000/v1/messages");
    }

    #[test]
    fn request_conversion_uses_prompt_as_single_user_message() {
        let p = provider(AnthropicConfig::new("k").with_max_tokens(2048));
        let req = request().with_user_message("estimate this");
        let body = serde_json::to_value(p.to_anthropic_request(&req)).unwrap();

        assert_eq!(body["model"], "claude-sonnet-4-5-20250929");
        assert_eq!(body["max_tokens"], 2048);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "estimate this");
        assert_eq!(
            body.as_object().unwrap().len(),
            3,
            "only model, messages and max_tokens are sent"
        );
    }

    #[test]
    fn request_max_tokens_overrides_config_default() {
        let p = provider(AnthropicConfig::new("k"));
        let req = request().with_user_message("hi").with_max_tokens(10);
        let body = serde_json::to_value(p.to_anthropic_request(&req)).unwrap();

        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["max_tokens"], 10);
    }

    #[test]
    fn response_conversion_keeps_block_order() {
        let raw: AnthropicResponse = serde_json::from_str(
            r#"{
                "model": "claude-sonnet-4-5-20250929",
                "content": [
                    {"type": "text", "text": "```json\n{}\n```"},
                    {"type": "tool_use", "id": "x", "name": "y", "input": {}}
                ],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 120, "output_tokens": 80}
            }"#,
        )
        .unwrap();

        let response: CompletionResponse = raw.into();
        assert_eq!(response.first_text(), Some("```json\n{}\n```"));
        assert_eq!(response.content[1], ContentBlock::Other("tool_use".to_string()));
        assert_eq!(response.model, "claude-sonnet-4-5-20250929");
    }

    #[test]
    fn response_conversion_allows_empty_content() {
        let raw: AnthropicResponse = serde_json::from_str(
            r#"{"model": "m", "content": [], "stop_reason": "max_tokens",
                "usage": {"input_tokens": 1, "output_tokens": 1}}"#,
        )
        .unwrap();
        let response: CompletionResponse = raw.into();
        assert!(response.content.is_empty());
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn status_401_is_authentication_failure() {
        assert!(matches!(
            classify_status(401, String::new()),
            AIError::AuthenticationFailed
        ));
    }

    #[test]
    fn status_429_is_rate_limited_with_parsed_delay() {
        let body = r#"{"error":{"message":"Rate limit exceeded, try again in 12s"}}"#;
        assert!(matches!(
            classify_status(429, body.to_string()),
            AIError::RateLimited { retry_after_secs: 12 }
        ));
    }

    #[test]
    fn status_400_distinguishes_context_length() {
        let body = r#"{"error":{"type":"invalid_request_error","message":"prompt is too long: 210000 tokens"}}"#;
        assert!(matches!(
            classify_status(400, body.to_string()),
            AIError::ContextTooLong(_)
        ));

        let body = r#"{"error":{"message":"messages: field required"}}"#;
        match classify_status(400, body.to_string()) {
            AIError::InvalidRequest(msg) => assert_eq!(msg, "messages: field required"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn status_5xx_is_unavailable() {
        let err = classify_status(529, r#"{"error":{"message":"Overloaded"}}"#.to_string());
        assert!(matches!(err, AIError::Unavailable { .. }));
        assert!(err.to_string().contains("Overloaded"));
        assert!(err.is_provider_failure());
    }

    #[test]
    fn unexpected_status_is_network_error() {
        let err = classify_status(302, "moved".to_string());
        assert!(matches!(err, AIError::Network(_)));
    }

    #[test]
    fn parse_retry_after_default() {
        let error = r#"{"error":{"message":"Rate limit exceeded"}}"#;
        assert_eq!(parse_retry_after(error), 60);
        assert_eq!(parse_retry_after("not json"), 60);
    }
}
