//! AI Provider Port - Interface for LLM provider integrations.
//!
//! This port abstracts the one thing the estimation pipeline needs from a
//! language model: send a prompt, get text back. Provider selection, API keys
//! and model identifiers stay inside adapters.
//!
//! # Design
//!
//! - Non-streaming completions only
//! - Single-turn user prompts
//! - Responses keep the provider's content blocks so callers can pick the first
//! - Error types for common failure modes (rate limits, timeouts, etc.)
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl AIProvider for EchoProvider {
//!     async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
//!         Ok(CompletionResponse {
//!             content: vec![ContentBlock::Text(request.messages[0].content.clone())],
//!             model: "echo-1".to_string(),
//!         })
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::foundation::EstimateId;

/// Port for AI/LLM provider interactions.
///
/// Implementations connect to external AI services and translate between the
/// provider-specific API and these types. Implementations make exactly one
/// attempt per call; retrying is the caller's decision.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;
}

/// Request for AI completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// User turns, in order. Estimates send exactly one.
    pub messages: Vec<Message>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Time budget for this single attempt.
    pub timeout: Option<Duration>,
    /// Request metadata for tracing.
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    /// Creates a new completion request with required metadata.
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            messages: Vec::new(),
            max_tokens: None,
            timeout: None,
            metadata,
        }
    }

    /// Appends a user message.
    pub fn with_user_message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message {
            content: content.into(),
        });
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Sets the per-attempt time budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub content: String,
}

/// Request metadata for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestMetadata {
    /// Estimate this completion belongs to.
    pub estimate_id: EstimateId,
}

impl RequestMetadata {
    /// Creates new request metadata.
    pub fn new(estimate_id: EstimateId) -> Self {
        Self { estimate_id }
    }
}

/// A single block of model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// Plain text output.
    Text(String),
    /// Any non-text block (tool use, thinking, ...), identified by its type.
    Other(String),
}

/// Response from AI completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Content blocks in provider order.
    pub content: Vec<ContentBlock>,
    /// Model that generated the response.
    pub model: String,
}

impl CompletionResponse {
    /// Text of the first content block, if that block is text.
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first() {
            Some(ContentBlock::Text(text)) => Some(text),
            _ => None,
        }
    }
}

/// AI provider errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Prompt exceeds model limit.
    #[error("context too long: {0}")]
    ContextTooLong(String),

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request rejected as invalid by the provider.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },
}

impl AIError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a timeout error.
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout {
            timeout_secs: timeout.as_secs(),
        }
    }

    /// Returns true if the call ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AIError::Timeout { .. })
    }

    /// Returns true if the provider, or the network path to it, failed the call.
    ///
    /// `Parse` is excluded: the provider answered, but with something this
    /// adapter could not read.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::ContextTooLong(_)
                | AIError::Unavailable { .. }
                | AIError::AuthenticationFailed
                | AIError::Network(_)
                | AIError::InvalidRequest(_)
        )
    }
}
