//! Mock AI Provider for testing.
//!
//! Provides a configurable mock implementation of the AIProvider port,
//! allowing tests to run without calling real AI APIs.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - A configurable fallback once the queue is empty
//! - Simulated delays for timeout testing
//! - Error injection for retry testing
//! - Call tracking (requests and the instant each call started)
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_error(MockError::Timeout { timeout_secs: 60 })
//!     .with_response(r#"{"neighborhood": "Downtown", ...}"#);
//!
//! let service = EstimationService::new(Arc::new(provider.clone()), settings);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ContentBlock};

/// Model id reported on every successful mock response.
const MOCK_MODEL: &str = "mock-model-1";

/// Mock AI provider for testing.
///
/// Clones share the response queue and call history.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Returned once `responses` is empty.
    fallback: MockResponse,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a single text block.
    Text(String),
    /// Return the given content blocks verbatim.
    Blocks(Vec<ContentBlock>),
    /// Return an error.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout reported by the provider's own client.
    Timeout { timeout_secs: u64 },
    /// Simulate an unreadable provider response.
    Parse { message: String },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
            MockError::Parse { message } => AIError::parse(message),
        }
    }
}

/// A request received by the mock, with the (tokio) instant it arrived.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub request: CompletionRequest,
    pub at: Instant,
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAIProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            fallback: MockResponse::Text("Mock response".to_string()),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful text response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.with_mock_response(MockResponse::Text(content.into()))
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.with_mock_response(MockResponse::Error(error))
    }

    /// Adds any configured response to the queue.
    pub fn with_mock_response(self, response: MockResponse) -> Self {
        lock(&self.responses).push_back(response);
        self
    }

    /// Sets what every call returns once the queue is exhausted.
    pub fn with_fallback(mut self, response: MockResponse) -> Self {
        self.fallback = response;
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Time between consecutive calls.
    pub fn gaps_between_calls(&self) -> Vec<Duration> {
        let calls = lock(&self.calls);
        calls
            .windows(2)
            .map(|pair| pair[1].at.duration_since(pair[0].at))
            .collect()
    }

    /// Gets the next response or the fallback.
    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        lock(&self.calls).push(RecordedCall {
            request,
            at: Instant::now(),
        });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let content = match self.next_response() {
            MockResponse::Text(text) => vec![ContentBlock::Text(text)],
            MockResponse::Blocks(blocks) => blocks,
            MockResponse::Error(err) => return Err(err.into()),
        };

        Ok(CompletionResponse {
            content,
            model: MOCK_MODEL.to_string(),
        })
    }
}
