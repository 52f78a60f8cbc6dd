//! UpstreamCaller - Sends one prompt to the AI provider with retry.
//!
//! Each attempt is bounded by a time budget. Timeouts and provider failures
//! are retried with exponential backoff; anything else fails immediately.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::domain::housing::{EstimationError, EstimationErrorKind, EstimationStage};
use crate::ports::{AIError, AIProvider, CompletionRequest, RequestMetadata};

/// Classified failure of an upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamFailure {
    /// The attempt ran out of time.
    #[error("{0}")]
    Timeout(String),

    /// The provider (or the network path to it) rejected or failed the call.
    #[error("{0}")]
    Upstream(String),

    /// The provider answered with something unusable.
    #[error("{0}")]
    Unexpected(String),
}

impl UpstreamFailure {
    pub fn kind(&self) -> EstimationErrorKind {
        match self {
            UpstreamFailure::Timeout(_) => EstimationErrorKind::Timeout,
            UpstreamFailure::Upstream(_) => EstimationErrorKind::UpstreamError,
            UpstreamFailure::Unexpected(_) => EstimationErrorKind::Unexpected,
        }
    }

    /// Only timeouts and provider failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, UpstreamFailure::Unexpected(_))
    }
}

impl From<AIError> for UpstreamFailure {
    fn from(err: AIError) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            UpstreamFailure::Timeout(message)
        } else if err.is_provider_failure() {
            UpstreamFailure::Upstream(message)
        } else {
            UpstreamFailure::Unexpected(message)
        }
    }
}

impl From<UpstreamFailure> for EstimationError {
    fn from(failure: UpstreamFailure) -> Self {
        let kind = failure.kind();
        let detail = match failure {
            UpstreamFailure::Timeout(m)
            | UpstreamFailure::Upstream(m)
            | UpstreamFailure::Unexpected(m) => m,
        };
        EstimationError::new(EstimationStage::UpstreamCall, kind, detail)
    }
}

/// Per-call settings for the upstream caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamSettings {
    /// Time budget for a single attempt.
    pub timeout: Duration,
    /// Token cap passed to the provider.
    pub max_tokens: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub base_delay: Duration,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_tokens: 4096,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Calls the AI provider with per-attempt timeouts and exponential backoff.
pub struct UpstreamCaller {
    provider: Arc<dyn AIProvider>,
    settings: UpstreamSettings,
}

impl UpstreamCaller {
    pub fn new(provider: Arc<dyn AIProvider>, settings: UpstreamSettings) -> Self {
        Self { provider, settings }
    }

    /// Delay before retry `retry` (0-indexed): `base_delay * 2^retry`.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        self.settings
            .base_delay
            .saturating_mul(2u32.saturating_pow(retry))
    }

    /// Sends `prompt` as a single user message and returns the text of the
    /// first content block, unmodified.
    ///
    /// Makes at most `max_retries + 1` attempts. On exhaustion the last
    /// failure is returned.
    pub async fn call(
        &self,
        prompt: &str,
        max_retries: u32,
        metadata: RequestMetadata,
    ) -> Result<String, UpstreamFailure> {
        let mut retry = 0;
        loop {
            let failure = match self.attempt(prompt, metadata).await {
                Ok(text) => return Ok(text),
                Err(failure) => failure,
            };

            if !failure.is_retryable() {
                return Err(failure);
            }

            if retry >= max_retries {
                tracing::error!(
                    estimate_id = %metadata.estimate_id,
                    attempts = retry + 1,
                    kind = %failure.kind(),
                    "Upstream call failed after all retries: {}",
                    failure
                );
                return Err(failure);
            }

            let delay = self.backoff_delay(retry);
            tracing::warn!(
                estimate_id = %metadata.estimate_id,
                attempt = retry + 1,
                kind = %failure.kind(),
                delay_ms = millis_saturating(delay),
                "Upstream call failed, retrying: {}",
                failure
            );
            tokio::time::sleep(delay).await;
            retry += 1;
        }
    }

    async fn attempt(
        &self,
        prompt: &str,
        metadata: RequestMetadata,
    ) -> Result<String, UpstreamFailure> {
        let request = CompletionRequest::new(metadata)
            .with_user_message(prompt)
            .with_max_tokens(self.settings.max_tokens)
            .with_timeout(self.settings.timeout);

        let response = tokio::time::timeout(self.settings.timeout, self.provider.complete(request))
            .await
            .map_err(|_| UpstreamFailure::from(AIError::timeout(self.settings.timeout)))??;

        tracing::debug!(
            estimate_id = %metadata.estimate_id,
            model = %response.model,
            blocks = response.content.len(),
            "Upstream call returned"
        );

        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| {
                UpstreamFailure::Unexpected("model response contained no text content".to_string())
            })
    }
}

/// Whole milliseconds in `delay`, clamped to `u64::MAX`.
fn millis_saturating(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError, MockResponse};
    use crate::domain::foundation::EstimateId;
    use crate::ports::ContentBlock;
    use tokio::time::Instant;

    fn metadata() -> RequestMetadata {
        RequestMetadata::new(EstimateId::new())
    }

    fn caller(provider: &MockAIProvider) -> UpstreamCaller {
        UpstreamCaller::new(Arc::new(provider.clone()), UpstreamSettings::default())
    }

    fn unavailable() -> MockError {
        MockError::Unavailable {
            message: "overloaded".to_string(),
        }
    }

    #[test]
    fn backoff_doubles_from_base_delay() {
        let caller = caller(&MockAIProvider::new());
        assert_eq!(caller.backoff_delay(0), Duration::from_secs(1));
        assert_eq!(caller.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(caller.backoff_delay(2), Duration::from_secs(4));
    }

    #[test]
    fn logged_delay_clamps_rather_than_truncates() {
        assert_eq!(millis_saturating(Duration::from_secs(2)), 2_000);
        assert_eq!(millis_saturating(Duration::MAX), u64::MAX);
        // 2^64 ms would wrap to 0 under a plain `as` cast.
        let just_past_u64 = Duration::from_millis(u64::MAX) + Duration::from_millis(1);
        assert_eq!(millis_saturating(just_past_u64), u64::MAX);
    }

    #[test]
    fn ai_errors_are_classified() {
        let timeout: UpstreamFailure = AIError::timeout(Duration::from_secs(60)).into();
        assert_eq!(timeout.kind(), EstimationErrorKind::Timeout);

        for err in [
            AIError::rate_limited(30),
            AIError::unavailable("down"),
            AIError::AuthenticationFailed,
            AIError::network("reset"),
            AIError::InvalidRequest("bad".to_string()),
            AIError::ContextTooLong("too long".to_string()),
        ] {
            let failure: UpstreamFailure = err.into();
            assert_eq!(failure.kind(), EstimationErrorKind::UpstreamError);
            assert!(failure.is_retryable());
        }

        let parse: UpstreamFailure = AIError::parse("bad body").into();
        assert_eq!(parse.kind(), EstimationErrorKind::Unexpected);
        assert!(!parse.is_retryable());
    }

    #[test]
    fn failure_becomes_upstream_stage_error_with_original_message() {
        let err: EstimationError = UpstreamFailure::Upstream("provider unavailable: down".into()).into();
        assert_eq!(err.stage(), EstimationStage::UpstreamCall);
        assert_eq!(err.kind(), EstimationErrorKind::UpstreamError);
        assert_eq!(err.detail(), "provider unavailable: down");
    }

    #[tokio::test(start_paused = true)]
    async fn returns_first_text_block_unmodified() {
        let provider = MockAIProvider::new().with_response("  {\"a\": 1}  ");

        let text = caller(&provider).call("prompt", 2, metadata()).await.unwrap();

        assert_eq!(text, "  {\"a\": 1}  ");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sends_prompt_as_single_user_message() {
        let provider = MockAIProvider::new();

        caller(&provider).call("the prompt", 0, metadata()).await.unwrap();

        let request = &provider.get_calls()[0].request;
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "the prompt");
        assert_eq!(request.max_tokens, Some(4096));
        assert_eq!(request.timeout, Some(Duration::from_secs(60)));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_timeout_then_succeeds() {
        let provider = MockAIProvider::new()
            .with_error(MockError::Timeout { timeout_secs: 60 })
            .with_response("ok");

        let start = Instant::now();
        let text = caller(&provider).call("prompt", 2, metadata()).await.unwrap();

        assert_eq!(text, "ok");
        assert_eq!(provider.call_count(), 2);
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_retries_with_growing_delays() {
        let provider = MockAIProvider::new().with_fallback(MockResponse::Error(unavailable()));

        let err = caller(&provider).call("prompt", 2, metadata()).await.unwrap_err();

        assert_eq!(err.kind(), EstimationErrorKind::UpstreamError);
        assert!(err.to_string().contains("overloaded"));
        assert_eq!(provider.call_count(), 3);
        assert_eq!(
            provider.gaps_between_calls(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_makes_one_attempt() {
        let provider = MockAIProvider::new().with_fallback(MockResponse::Error(unavailable()));

        let err = caller(&provider).call("prompt", 0, metadata()).await.unwrap_err();

        assert_eq!(err.kind(), EstimationErrorKind::UpstreamError);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_hits_time_budget() {
        let provider = MockAIProvider::new().with_delay(Duration::from_secs(120));
        let caller = UpstreamCaller::new(
            Arc::new(provider.clone()),
            UpstreamSettings {
                timeout: Duration::from_secs(5),
                ..UpstreamSettings::default()
            },
        );

        let start = Instant::now();
        let err = caller.call("prompt", 1, metadata()).await.unwrap_err();

        assert_eq!(err.kind(), EstimationErrorKind::Timeout);
        assert_eq!(provider.call_count(), 2);
        // Two 5s budgets plus one 1s backoff.
        assert_eq!(start.elapsed(), Duration::from_secs(11));
    }

    #[tokio::test(start_paused = true)]
    async fn unexpected_failures_are_not_retried() {
        let provider = MockAIProvider::new()
            .with_error(MockError::Parse {
                message: "garbled".to_string(),
            })
            .with_response("never reached");

        let err = caller(&provider).call("prompt", 2, metadata()).await.unwrap_err();

        assert_eq!(err.kind(), EstimationErrorKind::Unexpected);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn response_without_text_is_unexpected() {
        let provider = MockAIProvider::new().with_mock_response(MockResponse::Blocks(vec![
            ContentBlock::Other("tool_use".to_string()),
        ]));

        let err = caller(&provider).call("prompt", 2, metadata()).await.unwrap_err();

        assert_eq!(err.kind(), EstimationErrorKind::Unexpected);
        assert_eq!(provider.call_count(), 1);
    }
}
