//! EstimationService - Produces a housing price estimate for a location.
//!
//! Pipeline: build prompt, call the model (with retry), extract the JSON
//! object from its reply, validate it against the response schema.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::Instrument;

use super::upstream_caller::{UpstreamCaller, UpstreamSettings};
use crate::domain::foundation::EstimateId;
use crate::domain::housing::{
    build_pricing_prompt, extract_json_object, validate_response, EstimationError,
    HousingPricingResponse, Location,
};
use crate::ports::{AIProvider, PricingEstimator, RequestMetadata};

/// Tunables for an estimation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimationSettings {
    /// Token cap for the model's reply.
    pub max_tokens: u32,
    /// Time budget for each upstream attempt.
    pub timeout: Duration,
    /// Extra attempts after the first one fails.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
}

impl Default for EstimationSettings {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            timeout: Duration::from_secs(60),
            max_retries: 2,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Estimates housing prices by asking an AI provider.
pub struct EstimationService {
    caller: UpstreamCaller,
    max_retries: u32,
}

impl EstimationService {
    pub fn new(provider: Arc<dyn AIProvider>, settings: EstimationSettings) -> Self {
        let caller = UpstreamCaller::new(
            provider,
            UpstreamSettings {
                timeout: settings.timeout,
                max_tokens: settings.max_tokens,
                base_delay: settings.base_delay,
            },
        );
        Self {
            caller,
            max_retries: settings.max_retries,
        }
    }

    async fn run(
        &self,
        location: &Location,
        estimate_id: EstimateId,
    ) -> Result<HousingPricingResponse, EstimationError> {
        let prompt = build_pricing_prompt(location);

        let raw = self
            .caller
            .call(&prompt, self.max_retries, RequestMetadata::new(estimate_id))
            .await?;

        let json_text = extract_json_object(&raw)?;
        Ok(validate_response(json_text)?)
    }
}

#[async_trait]
impl PricingEstimator for EstimationService {
    async fn estimate(&self, location: &Location) -> Result<HousingPricingResponse, EstimationError> {
        let estimate_id = EstimateId::new();
        let span = tracing::info_span!(
            "estimate",
            %estimate_id,
            neighborhood = location.neighborhood(),
            city = location.city(),
            state = location.state(),
        );

        async {
            match self.run(location, estimate_id).await {
                Ok(response) => {
                    tracing::info!(
                        confidence_level = %response.confidence_level(),
                        "Estimate produced"
                    );
                    Ok(response)
                }
                Err(err) => {
                    tracing::warn!(
                        stage = %err.stage(),
                        kind = err.kind().code(),
                        "Estimate failed: {}",
                        err.detail()
                    );
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}
