//! Pricing Estimator Port - Entry point to the estimation pipeline.
//!
//! HTTP handlers depend on this trait rather than on the concrete service,
//! so the transport layer can be exercised with a stub.

use async_trait::async_trait;

use crate::domain::housing::{EstimationError, HousingPricingResponse, Location};

/// Port for producing housing price estimates.
#[async_trait]
pub trait PricingEstimator: Send + Sync {
    /// Estimate price ranges for a location.
    ///
    /// Every failure is reported as an `EstimationError` carrying one of the
    /// classified kinds.
    async fn estimate(&self, location: &Location) -> Result<HousingPricingResponse, EstimationError>;
}
