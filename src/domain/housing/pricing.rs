//! Pricing estimate value objects.
//!
//! [`HousingPricingResponse`] is the contract returned to API clients. It is
//! built once per request from validated model output and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Estimated price band in whole currency units.
///
/// `min <= median <= max` is expected of the model but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
    pub median: u64,
}

impl PriceRange {
    pub fn new(min: u64, max: u64, median: u64) -> Self {
        Self { min, max, median }
    }
}

/// How much the model trusts its own estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured housing price estimate for one location.
///
/// Deserialization goes through the same checks as [`HousingPricingResponse::new`],
/// so a value of this type always has at least one data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PricingRecord")]
pub struct HousingPricingResponse {
    neighborhood: String,
    city: String,
    state: String,
    price_range: PriceRange,
    confidence_level: ConfidenceLevel,
    data_sources: Vec<String>,
    summary: String,
    caveats: Vec<String>,
}

impl HousingPricingResponse {
    /// Creates a response.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidFormat` if `data_sources` is empty.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        neighborhood: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        price_range: PriceRange,
        confidence_level: ConfidenceLevel,
        data_sources: Vec<String>,
        summary: impl Into<String>,
        caveats: Vec<String>,
    ) -> Result<Self, ValidationError> {
        if data_sources.is_empty() {
            return Err(ValidationError::invalid_format(
                "data_sources",
                "must contain at least one entry",
            ));
        }

        Ok(Self {
            neighborhood: neighborhood.into(),
            city: city.into(),
            state: state.into(),
            price_range,
            confidence_level,
            data_sources,
            summary: summary.into(),
            caveats,
        })
    }

    pub fn neighborhood(&self) -> &str {
        &self.neighborhood
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn price_range(&self) -> &PriceRange {
        &self.price_range
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.confidence_level
    }

    pub fn data_sources(&self) -> &[String] {
        &self.data_sources
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn caveats(&self) -> &[String] {
        &self.caveats
    }
}

/// Wire shape of a response before invariants are checked.
#[derive(Deserialize)]
struct PricingRecord {
    neighborhood: String,
    city: String,
    state: String,
    price_range: PriceRange,
    confidence_level: ConfidenceLevel,
    data_sources: Vec<String>,
    summary: String,
    #[serde(default)]
    caveats: Vec<String>,
}

impl TryFrom<PricingRecord> for HousingPricingResponse {
    type Error = ValidationError;

    fn try_from(record: PricingRecord) -> Result<Self, Self::Error> {
        HousingPricingResponse::new(
            record.neighborhood,
            record.city,
            record.state,
            record.price_range,
            record.confidence_level,
            record.data_sources,
            record.summary,
            record.caveats,
        )
    }
}
