//! Request and response DTOs for the housing endpoints.
//!
//! Successful estimates are serialized straight from
//! [`HousingPricingResponse`](crate::domain::housing::HousingPricingResponse);
//! only the query and the error/health bodies live here.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;
use crate::domain::housing::Location;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query string of `GET /housing/pricing`. All three parameters are required.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingQuery {
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

impl PricingQuery {
    /// Trims each parameter and builds the location, rejecting empty values.
    pub fn into_location(self) -> Result<Location, ValidationError> {
        Location::new(&self.neighborhood, &self.city, &self.state)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
