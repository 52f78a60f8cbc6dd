//! HTTP handlers for housing endpoints.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::housing::{EstimationError, HousingPricingResponse};
use crate::ports::PricingEstimator;

use super::dto::{ErrorResponse, HealthResponse, PricingQuery};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the housing routes.
#[derive(Clone)]
pub struct HousingAppState {
    pub estimator: Arc<dyn PricingEstimator>,
}

impl HousingAppState {
    pub fn new(estimator: Arc<dyn PricingEstimator>) -> Self {
        Self { estimator }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health - Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /housing/pricing - Estimate housing prices for a location
///
/// The estimate runs on its own task so a panic inside it becomes a 500
/// instead of tearing down the connection.
pub async fn get_pricing(
    State(state): State<HousingAppState>,
    query: Result<Query<PricingQuery>, QueryRejection>,
) -> Result<Json<HousingPricingResponse>, HousingApiError> {
    let Query(query) = query?;
    let location = query.into_location().map_err(|e| {
        tracing::debug!(field = e.field(), "Rejected pricing query: {}", e);
        HousingApiError::EmptyParameter
    })?;

    let estimator = Arc::clone(&state.estimator);
    let response = tokio::spawn(async move { estimator.estimate(&location).await })
        .await
        .map_err(|e| {
            tracing::error!("Estimation task failed: {}", e);
            HousingApiError::Internal
        })??;

    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Error type for housing API responses.
#[derive(Debug)]
pub enum HousingApiError {
    /// A required query parameter is missing or undecodable.
    InvalidQuery(String),
    /// A query parameter is empty after trimming.
    EmptyParameter,
    /// The estimation pipeline failed.
    Estimation(EstimationError),
    /// Anything else.
    Internal,
}

impl From<QueryRejection> for HousingApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidQuery(rejection.body_text())
    }
}

impl From<EstimationError> for HousingApiError {
    fn from(err: EstimationError) -> Self {
        Self::Estimation(err)
    }
}

impl IntoResponse for HousingApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            HousingApiError::InvalidQuery(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new("INVALID_QUERY", reason),
            ),
            HousingApiError::EmptyParameter => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    "VALIDATION_FAILED",
                    "neighborhood, city, and state must be non-empty strings",
                ),
            ),
            // Already logged with its detail inside the estimate span.
            HousingApiError::Estimation(err) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse::new(
                    err.kind().code(),
                    format!("Upstream service error: {}", err.kind().label()),
                ),
            ),
            HousingApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("INTERNAL_ERROR", "Internal server error"),
            ),
        };

        (status, Json(body)).into_response()
    }
}
