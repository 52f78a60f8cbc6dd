//! Axum router configuration for housing endpoints.

use axum::{routing::get, Router};

use super::handlers::{get_pricing, health, HousingAppState};

/// Create the housing API router.
///
/// # Routes
///
/// - `GET /health` - Liveness probe
/// - `GET /housing/pricing` - Price estimate for `neighborhood`, `city`, `state`
///
/// # Example
///
/// ```ignore
/// use crate::adapters::http::housing::{housing_router, HousingAppState};
///
/// let app = housing_router().with_state(HousingAppState::new(estimator));
/// ```
pub fn housing_router() -> Router<HousingAppState> {
    Router::new()
        .route("/health", get(health))
        .route("/housing/pricing", get(get_pricing))
}
