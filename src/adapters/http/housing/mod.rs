//! HTTP adapter for housing endpoints.
//!
//! Exposes the pricing estimator via REST API:
//! - `GET /health` - Liveness probe
//! - `GET /housing/pricing` - Housing price estimate for a location

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, HealthResponse, PricingQuery};
pub use handlers::{HousingApiError, HousingAppState};
pub use routes::housing_router;
