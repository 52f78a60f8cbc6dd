//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## AI Ports
//!
//! - `AIProvider` - Send a prompt to a language model and get text back
//!
//! ## Application Ports
//!
//! - `PricingEstimator` - Produce a validated pricing estimate for a location;
//!   the seam the HTTP adapter depends on

mod ai_provider;
mod pricing_estimator;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ContentBlock, Message,
    RequestMetadata,
};
pub use pricing_estimator::PricingEstimator;
