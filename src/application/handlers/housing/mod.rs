//! Housing price estimation handlers.

mod estimate_pricing;
mod upstream_caller;

pub use estimate_pricing::{EstimationService, EstimationSettings};
pub use upstream_caller::{UpstreamCaller, UpstreamFailure, UpstreamSettings};
