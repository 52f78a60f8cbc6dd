//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - AI provider implementations (Anthropic, mock)
//! - `http` - REST API exposure via axum

pub mod ai;
pub mod http;

pub use ai::{AnthropicConfig, AnthropicProvider, MockAIProvider};
pub use http::{housing_router, HousingAppState};
