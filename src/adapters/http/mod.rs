//! HTTP adapters - REST API implementations.

pub mod housing;

pub use housing::{housing_router, HousingAppState};
