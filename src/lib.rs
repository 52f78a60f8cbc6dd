//! Housing Pricing - LLM-backed neighborhood price estimates
//!
//! This crate asks a large language model for a housing price estimate of a
//! neighborhood, pulls the JSON object out of the model's free-form reply and
//! validates it into a typed [`domain::housing::HousingPricingResponse`].

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
