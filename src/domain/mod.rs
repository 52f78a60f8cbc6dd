//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, validation errors)
//! - `housing` - Pricing estimate types, prompt rendering, and the
//!   extraction/validation pipeline for model output

pub mod foundation;
pub mod housing;
