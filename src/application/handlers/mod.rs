//! Application handlers.
//!
//! Services that orchestrate domain operations through ports.

pub mod housing;

pub use housing::{
    EstimationService, EstimationSettings, UpstreamCaller, UpstreamFailure, UpstreamSettings,
};
