//! Housing pricing domain.
//!
//! Turns a location into a prompt and turns the model's free-form reply back
//! into a validated [`HousingPricingResponse`]:
//!
//! ```text
//! Location ──► build_pricing_prompt ──► (upstream model) ──► raw text
//!                                                             │
//!          HousingPricingResponse ◄── validate_response ◄── extract_json_object
//! ```
//!
//! Every stage reports failures in its own vocabulary; [`EstimationError`]
//! is the single type those failures are folded into.

mod errors;
mod extractor;
mod location;
mod pricing;
mod prompt;
mod validator;

pub use errors::{EstimationError, EstimationErrorKind, EstimationStage};
pub use extractor::{extract_json_object, ExtractionError};
pub use location::Location;
pub use pricing::{ConfidenceLevel, HousingPricingResponse, PriceRange};
pub use prompt::{build_pricing_prompt, DISALLOWED_SOURCES};
pub use validator::{validate_response, ResponseValidationError};
