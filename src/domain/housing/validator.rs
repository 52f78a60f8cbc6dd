//! Schema validation of extracted model output.

use thiserror::Error;

use super::HousingPricingResponse;

/// Errors produced while turning extracted JSON text into a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseValidationError {
    /// The text is not syntactically valid JSON.
    #[error("Invalid JSON in model response: {0}")]
    MalformedJson(String),

    /// Valid JSON that does not match the response schema.
    #[error("Response validation failed: {0}")]
    SchemaValidationFailed(String),
}

/// Parses `json_text` and maps it onto [`HousingPricingResponse`].
///
/// Parsing happens in two steps so that syntax errors and schema mismatches
/// are reported as different kinds. Unknown fields are ignored and a missing
/// `caveats` array defaults to empty.
///
/// # Errors
///
/// - `MalformedJson` if the text does not parse.
/// - `SchemaValidationFailed` if a required field is missing or mistyped,
///   `confidence_level` is not `low`/`medium`/`high`, or `data_sources` is
///   empty.
pub fn validate_response(json_text: &str) -> Result<HousingPricingResponse, ResponseValidationError> {
    let value: serde_json::Value = serde_json::from_str(json_text)
        .map_err(|e| ResponseValidationError::MalformedJson(e.to_string()))?;

    serde_json::from_value(value)
        .map_err(|e| ResponseValidationError::SchemaValidationFailed(e.to_string()))
}
