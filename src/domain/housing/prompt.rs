//! Prompt rendering for pricing estimates.

use super::Location;

/// Proprietary listing datasets the model must be told it cannot see.
pub const DISALLOWED_SOURCES: [&str; 4] = ["MLS", "Zillow", "Redfin", "Realtor.com"];

/// Renders the instruction prompt for a location.
///
/// Pure: the same location always yields the same prompt. The embedded JSON
/// skeleton lists exactly the fields of `HousingPricingResponse`.
pub fn build_pricing_prompt(location: &Location) -> String {
    let neighborhood = location.neighborhood();
    let city = location.city();
    let state = location.state();
    let disallowed = DISALLOWED_SOURCES.join(", ");

    format!(
        r#"You are a housing market analysis assistant. Provide estimated housing pricing insights for the specified location.

Location:
- Neighborhood: {neighborhood}
- City: {city}
- State: {state}

IMPORTANT CONSTRAINTS:
- You do NOT have access to {disallowed}, or any proprietary housing datasets
- Base your estimates on general knowledge of the region, economic factors, and publicly known trends
- All pricing data must be framed as estimates with appropriate confidence levels
- Be transparent about the limitations of your estimates

Provide your response as a JSON object with this exact structure:
{{
  "neighborhood": "{neighborhood}",
  "city": "{city}",
  "state": "{state}",
  "price_range": {{
    "min": <integer>,
    "max": <integer>,
    "median": <integer>
  }},
  "confidence_level": "low" | "medium" | "high",
  "data_sources": [
    "list of estimation methods or knowledge sources used"
  ],
  "summary": "brief explanation of the pricing estimate",
  "caveats": [
    "important disclaimers or limitations"
  ]
}}

Return ONLY the JSON object, no additional text or formatting."#
    )
}
