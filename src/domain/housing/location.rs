//! Location value object.

use serde::Serialize;
use std::fmt;

use crate::domain::foundation::ValidationError;

/// The neighborhood/city/state triple an estimate is requested for.
///
/// Each field is trimmed on construction and must be non-empty afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    neighborhood: String,
    city: String,
    state: String,
}

impl Location {
    /// Creates a location, trimming surrounding whitespace from every field.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyField` naming the first field that is
    /// empty or whitespace-only.
    pub fn new(
        neighborhood: impl AsRef<str>,
        city: impl AsRef<str>,
        state: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            neighborhood: Self::required("neighborhood", neighborhood.as_ref())?,
            city: Self::required("city", city.as_ref())?,
            state: Self::required("state", state.as_ref())?,
        })
    }

    fn required(field: &str, value: &str) -> Result<String, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field(field));
        }
        Ok(trimmed.to_string())
    }

    pub fn neighborhood(&self) -> &str {
        &self.neighborhood
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.neighborhood, self.city, self.state)
    }
}
