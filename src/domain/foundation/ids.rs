//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier attached to a single estimate request for log correlation.
///
/// Estimates are never persisted; the id only lives as long as the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EstimateId(Uuid);

impl EstimateId {
    /// Creates a new random EstimateId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an EstimateId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EstimateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EstimateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EstimateId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_ids_are_unique() {
        assert_ne!(EstimateId::new(), EstimateId::new());
    }

    #[test]
    fn estimate_id_round_trips_through_string() {
        let id = EstimateId::new();
        let parsed: EstimateId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn estimate_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<EstimateId>().is_err());
    }

    #[test]
    fn estimate_id_serializes_transparently() {
        let uuid = Uuid::new_v4();
        let id = EstimateId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
        assert_eq!(id.as_uuid(), &uuid);
    }
}
