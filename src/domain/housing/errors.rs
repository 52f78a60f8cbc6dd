//! Uniform estimation error.
//!
//! Each pipeline stage fails in its own vocabulary. `EstimationError` is what
//! callers above the estimation service see: the stage that failed, the
//! classified kind, and the original detail text.

use std::fmt;

use super::{ExtractionError, ResponseValidationError};

/// Pipeline stage that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EstimationStage {
    UpstreamCall,
    Extraction,
    Validation,
}

impl fmt::Display for EstimationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EstimationStage::UpstreamCall => "upstream_call",
            EstimationStage::Extraction => "extraction",
            EstimationStage::Validation => "validation",
        };
        f.write_str(s)
    }
}

/// Classified failure kinds. Every failure path maps to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EstimationErrorKind {
    Timeout,
    UpstreamError,
    NoJsonFound,
    MalformedJson,
    SchemaValidationFailed,
    Unexpected,
}

impl EstimationErrorKind {
    /// Short human-readable label, safe to show to API clients.
    pub fn label(&self) -> &'static str {
        match self {
            EstimationErrorKind::Timeout => "upstream timeout",
            EstimationErrorKind::UpstreamError => "upstream error",
            EstimationErrorKind::NoJsonFound => "no JSON object found",
            EstimationErrorKind::MalformedJson => "malformed JSON",
            EstimationErrorKind::SchemaValidationFailed => "response validation failed",
            EstimationErrorKind::Unexpected => "unexpected error",
        }
    }

    /// Machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            EstimationErrorKind::Timeout => "TIMEOUT",
            EstimationErrorKind::UpstreamError => "UPSTREAM_ERROR",
            EstimationErrorKind::NoJsonFound => "NO_JSON_FOUND",
            EstimationErrorKind::MalformedJson => "MALFORMED_JSON",
            EstimationErrorKind::SchemaValidationFailed => "SCHEMA_VALIDATION_FAILED",
            EstimationErrorKind::Unexpected => "UNEXPECTED",
        }
    }
}

impl fmt::Display for EstimationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The only failure type returned by the estimation service.
///
/// Displays as `"<kind label>: <detail>"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct EstimationError {
    stage: EstimationStage,
    kind: EstimationErrorKind,
    detail: String,
}

impl EstimationError {
    pub fn new(stage: EstimationStage, kind: EstimationErrorKind, detail: impl Into<String>) -> Self {
        Self {
            stage,
            kind,
            detail: detail.into(),
        }
    }

    pub fn stage(&self) -> EstimationStage {
        self.stage
    }

    pub fn kind(&self) -> EstimationErrorKind {
        self.kind
    }

    /// Original failure text from the stage that raised it.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<ExtractionError> for EstimationError {
    fn from(err: ExtractionError) -> Self {
        let kind = match err {
            ExtractionError::NoJsonFound => EstimationErrorKind::NoJsonFound,
        };
        EstimationError::new(EstimationStage::Extraction, kind, err.to_string())
    }
}

impl From<ResponseValidationError> for EstimationError {
    fn from(err: ResponseValidationError) -> Self {
        let kind = match err {
            ResponseValidationError::MalformedJson(_) => EstimationErrorKind::MalformedJson,
            ResponseValidationError::SchemaValidationFailed(_) => {
                EstimationErrorKind::SchemaValidationFailed
            }
        };
        EstimationError::new(EstimationStage::Validation, kind, err.to_string())
    }
}
