//! Shared error types for scoring operations

use crate::core::{Gender, MeasurementKind};
use thiserror::Error;

/// Main error type for bioscore operations
///
/// Every failure is reported synchronously to the caller as a value; the
/// engine never panics on bad input and never formats user-facing prose.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// A caller-supplied value failed validation
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Classifying an NLR with a zero lymphocyte count
    #[error("lymphocyte count must be greater than zero")]
    DivisionByZero,

    /// No reference band covers a measurement for its (kind, gender) pair
    #[error("no reference range for {kind} = {value} ({gender})")]
    MissingRangeTable {
        kind: MeasurementKind,
        gender: Gender,
        value: f64,
    },

    /// Submitter has spent their scoring quota
    #[error("submission quota exhausted: {used} of {limit} used")]
    QuotaExhausted { used: u32, limit: u32 },

    /// Configuration or dataset structure errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO errors at the loading edges
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Reference dataset parse errors
    #[error("failed to parse reference tables: {0}")]
    TableParse(#[from] toml::de::Error),
}

impl ScoreError {
    /// Create an invalid-input error for a named field
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Create a missing-range error for an uncovered measurement
    pub fn missing_range(kind: MeasurementKind, gender: Gender, value: f64) -> Self {
        Self::MissingRangeTable {
            kind,
            gender,
            value,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, ScoreError>;
