//! # Error Types
//!
//! Parsing and construction failures for the foundational types. Engine
//! level failures (illegal transitions, catalog invariants) live in
//! `ecl-lifecycle`.

use thiserror::Error;

/// Top-level error type for `ecl-core`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EclError {
    /// The value is not one of the known stage identifiers.
    #[error("unknown stage: {0:?}")]
    UnknownStage(String),

    /// The value is not one of the known prerequisite identifiers.
    #[error("unknown prerequisite: {0:?}")]
    UnknownPrerequisite(String),

    /// The value is not one of the five integration domains.
    #[error("unknown integration domain: {0:?}")]
    UnknownIntegration(String),

    /// An identifier failed validation.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A timestamp could not be parsed or was not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_stage_names_value() {
        let err = EclError::UnknownStage("launched".into());
        assert_eq!(err.to_string(), "unknown stage: \"launched\"");
    }

    #[test]
    fn test_invalid_identifier_display() {
        let err = EclError::InvalidIdentifier("component id must not be empty".into());
        assert!(err.to_string().contains("must not be empty"));
    }
}
