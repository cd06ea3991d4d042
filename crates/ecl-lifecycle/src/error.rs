//! # Engine Errors
//!
//! Structural failures that reject a request outright. Readiness problems
//! are never errors; they surface in `ValidationResult`.

use thiserror::Error;

use ecl_core::{EclError, Stage};

/// Errors raised by the lifecycle engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The supplied stage identifier is not in the catalog.
    #[error("unknown stage: {value:?}")]
    UnknownStage {
        /// The offending identifier, verbatim.
        value: String,
    },

    /// The target stage is not reachable from the current stage in one step.
    #[error(
        "illegal transition {from} -> {to}; legal alternatives: [{}]",
        join_stages(.legal_alternatives)
    )]
    IllegalTransition {
        /// Current stage.
        from: Stage,
        /// Requested target stage.
        to: Stage,
        /// Every stage legally reachable from `from`, in graph order.
        legal_alternatives: Vec<Stage>,
    },

    /// A stage table or edge table failed its construction checks.
    #[error("stage catalog invariant violated: {0}")]
    CatalogInvariant(String),
}

impl From<EclError> for LifecycleError {
    fn from(err: EclError) -> Self {
        match err {
            EclError::UnknownStage(value) => Self::UnknownStage { value },
            other => Self::CatalogInvariant(other.to_string()),
        }
    }
}

fn join_stages(stages: &[Stage]) -> String {
    stages
        .iter()
        .map(Stage::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_transition_lists_alternatives() {
        let err = LifecycleError::IllegalTransition {
            from: Stage::Operational,
            to: Stage::Draft,
            legal_alternatives: vec![Stage::WarrantyActive, Stage::Maintenance, Stage::Retired],
        };
        assert_eq!(
            err.to_string(),
            "illegal transition operational -> draft; legal alternatives: [warranty_active, maintenance, retired]"
        );
    }

    #[test]
    fn test_unknown_stage_from_core_error() {
        let err: LifecycleError = EclError::UnknownStage("launched".into()).into();
        assert_eq!(
            err,
            LifecycleError::UnknownStage {
                value: "launched".into()
            }
        );
    }
}
