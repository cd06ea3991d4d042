//! # Component Record
//!
//! A runtime view of one tracked component: its current stage, a version
//! counter, and the log of committed transitions. Storage belongs to the
//! host; this type only enforces the commit rules.
//!
//! ## Commit rules
//!
//! `try_transition` is validate-then-commit in one call:
//!
//! 1. The caller's `expected_version` must equal the record's version.
//!    Two writers that validated against the same version cannot both win.
//! 2. The move must be an edge of the [`TransitionGraph`](crate::TransitionGraph).
//! 3. Every prerequisite of the *target* stage must hold under the context.
//!
//! On success the stage changes, the version increments by one, and a
//! [`TransitionRecord`] is appended.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ecl_core::{ComponentId, Stage, Timestamp, TransitionId};

use crate::error::LifecycleError;
use crate::graph::EdgeKind;
use crate::prerequisites::{Prerequisite, PrerequisiteContext};
use crate::validation::WorkflowValidationService;

// ─── Transition Record ───────────────────────────────────────────────

/// One committed stage change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub id: TransitionId,
    pub from: Stage,
    pub to: Stage,
    /// Record version after this transition.
    pub version: u64,
    pub timestamp: Timestamp,
    pub note: Option<String>,
}

// ─── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// Unknown stage or illegal edge.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The record changed since the caller last read it.
    #[error("component {component_id} is at version {actual}, expected {expected}")]
    VersionConflict {
        component_id: ComponentId,
        expected: u64,
        actual: u64,
    },

    /// The target stage's prerequisites do not all hold.
    #[error("cannot enter {target}: {} prerequisite(s) unmet", .missing.len())]
    PrerequisitesUnmet {
        target: Stage,
        missing: Vec<Prerequisite>,
    },
}

// ─── The Record ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub id: ComponentId,
    pub stage: Stage,
    /// Starts at 0 and increases by one per committed transition.
    pub version: u64,
    pub created_at: Timestamp,
    history: Vec<TransitionRecord>,
}

impl ComponentRecord {
    /// A new component in the initial stage.
    pub fn new(id: ComponentId) -> Self {
        Self::at_stage(id, Stage::initial())
    }

    /// A component registered directly at `stage`, e.g. when importing
    /// hardware that already exists on site.
    pub fn at_stage(id: ComponentId, stage: Stage) -> Self {
        Self {
            id,
            stage,
            version: 0,
            created_at: Timestamp::now(),
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// Validate and commit a move to `target`.
    pub fn try_transition(
        &mut self,
        target: Stage,
        expected_version: u64,
        rules: &WorkflowValidationService<'_>,
        ctx: &dyn PrerequisiteContext,
        note: Option<String>,
    ) -> Result<&TransitionRecord, ComponentError> {
        if expected_version != self.version {
            return Err(ComponentError::VersionConflict {
                component_id: self.id.clone(),
                expected: expected_version,
                actual: self.version,
            });
        }
        rules.ensure_legal(self.stage, target)?;

        let missing = rules.missing_prerequisites(target, ctx);
        if !missing.is_empty() {
            return Err(ComponentError::PrerequisitesUnmet { target, missing });
        }

        let record = TransitionRecord {
            id: TransitionId::new(),
            from: self.stage,
            to: target,
            version: self.version + 1,
            timestamp: Timestamp::now(),
            note,
        };
        tracing::info!(
            component_id = %self.id,
            from = %record.from,
            to = %record.to,
            version = record.version,
            "component transition committed"
        );
        self.stage = target;
        self.version = record.version;
        let index = self.history.len();
        self.history.push(record);
        Ok(&self.history[index])
    }

    /// Summary metrics for the workflow overview.
    pub fn metrics(&self, rules: &WorkflowValidationService<'_>) -> serde_json::Value {
        let last_transition_at = self.history.last().map(|r| r.timestamp);
        let in_stage_since = last_transition_at.unwrap_or(self.created_at);
        serde_json::json!({
            "component_id": self.id,
            "current_stage": self.stage,
            "version": self.version,
            "transition_count": self.history.len(),
            "rollback_count": self
                .history
                .iter()
                .filter(|r| EdgeKind::classify(r.from, r.to) == EdgeKind::Rollback)
                .count(),
            "workflow_completion": rules.completion_percent(self.stage),
            "created_at": self.created_at,
            "first_transition_at": self.history.first().map(|r| r.timestamp),
            "last_transition_at": last_transition_at,
            "seconds_in_current_stage": Timestamp::now().seconds_since(&in_stage_since),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::IntegrationStatusReporter;
    use crate::prerequisites::FactSheet;

    fn rules() -> WorkflowValidationService<'static> {
        WorkflowValidationService::standard(IntegrationStatusReporter::default())
    }

    fn record() -> ComponentRecord {
        ComponentRecord::new(ComponentId::new("INV-42").unwrap())
    }

    #[test]
    fn test_new_starts_at_draft() {
        let r = record();
        assert_eq!(r.stage, Stage::Draft);
        assert_eq!(r.version, 0);
        assert!(r.history().is_empty());
    }

    #[test]
    fn test_commit_advances_version_and_logs() {
        let mut r = record();
        let facts = FactSheet::all_satisfied();
        let rec = r
            .try_transition(Stage::Approved, 0, &rules(), &facts, Some("signed off".into()))
            .unwrap()
            .clone();
        assert_eq!(rec.from, Stage::Draft);
        assert_eq!(rec.to, Stage::Approved);
        assert_eq!(rec.version, 1);
        assert_eq!(rec.note.as_deref(), Some("signed off"));
        assert_eq!(r.stage, Stage::Approved);
        assert_eq!(r.version, 1);
        assert_eq!(r.history().len(), 1);
    }

    #[test]
    fn test_stale_version_rejected() {
        let mut r = record();
        let facts = FactSheet::all_satisfied();
        r.try_transition(Stage::Approved, 0, &rules(), &facts, None).unwrap();
        let err = r
            .try_transition(Stage::Available, 0, &rules(), &facts, None)
            .unwrap_err();
        assert!(matches!(
            err,
            ComponentError::VersionConflict { expected: 0, actual: 1, .. }
        ));
        assert_eq!(r.stage, Stage::Approved);
    }

    #[test]
    fn test_illegal_edge_rejected_without_change() {
        let mut r = record();
        let err = r
            .try_transition(Stage::Operational, 0, &rules(), &FactSheet::all_satisfied(), None)
            .unwrap_err();
        match err {
            ComponentError::Lifecycle(LifecycleError::IllegalTransition {
                legal_alternatives,
                ..
            }) => assert_eq!(legal_alternatives, vec![Stage::Approved, Stage::Cancelled]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(r.version, 0);
        assert!(r.history().is_empty());
    }

    #[test]
    fn test_target_prerequisites_enforced() {
        let mut r = record();
        let facts = FactSheet::all_satisfied().with(Prerequisite::BudgetAllocated, false);
        let err = r
            .try_transition(Stage::Approved, 0, &rules(), &facts, None)
            .unwrap_err();
        assert_eq!(
            err,
            ComponentError::PrerequisitesUnmet {
                target: Stage::Approved,
                missing: vec![Prerequisite::BudgetAllocated],
            }
        );
        assert_eq!(r.stage, Stage::Draft);
    }

    #[test]
    fn test_cancellation_needs_no_facts() {
        let mut r = record();
        r.try_transition(Stage::Cancelled, 0, &rules(), &FactSheet::new(), None)
            .unwrap();
        assert_eq!(r.stage, Stage::Cancelled);
    }

    #[test]
    fn test_metrics_counts_rollbacks() {
        let mut r = record();
        let facts = FactSheet::all_satisfied();
        r.try_transition(Stage::Approved, 0, &rules(), &facts, None).unwrap();
        r.try_transition(Stage::Draft, 1, &rules(), &facts, None).unwrap();
        let m = r.metrics(&rules());
        assert_eq!(m["transition_count"], 2);
        assert_eq!(m["rollback_count"], 1);
        assert_eq!(m["current_stage"], "draft");
        assert_eq!(m["version"], 2);
        assert_eq!(m["workflow_completion"], 5);
    }
}
