//! # Workflow Validation
//!
//! `WorkflowValidationService` composes the catalog, graph, prerequisite
//! evaluator, completion calculator and integration reporter into one
//! decision: where is this component, where may it go next, and is it
//! validly where it is.
//!
//! ## Order of evaluation
//!
//! 1. Resolve `current_status`. Unknown → [`LifecycleError::UnknownStage`].
//! 2. If `target_status` is given, resolve it and check the edge. Illegal →
//!    [`LifecycleError::IllegalTransition`] carrying every legal alternative.
//! 3. Compute successors, completion, missing prerequisites of the *current*
//!    stage, integration status, recommendations and warnings.
//!
//! Structural failures stop at steps 1–2. Readiness is always computed in
//! full and returned as data.

use serde::{Deserialize, Serialize};

use ecl_core::{ComponentId, Stage};

use crate::catalog::{StageCatalog, StageDefinition};
use crate::completion::CompletionCalculator;
use crate::error::LifecycleError;
use crate::graph::TransitionGraph;
use crate::integrations::{IntegrationStatus, IntegrationStatusReporter};
use crate::prerequisites::{Prerequisite, PrerequisiteContext, PrerequisiteEvaluator};

/// A request to judge a component's stage and an optional next move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub component_id: ComponentId,
    /// Raw stage identifier as supplied by the caller.
    pub current_status: String,
    #[serde(default)]
    pub target_status: Option<String>,
    /// Also compute the shortest legal path to the target, or to `archived`.
    #[serde(default)]
    pub validate_full_workflow: bool,
}

impl TransitionRequest {
    pub fn new(component_id: ComponentId, current_status: impl Into<String>) -> Self {
        Self {
            component_id,
            current_status: current_status.into(),
            target_status: None,
            validate_full_workflow: false,
        }
    }

    pub fn with_target(mut self, target_status: impl Into<String>) -> Self {
        self.target_status = Some(target_status.into());
        self
    }

    pub fn with_full_workflow(mut self) -> Self {
        self.validate_full_workflow = true;
        self
    }
}

/// Outcome of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// True when no prerequisite of the current stage is missing.
    pub is_valid: bool,
    pub current_stage: StageDefinition,
    /// In graph order.
    pub next_possible_stages: Vec<StageDefinition>,
    /// 0 for exception sinks, which have no position in the canonical order.
    pub workflow_completion: u8,
    pub missing_prerequisites: Vec<Prerequisite>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    pub integration_status: IntegrationStatus,
    /// Present only when `validate_full_workflow` was requested. Empty when
    /// the destination is unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_path: Option<Vec<Stage>>,
}

/// Stateless orchestrator over the shared catalog and graph.
#[derive(Debug)]
pub struct WorkflowValidationService<'a> {
    catalog: &'a StageCatalog,
    graph: &'a TransitionGraph,
    reporter: IntegrationStatusReporter,
}

impl WorkflowValidationService<'static> {
    /// A service over the built-in catalog and graph.
    pub fn standard(reporter: IntegrationStatusReporter) -> Self {
        Self::new(StageCatalog::standard(), TransitionGraph::standard(), reporter)
    }
}

impl<'a> WorkflowValidationService<'a> {
    pub fn new(
        catalog: &'a StageCatalog,
        graph: &'a TransitionGraph,
        reporter: IntegrationStatusReporter,
    ) -> Self {
        Self {
            catalog,
            graph,
            reporter,
        }
    }

    pub fn catalog(&self) -> &'a StageCatalog {
        self.catalog
    }

    pub fn graph(&self) -> &'a TransitionGraph {
        self.graph
    }

    pub fn reporter(&self) -> &IntegrationStatusReporter {
        &self.reporter
    }

    /// Prerequisites of `stage` unmet under `ctx`.
    pub fn missing_prerequisites(
        &self,
        stage: Stage,
        ctx: &dyn PrerequisiteContext,
    ) -> Vec<Prerequisite> {
        PrerequisiteEvaluator::new(self.catalog).missing_prerequisites(stage, ctx)
    }

    /// Completion percentage, `None` for exception sinks.
    pub fn completion_percent(&self, stage: Stage) -> Option<u8> {
        CompletionCalculator::new(self.catalog).completion_percent(stage)
    }

    /// Fail with `IllegalTransition` unless `from -> to` is an edge.
    pub fn ensure_legal(&self, from: Stage, to: Stage) -> Result<(), LifecycleError> {
        if self.graph.is_legal_transition(from, to) {
            Ok(())
        } else {
            Err(LifecycleError::IllegalTransition {
                from,
                to,
                legal_alternatives: self.graph.next_stages(from).to_vec(),
            })
        }
    }

    /// Judge a component's current stage and optional next move.
    pub fn validate(
        &self,
        request: &TransitionRequest,
        ctx: &dyn PrerequisiteContext,
    ) -> Result<ValidationResult, LifecycleError> {
        let current = *self.catalog.lookup_name(&request.current_status)?;
        let target = match request.target_status.as_deref() {
            Some(raw) => {
                let target = self.catalog.lookup_name(raw)?.stage;
                self.ensure_legal(current.stage, target)?;
                Some(target)
            }
            None => None,
        };

        let next_possible_stages = self
            .graph
            .next_stages(current.stage)
            .iter()
            .map(|s| *self.catalog.lookup(*s))
            .collect();
        let workflow_completion = self.completion_percent(current.stage).unwrap_or(0);
        let missing_prerequisites = self.missing_prerequisites(current.stage, ctx);
        let integration_status = self.reporter.status();
        let recommendations = recommendations_for(current.stage)
            .iter()
            .map(|r| r.to_string())
            .collect();
        let warnings = missing_warning(&current, missing_prerequisites.len())
            .into_iter()
            .collect();
        let workflow_path = request.validate_full_workflow.then(|| {
            self.graph
                .shortest_path(current.stage, target.unwrap_or(Stage::Archived))
                .unwrap_or_default()
        });

        tracing::debug!(
            component_id = %request.component_id,
            stage = %current.stage,
            target = ?target,
            missing = missing_prerequisites.len(),
            "validated component stage"
        );

        Ok(ValidationResult {
            is_valid: missing_prerequisites.is_empty(),
            current_stage: current,
            next_possible_stages,
            workflow_completion,
            missing_prerequisites,
            recommendations,
            warnings,
            integration_status,
            workflow_path,
        })
    }
}

fn missing_warning(stage: &StageDefinition, missing: usize) -> Option<String> {
    match missing {
        0 => None,
        1 => Some(format!("1 prerequisite is not met for the {} stage", stage.name)),
        n => Some(format!("{n} prerequisites are not met for the {} stage", stage.name)),
    }
}

/// Fixed advisory text per stage. Never affects validity.
pub fn recommendations_for(stage: Stage) -> &'static [&'static str] {
    match stage {
        Stage::Draft => &[
            "Ensure specifications are complete before requesting approval",
            "Attach manufacturer datasheets and certifications",
        ],
        Stage::Approved => &["Publish the component to the catalog so projects can request it"],
        Stage::Available => &["Confirm project demand before starting supplier outreach"],
        Stage::Sourcing => &[
            "Shortlist at least three qualified suppliers",
            "Prepare RFQ documents from the approved specification",
        ],
        Stage::RfqOpen => &["Answer supplier clarifications before the bid deadline"],
        Stage::RfqAwarded => &["Record the bid evaluation rationale before raising the purchase order"],
        Stage::Purchasing => &["Verify the budget allocation still covers the awarded price"],
        Stage::Ordered => &["Track supplier confirmation and expected ship date"],
        Stage::Shipped => &["Schedule incoming inspection for the expected delivery date"],
        Stage::Received => &[
            "Inspect the delivery before booking it into inventory",
            "Quarantine any units with visible damage",
        ],
        Stage::Installed => &["Upload as-built photos and the installation certificate"],
        Stage::Commissioned => &["Record the performance baseline before handing over to operations"],
        Stage::Operational => &[
            "Register the manufacturer warranty",
            "Schedule preventive maintenance",
        ],
        Stage::WarrantyActive => &["Keep warranty terms and claim contacts attached to the component"],
        Stage::Maintenance => &["Record parts used and return the component to service when complete"],
        Stage::Retired => &["Plan safe disconnection and removal"],
        Stage::Decommissioned => &["Assign a certified recycling partner"],
        Stage::Recycling => &["Collect the disposal certificate for the audit record"],
        Stage::Archived => &["No further action required"],
        Stage::Cancelled => &[
            "Release any allocated budget",
            "Progress is not tracked for cancelled components",
        ],
        Stage::Returned => &[
            "Confirm the supplier credit note",
            "Progress is not tracked for returned components",
        ],
        Stage::Quarantine => &[
            "Complete the non-conformance review",
            "Progress is not tracked for quarantined components",
        ],
    }
}
