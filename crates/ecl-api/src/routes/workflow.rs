//! # Workflow API
//!
//! Stateless lifecycle queries. Validation takes the component's current
//! status from the caller; nothing here reads or writes component records
//! except the optional overview metrics.

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use ecl_core::{ComponentId, IntegrationDomain, Stage};
use ecl_lifecycle::{
    validation::recommendations_for, AutomationSummary, ComponentMetricsSource,
    IntegrationHealth, IntegrationStatus, LifecycleError, OverviewRequest, Prerequisite,
    StageDefinition, StageSummary, TransitionEdge, TransitionRequest, ValidationResult,
};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, fact_sheet, Validate};
use crate::middleware::metrics::record_validation;
use crate::state::AppState;

// -- DTOs ---------------------------------------------------------------------

/// Request to validate a component's current stage and optional next move.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateTransitionRequest {
    pub component_id: String,
    /// Stage identifier, e.g. `"shipped"`.
    pub current_status: String,
    /// Proposed next stage. Checked against the transition graph.
    pub target_status: Option<String>,
    /// Include the shortest legal path to the target (or to `archived`).
    #[serde(default)]
    pub validate_full_workflow: bool,
    /// Prerequisite facts by name. Unanswered prerequisites count as unmet.
    #[serde(default)]
    pub prerequisites: BTreeMap<String, bool>,
}

impl Validate for ValidateTransitionRequest {
    fn validate(&self) -> Result<(), String> {
        ComponentId::new(self.component_id.as_str())
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Outcome of a validation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationResponse {
    /// True iff every prerequisite of the current stage holds.
    pub is_valid: bool,
    #[schema(value_type = Object)]
    pub current_stage: StageDefinition,
    #[schema(value_type = Vec<Object>)]
    pub next_possible_stages: Vec<StageDefinition>,
    /// 0 to 100; 0 for exception stages.
    pub workflow_completion: u8,
    #[schema(value_type = Vec<String>)]
    pub missing_prerequisites: Vec<Prerequisite>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    #[schema(value_type = Object)]
    pub integration_status: IntegrationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Vec<String>)]
    pub workflow_path: Option<Vec<Stage>>,
}

impl From<ValidationResult> for ValidationResponse {
    fn from(r: ValidationResult) -> Self {
        Self {
            is_valid: r.is_valid,
            current_stage: r.current_stage,
            next_possible_stages: r.next_possible_stages,
            workflow_completion: r.workflow_completion,
            missing_prerequisites: r.missing_prerequisites,
            recommendations: r.recommendations,
            warnings: r.warnings,
            integration_status: r.integration_status,
            workflow_path: r.workflow_path,
        }
    }
}

/// Overview query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OverviewQuery {
    /// Component whose metrics to attach.
    pub component_id: Option<String>,
    /// Attach component metrics when a component is named.
    #[serde(default)]
    pub include_metrics: bool,
}

/// Whole-workflow summary.
#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewResponse {
    pub total_stages: usize,
    #[schema(value_type = Vec<Object>)]
    pub workflow_stages: Vec<StageSummary>,
    #[schema(value_type = Object)]
    pub automation_summary: AutomationSummary,
    /// Stakeholder name to number of stages naming them.
    pub stakeholder_involvement: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub component_metrics: Option<serde_json::Value>,
}

/// The stage catalog: canonical stages in order, then exception stages.
#[derive(Debug, Serialize, ToSchema)]
pub struct StageListResponse {
    #[schema(value_type = Vec<Object>)]
    pub stages: Vec<StageDefinition>,
    #[schema(value_type = Vec<Object>)]
    pub exception_stages: Vec<StageDefinition>,
}

/// One stage with its position in the graph.
#[derive(Debug, Serialize, ToSchema)]
pub struct StageDetailResponse {
    #[schema(value_type = Object)]
    pub definition: StageDefinition,
    /// Absent for exception stages.
    pub workflow_completion: Option<u8>,
    #[schema(value_type = Vec<String>)]
    pub next_stages: Vec<Stage>,
    #[schema(value_type = Vec<String>)]
    pub predecessors: Vec<Stage>,
    pub is_terminal: bool,
    pub recommendations: Vec<String>,
}

/// Every legal edge.
#[derive(Debug, Serialize, ToSchema)]
pub struct GraphResponse {
    #[schema(value_type = Vec<String>)]
    pub stages: Vec<Stage>,
    #[schema(value_type = Vec<Object>)]
    pub edges: Vec<TransitionEdge>,
}

/// Latest health of one integration domain.
#[derive(Debug, Serialize, ToSchema)]
pub struct IntegrationHealthEntry {
    #[schema(value_type = String)]
    pub domain: IntegrationDomain,
    pub reachable: bool,
    #[schema(value_type = Object)]
    pub health: IntegrationHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IntegrationsResponse {
    #[schema(value_type = Object)]
    pub status: IntegrationStatus,
    pub domains: Vec<IntegrationHealthEntry>,
}

// -- Router -------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/workflow/validate", post(validate_transition))
        .route("/v1/workflow/overview", get(workflow_overview))
        .route("/v1/workflow/stages", get(list_stages))
        .route("/v1/workflow/stages/{stage}", get(get_stage))
        .route("/v1/workflow/graph", get(transition_graph))
        .route("/v1/integrations", get(integration_health))
}

// -- Handlers -----------------------------------------------------------------

/// POST /v1/workflow/validate: Judge a component's stage and proposed move.
#[utoipa::path(
    post,
    path = "/v1/workflow/validate",
    request_body = ValidateTransitionRequest,
    responses(
        (status = 200, description = "Validation result", body = ValidationResponse),
        (status = 400, description = "Unknown stage", body = crate::error::ErrorBody),
        (status = 409, description = "Illegal transition", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid request", body = crate::error::ErrorBody),
    ),
    tag = "workflow"
)]
pub async fn validate_transition(
    State(state): State<AppState>,
    body: Result<Json<ValidateTransitionRequest>, JsonRejection>,
) -> Result<Json<ValidationResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let facts = fact_sheet(&req.prerequisites)?;
    let request = TransitionRequest {
        component_id: ComponentId::new(req.component_id)?,
        current_status: req.current_status,
        target_status: req.target_status,
        validate_full_workflow: req.validate_full_workflow,
    };

    match state.workflow.validate(&request, &facts) {
        Ok(result) => {
            record_validation(if result.is_valid { "valid" } else { "invalid" });
            Ok(Json(result.into()))
        }
        Err(err) => {
            record_validation(match err {
                LifecycleError::UnknownStage { .. } => "unknown_stage",
                LifecycleError::IllegalTransition { .. } => "illegal_transition",
                LifecycleError::CatalogInvariant(_) => "error",
            });
            Err(err.into())
        }
    }
}

/// GET /v1/workflow/overview: Summarise the canonical workflow.
#[utoipa::path(
    get,
    path = "/v1/workflow/overview",
    params(OverviewQuery),
    responses(
        (status = 200, description = "Workflow overview", body = OverviewResponse),
        (status = 422, description = "Invalid component id", body = crate::error::ErrorBody),
    ),
    tag = "workflow"
)]
pub async fn workflow_overview(
    State(state): State<AppState>,
    query: Result<Query<OverviewQuery>, QueryRejection>,
) -> Result<Json<OverviewResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let request = OverviewRequest {
        component_id: query.component_id.map(ComponentId::new).transpose()?,
        include_metrics: query.include_metrics,
    };
    let overview = state
        .workflow
        .overview(&request, Some(&state as &dyn ComponentMetricsSource));
    Ok(Json(OverviewResponse {
        total_stages: overview.total_stages,
        workflow_stages: overview.workflow_stages,
        automation_summary: overview.automation_summary,
        stakeholder_involvement: overview.stakeholder_involvement,
        component_metrics: overview.component_metrics,
    }))
}

/// GET /v1/workflow/stages: The full stage catalog.
#[utoipa::path(
    get,
    path = "/v1/workflow/stages",
    responses(
        (status = 200, description = "Stage catalog", body = StageListResponse),
    ),
    tag = "workflow"
)]
pub async fn list_stages(State(state): State<AppState>) -> Json<StageListResponse> {
    let catalog = state.workflow.catalog();
    Json(StageListResponse {
        stages: catalog.all().to_vec(),
        exception_stages: catalog.exception_sinks().to_vec(),
    })
}

/// GET /v1/workflow/stages/{stage}: One stage definition.
#[utoipa::path(
    get,
    path = "/v1/workflow/stages/{stage}",
    params(("stage" = String, Path, description = "Stage identifier, e.g. \"rfq_open\"")),
    responses(
        (status = 200, description = "Stage definition", body = StageDetailResponse),
        (status = 400, description = "Unknown stage", body = crate::error::ErrorBody),
    ),
    tag = "workflow"
)]
pub async fn get_stage(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<StageDetailResponse>, AppError> {
    let workflow = &state.workflow;
    let definition = *workflow.catalog().lookup_name(&raw)?;
    let stage = definition.stage;
    let graph = workflow.graph();
    Ok(Json(StageDetailResponse {
        definition,
        workflow_completion: workflow.completion_percent(stage),
        next_stages: graph.next_stages(stage).to_vec(),
        predecessors: graph.predecessors(stage),
        is_terminal: graph.is_terminal(stage),
        recommendations: recommendations_for(stage)
            .iter()
            .map(|r| r.to_string())
            .collect(),
    }))
}

/// GET /v1/workflow/graph: Every legal transition.
#[utoipa::path(
    get,
    path = "/v1/workflow/graph",
    responses(
        (status = 200, description = "Transition graph", body = GraphResponse),
    ),
    tag = "workflow"
)]
pub async fn transition_graph(State(state): State<AppState>) -> Json<GraphResponse> {
    Json(GraphResponse {
        stages: state.workflow.catalog().iter().map(|d| d.stage).collect(),
        edges: state.workflow.graph().edges(),
    })
}

/// GET /v1/integrations: Latest health of each collaborating subsystem.
#[utoipa::path(
    get,
    path = "/v1/integrations",
    responses(
        (status = 200, description = "Integration health", body = IntegrationsResponse),
    ),
    tag = "integrations"
)]
pub async fn integration_health(State(state): State<AppState>) -> Json<IntegrationsResponse> {
    let domains = state
        .integrations
        .all()
        .into_iter()
        .map(|(domain, health)| IntegrationHealthEntry {
            domain,
            reachable: health.is_healthy(),
            health,
        })
        .collect();
    Json(IntegrationsResponse {
        status: state.workflow.reporter().status(),
        domains,
    })
}
