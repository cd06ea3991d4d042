//! # Component API
//!
//! Versioned component records. A transition is validated and committed
//! in one step under the store's write lock: the caller names the version
//! it read, and a stale version is rejected rather than merged.

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use ecl_core::{ComponentId, Stage, Timestamp};
use ecl_lifecycle::{
    ComponentError, ComponentRecord, LifecycleError, TransitionRecord, WorkflowValidationService,
};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, fact_sheet, Validate, MAX_NOTE_LEN};
use crate::middleware::metrics::record_component_transition;
use crate::state::AppState;

// -- DTOs ---------------------------------------------------------------------

/// Register a component.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateComponentRequest {
    pub component_id: String,
    /// Starting stage. Defaults to `draft`.
    pub stage: Option<String>,
}

impl Validate for CreateComponentRequest {
    fn validate(&self) -> Result<(), String> {
        ComponentId::new(self.component_id.as_str())
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Move a component to another stage.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransitionComponentRequest {
    pub target_status: String,
    /// The version the caller last read.
    pub expected_version: u64,
    /// Prerequisite facts for the target stage, by name.
    #[serde(default)]
    pub prerequisites: BTreeMap<String, bool>,
    pub note: Option<String>,
}

impl Validate for TransitionComponentRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(note) = &self.note {
            if note.chars().count() > MAX_NOTE_LEN {
                return Err(format!("note must not exceed {MAX_NOTE_LEN} characters"));
            }
        }
        Ok(())
    }
}

/// A component's current state.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentResponse {
    pub component_id: String,
    #[schema(value_type = String)]
    pub stage: Stage,
    pub version: u64,
    #[schema(value_type = String)]
    pub created_at: Timestamp,
    /// Absent for exception stages.
    pub workflow_completion: Option<u8>,
    #[schema(value_type = Vec<String>)]
    pub next_possible_stages: Vec<Stage>,
    pub transition_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub last_transition: Option<TransitionRecord>,
}

impl ComponentResponse {
    fn new(record: &ComponentRecord, workflow: &WorkflowValidationService<'_>) -> Self {
        Self {
            component_id: record.id.to_string(),
            stage: record.stage,
            version: record.version,
            created_at: record.created_at,
            workflow_completion: workflow.completion_percent(record.stage),
            next_possible_stages: workflow.graph().next_stages(record.stage).to_vec(),
            transition_count: record.history().len(),
            last_transition: record.history().last().cloned(),
        }
    }
}

/// Every committed transition, oldest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub component_id: String,
    pub version: u64,
    #[schema(value_type = Vec<Object>)]
    pub transitions: Vec<TransitionRecord>,
}

// -- Router -------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/components", post(create_component))
        .route("/v1/components/{id}", get(get_component))
        .route("/v1/components/{id}/transitions", post(transition_component))
        .route("/v1/components/{id}/history", get(component_history))
}

/// Path ids that fail validation cannot name a stored component.
fn lookup_id(raw: &str) -> Result<ComponentId, AppError> {
    ComponentId::new(raw).map_err(|_| not_found(raw))
}

fn not_found(id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("component {id} not found"))
}

// -- Handlers -----------------------------------------------------------------

/// POST /v1/components: Register a component.
#[utoipa::path(
    post,
    path = "/v1/components",
    request_body = CreateComponentRequest,
    responses(
        (status = 201, description = "Component registered", body = ComponentResponse),
        (status = 400, description = "Unknown stage", body = crate::error::ErrorBody),
        (status = 409, description = "Component already exists", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid request", body = crate::error::ErrorBody),
    ),
    tag = "components"
)]
pub async fn create_component(
    State(state): State<AppState>,
    body: Result<Json<CreateComponentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ComponentResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let id = ComponentId::new(req.component_id)?;
    let record = match req.stage.as_deref() {
        Some(raw) => {
            ComponentRecord::at_stage(id, state.workflow.catalog().lookup_name(raw)?.stage)
        }
        None => ComponentRecord::new(id),
    };

    if !state.components.insert_new(record.clone()) {
        return Err(AppError::Conflict(format!(
            "component {} already exists",
            record.id
        )));
    }
    tracing::info!(component_id = %record.id, stage = %record.stage, "component registered");
    Ok((
        StatusCode::CREATED,
        Json(ComponentResponse::new(&record, &state.workflow)),
    ))
}

/// GET /v1/components/{id}: Current state of a component.
#[utoipa::path(
    get,
    path = "/v1/components/{id}",
    params(("id" = String, Path, description = "Component ID")),
    responses(
        (status = 200, description = "Component found", body = ComponentResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "components"
)]
pub async fn get_component(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<ComponentResponse>, AppError> {
    let id = lookup_id(&raw)?;
    let record = state.components.get(&id).ok_or_else(|| not_found(&id))?;
    Ok(Json(ComponentResponse::new(&record, &state.workflow)))
}

/// POST /v1/components/{id}/transitions: Validate and commit a move.
#[utoipa::path(
    post,
    path = "/v1/components/{id}/transitions",
    params(("id" = String, Path, description = "Component ID")),
    request_body = TransitionComponentRequest,
    responses(
        (status = 200, description = "Transition committed", body = ComponentResponse),
        (status = 400, description = "Unknown stage", body = crate::error::ErrorBody),
        (status = 404, description = "Component not found", body = crate::error::ErrorBody),
        (status = 409, description = "Illegal transition or stale version", body = crate::error::ErrorBody),
        (status = 422, description = "Prerequisites unmet or invalid request", body = crate::error::ErrorBody),
    ),
    tag = "components"
)]
pub async fn transition_component(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Result<Json<TransitionComponentRequest>, JsonRejection>,
) -> Result<Json<ComponentResponse>, AppError> {
    let id = lookup_id(&raw)?;
    let req = extract_validated_json(body)?;
    let facts = fact_sheet(&req.prerequisites)?;
    let target = state.workflow.catalog().lookup_name(&req.target_status)?.stage;
    let workflow = &state.workflow;

    let outcome = state
        .components
        .try_update(&id, |record| {
            record.try_transition(target, req.expected_version, workflow, &facts, req.note)?;
            Ok::<_, ComponentError>(record.clone())
        })
        .ok_or_else(|| not_found(&id))?;

    match outcome {
        Ok(record) => {
            record_component_transition("committed");
            Ok(Json(ComponentResponse::new(&record, workflow)))
        }
        Err(err) => {
            record_component_transition(match &err {
                ComponentError::VersionConflict { .. } => "version_conflict",
                ComponentError::PrerequisitesUnmet { .. } => "prerequisites_unmet",
                ComponentError::Lifecycle(LifecycleError::IllegalTransition { .. }) => {
                    "illegal_transition"
                }
                ComponentError::Lifecycle(_) => "error",
            });
            Err(err.into())
        }
    }
}

/// GET /v1/components/{id}/history: Committed transitions.
#[utoipa::path(
    get,
    path = "/v1/components/{id}/history",
    params(("id" = String, Path, description = "Component ID")),
    responses(
        (status = 200, description = "Transition history", body = HistoryResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "components"
)]
pub async fn component_history(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let id = lookup_id(&raw)?;
    let record = state.components.get(&id).ok_or_else(|| not_found(&id))?;
    Ok(Json(HistoryResponse {
        component_id: record.id.to_string(),
        version: record.version,
        transitions: record.history().to_vec(),
    }))
}
