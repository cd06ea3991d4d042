//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Component Lifecycle API",
        version = "0.1.0",
        description = "Lifecycle workflow engine for energy hardware: transition validation, workflow overview, stage catalog, and versioned component transitions.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Workflow
        crate::routes::workflow::validate_transition,
        crate::routes::workflow::workflow_overview,
        crate::routes::workflow::list_stages,
        crate::routes::workflow::get_stage,
        crate::routes::workflow::transition_graph,
        crate::routes::workflow::integration_health,
        // Components
        crate::routes::components::create_component,
        crate::routes::components::get_component,
        crate::routes::components::transition_component,
        crate::routes::components::component_history,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::workflow::ValidateTransitionRequest,
        crate::routes::workflow::ValidationResponse,
        crate::routes::workflow::OverviewResponse,
        crate::routes::workflow::StageListResponse,
        crate::routes::workflow::StageDetailResponse,
        crate::routes::workflow::GraphResponse,
        crate::routes::workflow::IntegrationHealthEntry,
        crate::routes::workflow::IntegrationsResponse,
        crate::routes::components::CreateComponentRequest,
        crate::routes::components::TransitionComponentRequest,
        crate::routes::components::ComponentResponse,
        crate::routes::components::HistoryResponse,
    )),
    tags(
        (name = "workflow", description = "Stage validation and workflow queries"),
        (name = "components", description = "Versioned component transitions"),
        (name = "integrations", description = "Collaborating subsystem health"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/v1/workflow/validate",
            "/v1/workflow/overview",
            "/v1/workflow/stages",
            "/v1/workflow/stages/{stage}",
            "/v1/workflow/graph",
            "/v1/integrations",
            "/v1/components",
            "/v1/components/{id}",
            "/v1/components/{id}/transitions",
            "/v1/components/{id}/history",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
