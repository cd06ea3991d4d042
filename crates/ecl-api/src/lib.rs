//! # ecl-api: HTTP Surface for the Lifecycle Engine
//!
//! ## API Surface
//!
//! | Prefix | Module | Purpose |
//! |--------|--------|---------|
//! | `/v1/workflow/*` | [`routes::workflow`] | Validation, overview, catalog, graph |
//! | `/v1/integrations` | [`routes::workflow`] | Integration health |
//! | `/v1/components/*` | [`routes::components`] | Versioned component transitions |
//! | `/openapi.json` | [`openapi`] | Generated OpenAPI document |
//! | `/metrics` | this module | Prometheus text, when a recorder is installed |
//! | `/health/*` | this module | Liveness and readiness probes |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → metrics_middleware → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod integrations;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the application router.
///
/// Health probes are mounted outside the metrics layer so scrapes and
/// orchestrator polling do not inflate request counts.
pub fn app(state: AppState) -> Router {
    let mut api = Router::new()
        .merge(routes::workflow::router())
        .merge(routes::components::router())
        .merge(openapi::router());
    if state.metrics.is_some() {
        api = api.route("/metrics", get(prometheus_metrics));
    }
    let api = api
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// Liveness probe: 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once the stage catalog and graph are loaded.
///
/// Unreachable integrations do not fail readiness: validation still
/// answers, with the affected flags set to false.
async fn readiness(State(state): State<AppState>) -> Response {
    let catalog = state.workflow.catalog();
    if catalog.all().is_empty() {
        return (StatusCode::SERVICE_UNAVAILABLE, "stage catalog empty").into_response();
    }
    let unreachable = state.workflow.reporter().status().unreachable();
    if !unreachable.is_empty() {
        tracing::debug!(count = unreachable.len(), "integrations unreachable at readiness check");
    }
    (StatusCode::OK, "ready").into_response()
}

async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
