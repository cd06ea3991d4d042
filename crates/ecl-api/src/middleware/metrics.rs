//! # Prometheus Metrics
//!
//! Request and validation metrics recorded through the `metrics` facade.
//! Without an installed recorder every macro is a no-op, so handlers and
//! tests never need to care whether export is enabled.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const HTTP_REQUESTS_TOTAL: &str = "ecl_http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "ecl_http_request_duration_seconds";
pub const VALIDATIONS_TOTAL: &str = "ecl_validations_total";
pub const COMPONENT_TRANSITIONS_TOTAL: &str = "ecl_component_transitions_total";

/// Install the process-wide Prometheus recorder. Call once, from `main`.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!(HTTP_REQUESTS_TOTAL, "HTTP requests by route and status");
    metrics::describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "HTTP request latency by route"
    );
    metrics::describe_counter!(VALIDATIONS_TOTAL, "Workflow validations by outcome");
    metrics::describe_counter!(
        COMPONENT_TRANSITIONS_TOTAL,
        "Component transition attempts by outcome"
    );
    Ok(handle)
}

/// Count every request and record its latency, labelled by matched route.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method,
        "path" => path
    )
    .record(started.elapsed().as_secs_f64());

    response
}

/// One validation outcome: `valid`, `invalid`, `unknown_stage`,
/// `illegal_transition` or `error`.
pub fn record_validation(outcome: &'static str) {
    metrics::counter!(VALIDATIONS_TOTAL, "outcome" => outcome).increment(1);
}

/// One component transition attempt: `committed` or the rejection code.
pub fn record_component_transition(outcome: &'static str) {
    metrics::counter!(COMPONENT_TRANSITIONS_TOTAL, "outcome" => outcome).increment(1);
}
