//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps engine errors from ecl-core and ecl-lifecycle to HTTP status codes
//! and a JSON body of the form `{"error": {"code", "message", "details"?}}`.
//! Internal error details are never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use ecl_core::{ComponentId, EclError, Stage};
use ecl_lifecycle::{ComponentError, LifecycleError, Prerequisite};

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "ILLEGAL_TRANSITION").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Structured context for client errors. Never set on 500s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed JSON or a request that fails field validation (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// A resource with the same identity already exists (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A status string outside the stage catalog (400).
    #[error("unknown stage: {value:?}")]
    UnknownStage { value: String },

    /// The requested move is not an edge of the transition graph (409).
    #[error("illegal transition {from} -> {to}")]
    IllegalTransition {
        from: Stage,
        to: Stage,
        legal_alternatives: Vec<Stage>,
    },

    /// The component changed since the caller read it (409).
    #[error("component {component_id} is at version {actual}, expected {expected}")]
    VersionConflict {
        component_id: ComponentId,
        expected: u64,
        actual: u64,
    },

    /// The target stage's prerequisites do not all hold (422).
    #[error("cannot enter {target}: prerequisites unmet")]
    PrerequisitesUnmet {
        target: Stage,
        missing: Vec<Prerequisite>,
    },

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::UnknownStage { .. } => (StatusCode::BAD_REQUEST, "UNKNOWN_STAGE"),
            Self::IllegalTransition { .. } => (StatusCode::CONFLICT, "ILLEGAL_TRANSITION"),
            Self::VersionConflict { .. } => (StatusCode::CONFLICT, "VERSION_CONFLICT"),
            Self::PrerequisitesUnmet { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "PREREQUISITES_UNMET")
            }
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::UnknownStage { value } => Some(serde_json::json!({ "value": value })),
            Self::IllegalTransition {
                from,
                to,
                legal_alternatives,
            } => Some(serde_json::json!({
                "from": from,
                "to": to,
                "legal_alternatives": legal_alternatives,
            })),
            Self::VersionConflict {
                component_id,
                expected,
                actual,
            } => Some(serde_json::json!({
                "component_id": component_id,
                "expected_version": expected,
                "actual_version": actual,
            })),
            Self::PrerequisitesUnmet { target, missing } => Some(serde_json::json!({
                "target": target,
                "missing": missing,
            })),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if let Self::Internal(_) = &self {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<EclError> for AppError {
    fn from(err: EclError) -> Self {
        match err {
            EclError::UnknownStage(value) => Self::UnknownStage { value },
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::UnknownStage { value } => Self::UnknownStage { value },
            LifecycleError::IllegalTransition {
                from,
                to,
                legal_alternatives,
            } => Self::IllegalTransition {
                from,
                to,
                legal_alternatives,
            },
            LifecycleError::CatalogInvariant(msg) => Self::Internal(msg),
        }
    }
}

impl From<ComponentError> for AppError {
    fn from(err: ComponentError) -> Self {
        match err {
            ComponentError::Lifecycle(inner) => inner.into(),
            ComponentError::VersionConflict {
                component_id,
                expected,
                actual,
            } => Self::VersionConflict {
                component_id,
                expected,
                actual,
            },
            ComponentError::PrerequisitesUnmet { target, missing } => {
                Self::PrerequisitesUnmet { target, missing }
            }
        }
    }
}
