//! # Request Extraction & Validation
//!
//! The [`Validate`] trait for request DTOs and helpers that turn JSON
//! rejections and rule violations into [`AppError::Validation`].

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use ecl_lifecycle::FactSheet;

use crate::error::AppError;

/// Upper bound on free-text notes attached to a transition.
pub const MAX_NOTE_LEN: usize = 1024;

/// Field-level rules checked after serde has accepted the shape.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to a 422.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::Validation(err.body_text()))
}

/// Extract a JSON body and run its [`Validate`] rules.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Turn a `{name: bool}` map from a request body into a [`FactSheet`].
/// Unknown prerequisite names are a validation error.
pub fn fact_sheet(prerequisites: &BTreeMap<String, bool>) -> Result<FactSheet, AppError> {
    FactSheet::from_named(prerequisites.iter().map(|(k, v)| (k.as_str(), *v)))
        .map_err(|err| AppError::Validation(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fact_sheet_accepts_known_names() {
        let mut raw = BTreeMap::new();
        raw.insert("budget_allocated".to_string(), true);
        raw.insert("supplier_selected".to_string(), false);
        assert_eq!(fact_sheet(&raw).unwrap().len(), 2);
    }

    #[test]
    fn fact_sheet_rejects_unknown_names() {
        let mut raw = BTreeMap::new();
        raw.insert("moon_phase_ok".to_string(), true);
        assert!(matches!(fact_sheet(&raw), Err(AppError::Validation(_))));
    }
}
