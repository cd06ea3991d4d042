//! # Validate Subcommand
//!
//! Offline validation: the same engine the API runs, with prerequisite
//! and integration facts taken from a local file instead of live systems.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ecl_core::ComponentId;
use ecl_lifecycle::{
    IntegrationStatusReporter, TransitionRequest, ValidationResult, WorkflowValidationService,
};

use crate::facts::FactsFile;
use crate::EXIT_NOT_READY;

/// Arguments for `ecl validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Current stage of the component (e.g. "approved").
    #[arg(long)]
    pub current: String,

    /// Proposed next stage.
    #[arg(long)]
    pub target: Option<String>,

    /// YAML or JSON file with prerequisite and integration facts.
    #[arg(long)]
    pub facts: Option<PathBuf>,

    /// Print the shortest legal path to the target (or to archived).
    #[arg(long)]
    pub full: bool,

    /// Component identifier used in logs and output.
    #[arg(long, default_value = "cli")]
    pub component_id: String,

    /// Emit the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Validate and print. Exit 0 when valid, [`EXIT_NOT_READY`] otherwise.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let result = evaluate(args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_result(&result));
    }
    Ok(if result.is_valid { 0 } else { EXIT_NOT_READY })
}

/// Run the engine for `args` without printing.
pub fn evaluate(args: &ValidateArgs) -> Result<ValidationResult> {
    let facts = FactsFile::load_optional(args.facts.as_deref())?;
    let service = WorkflowValidationService::standard(IntegrationStatusReporter::fixed(
        facts.integration_status(),
    ));
    let component_id =
        ComponentId::new(args.component_id.as_str()).context("invalid --component-id")?;
    let request = TransitionRequest {
        component_id,
        current_status: args.current.clone(),
        target_status: args.target.clone(),
        validate_full_workflow: args.full,
    };
    let result = service.validate(&request, &facts.prerequisites)?;
    Ok(result)
}

pub fn render_result(result: &ValidationResult) -> String {
    let mut out = String::new();
    let stage = &result.current_stage;
    let verdict = if result.is_valid { "VALID" } else { "NOT READY" };
    let _ = writeln!(
        out,
        "{verdict}: {} ({}) {}% complete",
        stage.name, stage.stage, result.workflow_completion
    );

    if !result.missing_prerequisites.is_empty() {
        let _ = writeln!(out, "Missing prerequisites:");
        for p in &result.missing_prerequisites {
            let _ = writeln!(out, "  - {p}: {}", p.description());
        }
    }
    for w in &result.warnings {
        let _ = writeln!(out, "Warning: {w}");
    }

    let next: Vec<&str> = result
        .next_possible_stages
        .iter()
        .map(|d| d.stage.as_str())
        .collect();
    let _ = writeln!(
        out,
        "Next stages: {}",
        if next.is_empty() { "(none)".to_string() } else { next.join(", ") }
    );

    let unreachable = result.integration_status.unreachable();
    if !unreachable.is_empty() {
        let names: Vec<&str> = unreachable.iter().map(|d| d.as_str()).collect();
        let _ = writeln!(out, "Unreachable integrations: {}", names.join(", "));
    }

    if let Some(path) = &result.workflow_path {
        let steps: Vec<&str> = path.iter().map(|s| s.as_str()).collect();
        let _ = writeln!(
            out,
            "Workflow path: {}",
            if steps.is_empty() { "(unreachable)".to_string() } else { steps.join(" -> ") }
        );
    }

    if !result.recommendations.is_empty() {
        let _ = writeln!(out, "Recommendations:");
        for r in &result.recommendations {
            let _ = writeln!(out, "  * {r}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecl_core::Stage;
    use ecl_lifecycle::Prerequisite;

    fn args(current: &str) -> ValidateArgs {
        ValidateArgs {
            current: current.to_string(),
            target: None,
            facts: None,
            full: false,
            component_id: "PV-1".to_string(),
            json: false,
        }
    }

    #[test]
    fn no_facts_means_missing() {
        let result = evaluate(&args("approved")).unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.missing_prerequisites.len(), 3);
        let text = render_result(&result);
        assert!(text.starts_with("NOT READY: Approved (approved) 11% complete"));
        assert!(text.contains("  - budget_allocated: "));
        assert!(text.contains("Unreachable integrations: rfq_system"));
    }

    #[test]
    fn facts_file_satisfies_stage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.yaml");
        std::fs::write(
            &path,
            "prerequisites:\n  technical_specifications_complete: true\n  technical_approval_signed: true\n  budget_allocated: true\nintegrations:\n  purchase_orders: true\n",
        )
        .unwrap();
        let mut a = args("approved");
        a.facts = Some(path);
        a.target = Some("available".into());
        a.full = true;
        let result = evaluate(&a).unwrap();
        assert!(result.is_valid);
        assert!(result.integration_status.purchase_orders);
        assert_eq!(
            result.workflow_path,
            Some(vec![Stage::Approved, Stage::Available])
        );
        assert!(render_result(&result).contains("Workflow path: approved -> available"));
        assert_eq!(run_validate(&a).unwrap(), 0);
    }

    #[test]
    fn illegal_target_is_error() {
        let mut a = args("draft");
        a.target = Some("operational".into());
        let err = evaluate(&a).unwrap_err();
        assert!(err.to_string().contains("legal alternatives: [approved, cancelled]"));
    }

    #[test]
    fn unknown_stage_is_error() {
        assert!(evaluate(&args("limbo")).is_err());
    }

    #[test]
    fn not_ready_exit_code() {
        assert_eq!(run_validate(&args("received")).unwrap(), EXIT_NOT_READY);
    }

    #[test]
    fn missing_listing_has_descriptions() {
        let result = evaluate(&args("ordered")).unwrap();
        let text = render_result(&result);
        assert!(text.contains(Prerequisite::PurchaseOrderApproved.description()));
    }
}
