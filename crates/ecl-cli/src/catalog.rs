//! # Catalog Subcommands
//!
//! `ecl stages` lists every stage; `ecl overview` prints the automation
//! and stakeholder summary of the canonical workflow.

use std::fmt::Write as _;

use anyhow::Result;
use clap::Args;

use ecl_lifecycle::{
    IntegrationStatusReporter, OverviewRequest, StageCatalog, StageDefinition, WorkflowOverview,
    WorkflowValidationService,
};

/// Arguments for `ecl stages`.
#[derive(Args, Debug)]
pub struct StagesArgs {
    /// Emit the full definitions as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `ecl overview`.
#[derive(Args, Debug)]
pub struct OverviewArgs {
    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

pub fn run_stages(args: &StagesArgs) -> Result<u8> {
    let service = WorkflowValidationService::standard(IntegrationStatusReporter::default());
    if args.json {
        let catalog = service.catalog();
        let doc = serde_json::json!({
            "stages": catalog.all(),
            "exception_stages": catalog.exception_sinks(),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print!("{}", render_stages(&service));
    }
    Ok(0)
}

pub fn run_overview(args: &OverviewArgs) -> Result<u8> {
    let service = WorkflowValidationService::standard(IntegrationStatusReporter::default());
    let overview = service.overview(&OverviewRequest::default(), None);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
    } else {
        print!("{}", render_overview(&overview));
    }
    Ok(0)
}

fn stage_line(out: &mut String, completion: Option<u8>, def: &StageDefinition) {
    let pct = completion.map_or_else(|| "  -".to_string(), |p| format!("{p:>3}"));
    let _ = writeln!(
        out,
        "  {pct}%  {:<16} {:<20} {:<15} {}",
        def.stage.as_str(),
        def.name,
        def.automation_level.as_str(),
        def.estimated_duration
    );
}

pub fn render_stages(service: &WorkflowValidationService<'_>) -> String {
    let catalog: &StageCatalog = service.catalog();
    let mut out = String::new();
    let _ = writeln!(out, "Lifecycle stages ({}):", catalog.all().len());
    for def in catalog.all() {
        stage_line(&mut out, service.completion_percent(def.stage), def);
    }
    let _ = writeln!(out, "Exception stages ({}):", catalog.exception_sinks().len());
    for def in catalog.exception_sinks() {
        stage_line(&mut out, None, def);
    }
    out
}

pub fn render_overview(overview: &WorkflowOverview) -> String {
    let mut out = String::new();
    let summary = &overview.automation_summary;
    let _ = writeln!(out, "Stages: {}", overview.total_stages);
    let _ = writeln!(
        out,
        "Automation: {} manual, {} semi-automated, {} automated",
        summary.manual, summary.semi_automated, summary.automated
    );
    let mut stakeholders: Vec<(&String, &usize)> = overview.stakeholder_involvement.iter().collect();
    stakeholders.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let _ = writeln!(out, "Stakeholders:");
    for (name, count) in stakeholders {
        let _ = writeln!(out, "  {name:<24} {count}");
    }
    out
}
