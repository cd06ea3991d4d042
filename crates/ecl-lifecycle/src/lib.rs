//! # ecl-lifecycle: Component Lifecycle Workflow Engine
//!
//! Decides whether a hardware component may be in, or move to, a given
//! lifecycle stage. The engine is a pure, synchronous evaluator: it never
//! owns component storage and never performs I/O.
//!
//! ## Components (leaf first)
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Immutable registry of stage definitions, indexed by stage |
//! | [`graph`] | Legal transition edges, the single source of truth for moves |
//! | [`prerequisites`] | Typed prerequisites and the fail-closed evaluator |
//! | [`completion`] | Progress percentage over the canonical order |
//! | [`integrations`] | Reachability of the five collaborating subsystems |
//! | [`validation`] | Orchestrates the above into a [`ValidationResult`] |
//! | [`overview`] | Whole-workflow summary for dashboards |
//! | [`component`] | Versioned component record for validate-then-commit |
//!
//! ## Crate Policy
//!
//! - The catalog and graph are built once and shared read-only.
//! - Structural errors (unknown stage, illegal transition) are returned as
//!   [`LifecycleError`]. Readiness conditions (missing prerequisites,
//!   unreachable integrations) are returned as data.
//! - Evaluation is deterministic for a fixed context.

pub mod catalog;
pub mod completion;
pub mod component;
mod definitions;
pub mod error;
pub mod graph;
pub mod integrations;
pub mod overview;
pub mod prerequisites;
pub mod validation;

pub use catalog::{AutomationLevel, StageCatalog, StageDefinition};
pub use completion::CompletionCalculator;
pub use component::{ComponentError, ComponentRecord, TransitionRecord};
pub use error::LifecycleError;
pub use graph::{EdgeKind, TransitionEdge, TransitionGraph};
pub use integrations::{
    IntegrationHealth, IntegrationProbe, IntegrationStatus, IntegrationStatusReporter, StaticProbe,
};
pub use overview::{
    AutomationSummary, ComponentMetricsSource, OverviewRequest, StageSummary, WorkflowOverview,
};
pub use prerequisites::{FactSheet, Prerequisite, PrerequisiteContext, PrerequisiteEvaluator};
pub use validation::{TransitionRequest, ValidationResult, WorkflowValidationService};
