//! # API Route Modules
//!
//! - `workflow`: stateless lifecycle queries: transition validation,
//!   workflow overview, stage catalog, transition graph, integration health.
//! - `components`: versioned component records with validate-then-commit
//!   transitions.

pub mod components;
pub mod workflow;
