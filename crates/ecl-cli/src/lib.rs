//! # ecl-cli: Command-Line Front End for the Lifecycle Engine
//!
//! ## Subcommands
//!
//! - `ecl stages`: List the stage catalog with completion percentages.
//! - `ecl validate`: Validate a stage and optional move against a facts file.
//! - `ecl overview`: Automation and stakeholder summary.
//! - `ecl graph`: Export the transition graph as DOT or JSON.
//! - `ecl component`: Create and transition components kept as local JSON files.
//!
//! ```bash
//! ecl validate --current approved --facts facts.yaml
//! ecl validate --current shipped --target received --full
//! ecl graph --format dot | dot -Tsvg > lifecycle.svg
//! ```
//!
//! Every `run_*` function returns the process exit code: 0 for success,
//! 2 when a validation completes but reports unmet prerequisites.

pub mod catalog;
pub mod component;
pub mod facts;
pub mod graph;
pub mod validate;

/// Exit code for a validation that ran but found unmet prerequisites.
pub const EXIT_NOT_READY: u8 = 2;
