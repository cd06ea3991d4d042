//! # ecl-core: Foundational Types for the Component Lifecycle Engine
//!
//! This crate defines the identifiers every other crate in the workspace
//! agrees on. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Single `Stage` enum.** One definition covering the 19 canonical
//!    lifecycle stages and the 3 exception sinks. Every `match` on `Stage`
//!    is exhaustive, so adding a stage forces every consumer to handle it.
//!
//! 2. **Single `IntegrationDomain` enum.** The five collaborating subsystems
//!    whose reachability is reported alongside every validation.
//!
//! 3. **Newtype identifiers.** `ComponentId` is validated at construction.
//!    No bare strings cross crate boundaries as identifiers.
//!
//! 4. **UTC-only timestamps.** `Timestamp` is UTC, truncated to seconds.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ecl-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod integration;
pub mod stage;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::EclError;
pub use identity::{ComponentId, TransitionId, COMPONENT_ID_MAX_LEN};
pub use integration::{IntegrationDomain, INTEGRATION_DOMAIN_COUNT};
pub use stage::{Stage, CANONICAL_STAGE_COUNT, EXCEPTION_SINK_COUNT};
pub use temporal::Timestamp;
