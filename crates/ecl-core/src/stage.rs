//! # Lifecycle Stage: Single Source of Truth
//!
//! Defines the `Stage` enum: the 19 canonical lifecycle stages a hardware
//! component moves through, plus the three exception sinks. This is the ONE
//! definition used by the catalog, the transition graph, the API and the CLI.
//!
//! The canonical stages form a total order used for progress scoring. The
//! exception sinks (`cancelled`, `returned`, `quarantine`) sit outside that
//! order and have no outbound transitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::EclError;

/// A lifecycle stage of an energy-system hardware component.
///
/// # Canonical order
///
/// | # | Stage | Phase |
/// |---|-------|-------|
/// |  1 | Draft | Specification |
/// |  2 | Approved | Specification |
/// |  3 | Available | Catalog |
/// |  4 | Sourcing | Procurement |
/// |  5 | RfqOpen | Procurement |
/// |  6 | RfqAwarded | Procurement |
/// |  7 | Purchasing | Procurement |
/// |  8 | Ordered | Procurement |
/// |  9 | Shipped | Logistics |
/// | 10 | Received | Logistics |
/// | 11 | Installed | Deployment |
/// | 12 | Commissioned | Deployment |
/// | 13 | Operational | Operation |
/// | 14 | WarrantyActive | Operation |
/// | 15 | Maintenance | Operation |
/// | 16 | Retired | End of life |
/// | 17 | Decommissioned | End of life |
/// | 18 | Recycling | End of life |
/// | 19 | Archived | End of life |
///
/// Exception sinks: `Cancelled`, `Returned`, `Quarantine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Component specification is being written.
    Draft,
    /// Specification has technical and budget sign-off.
    Approved,
    /// Component is published in the catalog for project use.
    Available,
    /// Demand confirmed; suppliers are being identified.
    Sourcing,
    /// Request for quotation is out to suppliers.
    RfqOpen,
    /// A supplier bid has been selected.
    RfqAwarded,
    /// Purchase order is being prepared and approved.
    Purchasing,
    /// Purchase order is placed and confirmed by the supplier.
    Ordered,
    /// Component is in transit.
    Shipped,
    /// Component has been delivered and booked into inventory.
    Received,
    /// Component is physically installed on site.
    Installed,
    /// Commissioning tests have passed.
    Commissioned,
    /// Component is in productive service.
    Operational,
    /// Manufacturer warranty is registered and active.
    WarrantyActive,
    /// Component is undergoing scheduled or corrective maintenance.
    Maintenance,
    /// Component is withdrawn from service.
    Retired,
    /// Component is disconnected and removed from site.
    Decommissioned,
    /// Component is with a recycling partner.
    Recycling,
    /// Lifecycle records are closed.
    Archived,
    /// Exception sink: the component was cancelled before delivery.
    Cancelled,
    /// Exception sink: the component was returned to the supplier.
    Returned,
    /// Exception sink: the component is held pending non-conformance review.
    Quarantine,
}

/// Number of stages in the canonical progression.
pub const CANONICAL_STAGE_COUNT: usize = 19;

/// Number of exception sink stages.
pub const EXCEPTION_SINK_COUNT: usize = 3;

const CANONICAL: [Stage; CANONICAL_STAGE_COUNT] = [
    Stage::Draft,
    Stage::Approved,
    Stage::Available,
    Stage::Sourcing,
    Stage::RfqOpen,
    Stage::RfqAwarded,
    Stage::Purchasing,
    Stage::Ordered,
    Stage::Shipped,
    Stage::Received,
    Stage::Installed,
    Stage::Commissioned,
    Stage::Operational,
    Stage::WarrantyActive,
    Stage::Maintenance,
    Stage::Retired,
    Stage::Decommissioned,
    Stage::Recycling,
    Stage::Archived,
];

const SINKS: [Stage; EXCEPTION_SINK_COUNT] = [Stage::Cancelled, Stage::Returned, Stage::Quarantine];

impl Stage {
    /// The canonical stages in progression order.
    pub fn canonical() -> &'static [Stage] {
        &CANONICAL
    }

    /// The exception sink stages.
    pub fn exception_sinks() -> &'static [Stage] {
        &SINKS
    }

    /// Every stage: canonical order first, then the exception sinks.
    pub fn all_stages() -> impl Iterator<Item = Stage> {
        CANONICAL.iter().chain(SINKS.iter()).copied()
    }

    /// The initial stage of every component.
    pub const fn initial() -> Stage {
        Stage::Draft
    }

    /// Returns true for `cancelled`, `returned` and `quarantine`.
    pub fn is_exception_sink(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Returned | Self::Quarantine)
    }

    /// Zero-based position in the canonical order, `None` for exception sinks.
    pub fn ordinal(&self) -> Option<usize> {
        CANONICAL.iter().position(|s| s == self)
    }

    /// Returns the snake_case identifier. Matches the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Available => "available",
            Self::Sourcing => "sourcing",
            Self::RfqOpen => "rfq_open",
            Self::RfqAwarded => "rfq_awarded",
            Self::Purchasing => "purchasing",
            Self::Ordered => "ordered",
            Self::Shipped => "shipped",
            Self::Received => "received",
            Self::Installed => "installed",
            Self::Commissioned => "commissioned",
            Self::Operational => "operational",
            Self::WarrantyActive => "warranty_active",
            Self::Maintenance => "maintenance",
            Self::Retired => "retired",
            Self::Decommissioned => "decommissioned",
            Self::Recycling => "recycling",
            Self::Archived => "archived",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
            Self::Quarantine => "quarantine",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = EclError;

    /// Parse a stage from its snake_case identifier. Case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all_stages()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| EclError::UnknownStage(s.to_string()))
    }
}
