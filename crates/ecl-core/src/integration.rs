//! # Integration Domains
//!
//! The five collaborating subsystems a lifecycle stage may depend on. Each
//! validation reports one reachability flag per domain.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::EclError;

/// A collaborating subsystem outside the lifecycle engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationDomain {
    /// Sourcing and request-for-quotation bidding.
    RfqSystem,
    /// Purchase order approval and issuance.
    PurchaseOrders,
    /// Ledger of committed lifecycle transitions.
    LifecycleTransitions,
    /// Document and media storage.
    MediaManagement,
    /// Warehouse and site inventory.
    InventoryTracking,
}

/// Total number of integration domains.
pub const INTEGRATION_DOMAIN_COUNT: usize = 5;

impl IntegrationDomain {
    /// All five domains in reporting order.
    pub fn all_domains() -> &'static [IntegrationDomain] {
        &[
            Self::RfqSystem,
            Self::PurchaseOrders,
            Self::LifecycleTransitions,
            Self::MediaManagement,
            Self::InventoryTracking,
        ]
    }

    /// Returns the snake_case identifier. Matches the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RfqSystem => "rfq_system",
            Self::PurchaseOrders => "purchase_orders",
            Self::LifecycleTransitions => "lifecycle_transitions",
            Self::MediaManagement => "media_management",
            Self::InventoryTracking => "inventory_tracking",
        }
    }

    /// Upper-case token used in environment variable names.
    pub fn env_token(&self) -> &'static str {
        match self {
            Self::RfqSystem => "RFQ_SYSTEM",
            Self::PurchaseOrders => "PURCHASE_ORDERS",
            Self::LifecycleTransitions => "LIFECYCLE_TRANSITIONS",
            Self::MediaManagement => "MEDIA_MANAGEMENT",
            Self::InventoryTracking => "INVENTORY_TRACKING",
        }
    }
}

impl std::fmt::Display for IntegrationDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegrationDomain {
    type Err = EclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all_domains()
            .iter()
            .find(|d| d.as_str() == s)
            .copied()
            .ok_or_else(|| EclError::UnknownIntegration(s.to_string()))
    }
}
