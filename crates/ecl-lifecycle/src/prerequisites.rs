//! # Prerequisites
//!
//! Every stage declares the conditions that must hold for a component to be
//! validly in that stage. Conditions are a closed enumeration so that the
//! displayed name and the evaluated predicate cannot drift apart.
//!
//! The engine holds no knowledge of how a condition is checked. Callers
//! supply a [`PrerequisiteContext`]; anything the context cannot answer is
//! treated as missing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use ecl_core::{EclError, Stage};

use crate::catalog::StageCatalog;

/// A named condition gating residency in a lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prerequisite {
    TechnicalSpecificationsComplete,
    TechnicalApprovalSigned,
    BudgetAllocated,
    CatalogEntryPublished,
    ProjectDemandConfirmed,
    SupplierShortlistPrepared,
    RfqDocumentsPrepared,
    BidEvaluationComplete,
    SupplierSelected,
    PurchaseOrderApproved,
    SupplierConfirmationReceived,
    ShippingDocumentsIssued,
    DeliveryInspected,
    InventoryRecorded,
    InstallationCertified,
    CommissioningTestsPassed,
    PerformanceBaselineRecorded,
    WarrantyRegistered,
    MaintenanceScheduled,
    DecommissioningApproved,
    DisconnectionVerified,
    RecyclingPartnerAssigned,
    RecordsArchived,
    ReturnAuthorizationIssued,
    NonConformanceReported,
}

const ALL_PREREQUISITES: [Prerequisite; 25] = [
    Prerequisite::TechnicalSpecificationsComplete,
    Prerequisite::TechnicalApprovalSigned,
    Prerequisite::BudgetAllocated,
    Prerequisite::CatalogEntryPublished,
    Prerequisite::ProjectDemandConfirmed,
    Prerequisite::SupplierShortlistPrepared,
    Prerequisite::RfqDocumentsPrepared,
    Prerequisite::BidEvaluationComplete,
    Prerequisite::SupplierSelected,
    Prerequisite::PurchaseOrderApproved,
    Prerequisite::SupplierConfirmationReceived,
    Prerequisite::ShippingDocumentsIssued,
    Prerequisite::DeliveryInspected,
    Prerequisite::InventoryRecorded,
    Prerequisite::InstallationCertified,
    Prerequisite::CommissioningTestsPassed,
    Prerequisite::PerformanceBaselineRecorded,
    Prerequisite::WarrantyRegistered,
    Prerequisite::MaintenanceScheduled,
    Prerequisite::DecommissioningApproved,
    Prerequisite::DisconnectionVerified,
    Prerequisite::RecyclingPartnerAssigned,
    Prerequisite::RecordsArchived,
    Prerequisite::ReturnAuthorizationIssued,
    Prerequisite::NonConformanceReported,
];

impl Prerequisite {
    /// Every prerequisite, in declaration order.
    pub fn all() -> &'static [Prerequisite] {
        &ALL_PREREQUISITES
    }

    /// Returns the snake_case identifier. Matches the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TechnicalSpecificationsComplete => "technical_specifications_complete",
            Self::TechnicalApprovalSigned => "technical_approval_signed",
            Self::BudgetAllocated => "budget_allocated",
            Self::CatalogEntryPublished => "catalog_entry_published",
            Self::ProjectDemandConfirmed => "project_demand_confirmed",
            Self::SupplierShortlistPrepared => "supplier_shortlist_prepared",
            Self::RfqDocumentsPrepared => "rfq_documents_prepared",
            Self::BidEvaluationComplete => "bid_evaluation_complete",
            Self::SupplierSelected => "supplier_selected",
            Self::PurchaseOrderApproved => "purchase_order_approved",
            Self::SupplierConfirmationReceived => "supplier_confirmation_received",
            Self::ShippingDocumentsIssued => "shipping_documents_issued",
            Self::DeliveryInspected => "delivery_inspected",
            Self::InventoryRecorded => "inventory_recorded",
            Self::InstallationCertified => "installation_certified",
            Self::CommissioningTestsPassed => "commissioning_tests_passed",
            Self::PerformanceBaselineRecorded => "performance_baseline_recorded",
            Self::WarrantyRegistered => "warranty_registered",
            Self::MaintenanceScheduled => "maintenance_scheduled",
            Self::DecommissioningApproved => "decommissioning_approved",
            Self::DisconnectionVerified => "disconnection_verified",
            Self::RecyclingPartnerAssigned => "recycling_partner_assigned",
            Self::RecordsArchived => "records_archived",
            Self::ReturnAuthorizationIssued => "return_authorization_issued",
            Self::NonConformanceReported => "non_conformance_reported",
        }
    }

    /// Human-readable question the owning collaborator answers.
    pub fn description(&self) -> &'static str {
        match self {
            Self::TechnicalSpecificationsComplete => "Are the technical specifications complete?",
            Self::TechnicalApprovalSigned => "Has engineering signed the technical approval?",
            Self::BudgetAllocated => "Is budget allocated for this component?",
            Self::CatalogEntryPublished => "Is the catalog entry published?",
            Self::ProjectDemandConfirmed => "Has a project confirmed demand for the component?",
            Self::SupplierShortlistPrepared => "Is a supplier shortlist prepared?",
            Self::RfqDocumentsPrepared => "Are the RFQ documents prepared?",
            Self::BidEvaluationComplete => "Is bid evaluation complete?",
            Self::SupplierSelected => "Has a supplier been selected?",
            Self::PurchaseOrderApproved => "Is the purchase order approved?",
            Self::SupplierConfirmationReceived => "Has the supplier confirmed the order?",
            Self::ShippingDocumentsIssued => "Are shipping documents issued?",
            Self::DeliveryInspected => "Has the delivery passed incoming inspection?",
            Self::InventoryRecorded => "Is the component recorded in inventory?",
            Self::InstallationCertified => "Is the installation certified?",
            Self::CommissioningTestsPassed => "Have commissioning tests passed?",
            Self::PerformanceBaselineRecorded => "Is the performance baseline recorded?",
            Self::WarrantyRegistered => "Is the warranty registered with the manufacturer?",
            Self::MaintenanceScheduled => "Is a maintenance work order scheduled?",
            Self::DecommissioningApproved => "Is decommissioning approved?",
            Self::DisconnectionVerified => "Is safe disconnection verified?",
            Self::RecyclingPartnerAssigned => "Is a certified recycling partner assigned?",
            Self::RecordsArchived => "Are lifecycle records archived?",
            Self::ReturnAuthorizationIssued => "Has the supplier issued a return authorization?",
            Self::NonConformanceReported => "Is a non-conformance report filed?",
        }
    }
}

impl std::fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Prerequisite {
    type Err = EclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_PREREQUISITES
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| EclError::UnknownPrerequisite(s.to_string()))
    }
}

// ─── Context ─────────────────────────────────────────────────────────

/// Answers whether a prerequisite currently holds.
///
/// `None` means the context cannot tell. The evaluator treats that the same
/// as `Some(false)`.
pub trait PrerequisiteContext {
    /// Evaluate one prerequisite.
    fn evaluate(&self, prerequisite: Prerequisite) -> Option<bool>;
}

impl<F> PrerequisiteContext for F
where
    F: Fn(Prerequisite) -> Option<bool>,
{
    fn evaluate(&self, prerequisite: Prerequisite) -> Option<bool> {
        self(prerequisite)
    }
}

/// An explicit table of prerequisite facts supplied by a caller.
///
/// Serializes as a map from snake_case prerequisite name to boolean.
/// Unknown names are rejected on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactSheet {
    facts: BTreeMap<Prerequisite, bool>,
}

impl FactSheet {
    /// An empty sheet. Every prerequisite evaluates as unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sheet where every known prerequisite holds.
    pub fn all_satisfied() -> Self {
        Self {
            facts: ALL_PREREQUISITES.iter().map(|p| (*p, true)).collect(),
        }
    }

    /// Build from `(name, value)` pairs, rejecting unknown names.
    pub fn from_named<I, S>(pairs: I) -> Result<Self, EclError>
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        let mut sheet = Self::new();
        for (name, value) in pairs {
            sheet.set(name.as_ref().parse()?, value);
        }
        Ok(sheet)
    }

    /// Record a fact, replacing any earlier value.
    pub fn set(&mut self, prerequisite: Prerequisite, holds: bool) -> &mut Self {
        self.facts.insert(prerequisite, holds);
        self
    }

    /// Builder form of [`FactSheet::set`].
    pub fn with(mut self, prerequisite: Prerequisite, holds: bool) -> Self {
        self.set(prerequisite, holds);
        self
    }

    /// Number of recorded facts.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether no facts are recorded.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl PrerequisiteContext for FactSheet {
    fn evaluate(&self, prerequisite: Prerequisite) -> Option<bool> {
        self.facts.get(&prerequisite).copied()
    }
}

// ─── Evaluator ───────────────────────────────────────────────────────

/// Determines which of a stage's declared prerequisites are unmet.
#[derive(Debug, Clone, Copy)]
pub struct PrerequisiteEvaluator<'a> {
    catalog: &'a StageCatalog,
}

impl<'a> PrerequisiteEvaluator<'a> {
    /// Create an evaluator over a catalog.
    pub fn new(catalog: &'a StageCatalog) -> Self {
        Self { catalog }
    }

    /// Prerequisites of `target` that evaluate false or unknown under `ctx`.
    ///
    /// Returned in the stage's declared order, each at most once.
    pub fn missing_prerequisites(
        &self,
        target: Stage,
        ctx: &dyn PrerequisiteContext,
    ) -> Vec<Prerequisite> {
        self.catalog
            .lookup(target)
            .prerequisites
            .iter()
            .copied()
            .filter(|p| match ctx.evaluate(*p) {
                Some(true) => false,
                Some(false) => true,
                None => {
                    tracing::warn!(
                        stage = %target,
                        prerequisite = %p,
                        "prerequisite not answered by context; treating as missing"
                    );
                    true
                }
            })
            .collect()
    }
}
