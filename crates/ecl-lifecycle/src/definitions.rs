//! Built-in stage table for solar and battery hardware.

use ecl_core::{IntegrationDomain as I, Stage};

use crate::catalog::{AutomationLevel, StageDefinition};
use crate::prerequisites::Prerequisite as P;

const ENGINEERING: &str = "Engineering";
const PROJECT_MANAGER: &str = "Project Manager";
const PROCUREMENT: &str = "Procurement";
const FINANCE: &str = "Finance";
const SUPPLIER: &str = "Supplier";
const LOGISTICS: &str = "Logistics";
const WAREHOUSE: &str = "Warehouse";
const QUALITY: &str = "Quality Assurance";
const INSTALLER: &str = "Installation Crew";
const COMMISSIONING: &str = "Commissioning Engineer";
const OPERATIONS: &str = "Operations";
const MAINTENANCE: &str = "Maintenance Team";
const ASSET_MANAGER: &str = "Asset Manager";
const RECYCLER: &str = "Recycling Partner";
const COMPLIANCE: &str = "Compliance";

pub(crate) fn standard() -> Vec<StageDefinition> {
    vec![
        StageDefinition {
            stage: Stage::Draft,
            name: "Draft",
            description: "Component specification is being written and is not yet reviewed.",
            required_actions: &[
                "Capture electrical and mechanical specifications",
                "Attach datasheets and certifications",
                "Estimate unit cost",
            ],
            key_stakeholders: &[ENGINEERING, PROJECT_MANAGER],
            prerequisites: &[],
            outputs: &["Draft specification"],
            estimated_duration: "1-3 days",
            automation_level: AutomationLevel::Manual,
            integrations: &[I::MediaManagement],
        },
        StageDefinition {
            stage: Stage::Approved,
            name: "Approved",
            description: "Specification has passed technical review and has a budget.",
            required_actions: &[
                "Review specification against project requirements",
                "Sign technical approval",
                "Allocate budget line",
            ],
            key_stakeholders: &[ENGINEERING, FINANCE, PROJECT_MANAGER],
            prerequisites: &[
                P::TechnicalSpecificationsComplete,
                P::TechnicalApprovalSigned,
                P::BudgetAllocated,
            ],
            outputs: &["Approved specification", "Budget allocation"],
            estimated_duration: "2-5 days",
            automation_level: AutomationLevel::Manual,
            integrations: &[I::MediaManagement, I::LifecycleTransitions],
        },
        StageDefinition {
            stage: Stage::Available,
            name: "Available",
            description: "Component is published in the catalog and can be requested by projects.",
            required_actions: &["Publish catalog entry", "Set reorder thresholds"],
            key_stakeholders: &[PROCUREMENT, PROJECT_MANAGER],
            prerequisites: &[P::CatalogEntryPublished],
            outputs: &["Catalog entry"],
            estimated_duration: "1 day",
            automation_level: AutomationLevel::Automated,
            integrations: &[I::InventoryTracking],
        },
        StageDefinition {
            stage: Stage::Sourcing,
            name: "Sourcing",
            description: "Project demand is confirmed and candidate suppliers are being identified.",
            required_actions: &[
                "Confirm quantities with the requesting project",
                "Shortlist qualified suppliers",
            ],
            key_stakeholders: &[PROCUREMENT, PROJECT_MANAGER, SUPPLIER],
            prerequisites: &[P::ProjectDemandConfirmed, P::SupplierShortlistPrepared],
            outputs: &["Demand forecast", "Supplier shortlist"],
            estimated_duration: "3-7 days",
            automation_level: AutomationLevel::SemiAutomated,
            integrations: &[I::RfqSystem, I::InventoryTracking],
        },
        StageDefinition {
            stage: Stage::RfqOpen,
            name: "RFQ Open",
            description: "A request for quotation is out to shortlisted suppliers.",
            required_actions: &[
                "Issue RFQ documents",
                "Answer supplier clarifications",
                "Collect bids before the deadline",
            ],
            key_stakeholders: &[PROCUREMENT, SUPPLIER],
            prerequisites: &[P::RfqDocumentsPrepared],
            outputs: &["Supplier bids"],
            estimated_duration: "7-14 days",
            automation_level: AutomationLevel::SemiAutomated,
            integrations: &[I::RfqSystem, I::MediaManagement],
        },
        StageDefinition {
            stage: Stage::RfqAwarded,
            name: "RFQ Awarded",
            description: "Bids are evaluated and a supplier has been selected.",
            required_actions: &["Score bids", "Notify winning and losing suppliers"],
            key_stakeholders: &[PROCUREMENT, ENGINEERING, FINANCE],
            prerequisites: &[P::BidEvaluationComplete, P::SupplierSelected],
            outputs: &["Bid evaluation report", "Award notice"],
            estimated_duration: "2-5 days",
            automation_level: AutomationLevel::SemiAutomated,
            integrations: &[I::RfqSystem],
        },
        StageDefinition {
            stage: Stage::Purchasing,
            name: "Purchasing",
            description: "Purchase order is being drafted and routed for approval.",
            required_actions: &["Draft purchase order", "Route for financial approval"],
            key_stakeholders: &[PROCUREMENT, FINANCE],
            prerequisites: &[P::BudgetAllocated, P::SupplierSelected],
            outputs: &["Draft purchase order"],
            estimated_duration: "1-3 days",
            automation_level: AutomationLevel::SemiAutomated,
            integrations: &[I::PurchaseOrders],
        },
        StageDefinition {
            stage: Stage::Ordered,
            name: "Ordered",
            description: "Purchase order is placed and acknowledged by the supplier.",
            required_actions: &["Send purchase order", "Record supplier acknowledgement"],
            key_stakeholders: &[PROCUREMENT, SUPPLIER],
            prerequisites: &[P::PurchaseOrderApproved, P::SupplierConfirmationReceived],
            outputs: &["Issued purchase order", "Order confirmation"],
            estimated_duration: "1-2 days",
            automation_level: AutomationLevel::Automated,
            integrations: &[I::PurchaseOrders, I::LifecycleTransitions],
        },
        StageDefinition {
            stage: Stage::Shipped,
            name: "Shipped",
            description: "Component is in transit from the supplier.",
            required_actions: &["Track shipment", "Arrange site or warehouse receiving"],
            key_stakeholders: &[SUPPLIER, LOGISTICS],
            prerequisites: &[P::ShippingDocumentsIssued],
            outputs: &["Bill of lading", "Tracking reference"],
            estimated_duration: "5-30 days",
            automation_level: AutomationLevel::Automated,
            integrations: &[I::PurchaseOrders, I::MediaManagement],
        },
        StageDefinition {
            stage: Stage::Received,
            name: "Received",
            description: "Delivery has arrived, passed incoming inspection and is in inventory.",
            required_actions: &[
                "Inspect delivery against the order",
                "Book the component into inventory",
            ],
            key_stakeholders: &[WAREHOUSE, QUALITY, LOGISTICS],
            prerequisites: &[P::DeliveryInspected, P::InventoryRecorded],
            outputs: &["Goods received note", "Inspection report"],
            estimated_duration: "1-2 days",
            automation_level: AutomationLevel::SemiAutomated,
            integrations: &[I::InventoryTracking, I::MediaManagement],
        },
        StageDefinition {
            stage: Stage::Installed,
            name: "Installed",
            description: "Component is physically installed on site.",
            required_actions: &[
                "Install per the approved design",
                "Photograph the installation",
                "Obtain installation certificate",
            ],
            key_stakeholders: &[INSTALLER, PROJECT_MANAGER],
            prerequisites: &[P::InstallationCertified],
            outputs: &["Installation certificate", "As-built photos"],
            estimated_duration: "1-5 days",
            automation_level: AutomationLevel::Manual,
            integrations: &[I::InventoryTracking, I::MediaManagement],
        },
        StageDefinition {
            stage: Stage::Commissioned,
            name: "Commissioned",
            description: "Commissioning tests have passed and the component is cleared for service.",
            required_actions: &["Run commissioning test plan", "Record test results"],
            key_stakeholders: &[COMMISSIONING, QUALITY],
            prerequisites: &[P::CommissioningTestsPassed],
            outputs: &["Commissioning report"],
            estimated_duration: "1-3 days",
            automation_level: AutomationLevel::SemiAutomated,
            integrations: &[I::MediaManagement, I::LifecycleTransitions],
        },
        StageDefinition {
            stage: Stage::Operational,
            name: "Operational",
            description: "Component is in productive service.",
            required_actions: &["Record performance baseline", "Enable monitoring"],
            key_stakeholders: &[OPERATIONS, ASSET_MANAGER],
            prerequisites: &[P::PerformanceBaselineRecorded],
            outputs: &["Performance baseline"],
            estimated_duration: "Years",
            automation_level: AutomationLevel::Automated,
            integrations: &[I::InventoryTracking, I::LifecycleTransitions],
        },
        StageDefinition {
            stage: Stage::WarrantyActive,
            name: "Warranty Active",
            description: "Manufacturer warranty is registered and claims can be raised.",
            required_actions: &["Register warranty", "Store warranty terms"],
            key_stakeholders: &[ASSET_MANAGER, SUPPLIER],
            prerequisites: &[P::WarrantyRegistered],
            outputs: &["Warranty registration"],
            estimated_duration: "Warranty term",
            automation_level: AutomationLevel::SemiAutomated,
            integrations: &[I::MediaManagement],
        },
        StageDefinition {
            stage: Stage::Maintenance,
            name: "Maintenance",
            description: "Component is out of service for scheduled or corrective maintenance.",
            required_actions: &[
                "Schedule work order",
                "Perform maintenance",
                "Record parts used",
            ],
            key_stakeholders: &[MAINTENANCE, OPERATIONS],
            prerequisites: &[P::MaintenanceScheduled],
            outputs: &["Maintenance log"],
            estimated_duration: "1-10 days",
            automation_level: AutomationLevel::Manual,
            integrations: &[I::InventoryTracking, I::MediaManagement],
        },
        StageDefinition {
            stage: Stage::Retired,
            name: "Retired",
            description: "Component is withdrawn from service.",
            required_actions: &["Approve retirement", "Update asset register"],
            key_stakeholders: &[ASSET_MANAGER, OPERATIONS, FINANCE],
            prerequisites: &[P::DecommissioningApproved],
            outputs: &["Retirement approval"],
            estimated_duration: "1-5 days",
            automation_level: AutomationLevel::Manual,
            integrations: &[I::LifecycleTransitions, I::InventoryTracking],
        },
        StageDefinition {
            stage: Stage::Decommissioned,
            name: "Decommissioned",
            description: "Component is safely disconnected and removed from site.",
            required_actions: &["Isolate and disconnect", "Remove from site"],
            key_stakeholders: &[INSTALLER, COMPLIANCE],
            prerequisites: &[P::DisconnectionVerified],
            outputs: &["Disconnection record"],
            estimated_duration: "1-3 days",
            automation_level: AutomationLevel::Manual,
            integrations: &[I::InventoryTracking],
        },
        StageDefinition {
            stage: Stage::Recycling,
            name: "Recycling",
            description: "Component is with a certified recycling partner.",
            required_actions: &["Hand over to recycling partner", "Collect disposal certificate"],
            key_stakeholders: &[RECYCLER, COMPLIANCE],
            prerequisites: &[P::RecyclingPartnerAssigned],
            outputs: &["Disposal certificate"],
            estimated_duration: "7-30 days",
            automation_level: AutomationLevel::Manual,
            integrations: &[I::MediaManagement],
        },
        StageDefinition {
            stage: Stage::Archived,
            name: "Archived",
            description: "Lifecycle is closed and records are retained for audit.",
            required_actions: &["Archive lifecycle records"],
            key_stakeholders: &[COMPLIANCE, ASSET_MANAGER],
            prerequisites: &[P::RecordsArchived],
            outputs: &["Archived lifecycle record"],
            estimated_duration: "Permanent",
            automation_level: AutomationLevel::Automated,
            integrations: &[I::LifecycleTransitions, I::MediaManagement],
        },
        StageDefinition {
            stage: Stage::Cancelled,
            name: "Cancelled",
            description: "Component was cancelled before delivery.",
            required_actions: &["Record cancellation reason", "Release allocated budget"],
            key_stakeholders: &[PROJECT_MANAGER, PROCUREMENT, FINANCE],
            prerequisites: &[],
            outputs: &["Cancellation record"],
            estimated_duration: "1 day",
            automation_level: AutomationLevel::Manual,
            integrations: &[I::LifecycleTransitions, I::PurchaseOrders],
        },
        StageDefinition {
            stage: Stage::Returned,
            name: "Returned",
            description: "Component was sent back to the supplier.",
            required_actions: &["Obtain return authorization", "Ship back to supplier"],
            key_stakeholders: &[LOGISTICS, SUPPLIER, PROCUREMENT],
            prerequisites: &[P::ReturnAuthorizationIssued],
            outputs: &["Return authorization", "Credit note"],
            estimated_duration: "5-30 days",
            automation_level: AutomationLevel::Manual,
            integrations: &[I::PurchaseOrders, I::InventoryTracking],
        },
        StageDefinition {
            stage: Stage::Quarantine,
            name: "Quarantine",
            description: "Component is held pending non-conformance review.",
            required_actions: &["File non-conformance report", "Segregate the component"],
            key_stakeholders: &[QUALITY, WAREHOUSE],
            prerequisites: &[P::NonConformanceReported],
            outputs: &["Non-conformance report"],
            estimated_duration: "3-14 days",
            automation_level: AutomationLevel::Manual,
            integrations: &[I::InventoryTracking, I::MediaManagement],
        },
    ]
}
