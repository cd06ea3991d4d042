//! # Stage Catalog
//!
//! Immutable registry of one [`StageDefinition`] per [`Stage`]. Definitions
//! are stored in an arena ordered like `Stage::all_stages()` so that a stage
//! resolves to its definition by position, and a name index resolves raw
//! identifiers coming in from callers.
//!
//! The standard catalog is built once on first use and shared for the
//! process lifetime.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use ecl_core::{IntegrationDomain, Stage, CANONICAL_STAGE_COUNT};

use crate::definitions;
use crate::error::LifecycleError;
use crate::prerequisites::Prerequisite;

/// How much of a stage's work is done without human intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationLevel {
    Manual,
    SemiAutomated,
    Automated,
}

impl AutomationLevel {
    /// All levels, least automated first.
    pub fn all() -> &'static [AutomationLevel] {
        &[Self::Manual, Self::SemiAutomated, Self::Automated]
    }

    /// Returns the snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::SemiAutomated => "semi_automated",
            Self::Automated => "automated",
        }
    }
}

impl std::fmt::Display for AutomationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageDefinition {
    pub stage: Stage,
    /// Display name.
    pub name: &'static str,
    pub description: &'static str,
    /// Work to be done while in the stage, in order.
    pub required_actions: &'static [&'static str],
    pub key_stakeholders: &'static [&'static str],
    /// Conditions that must hold for the component to be validly in the stage.
    pub prerequisites: &'static [Prerequisite],
    /// Artifacts produced by the stage, in order.
    pub outputs: &'static [&'static str],
    /// Informational only; never used for scheduling.
    pub estimated_duration: &'static str,
    pub automation_level: AutomationLevel,
    pub integrations: &'static [IntegrationDomain],
}

/// Indexed, read-only stage registry.
#[derive(Debug)]
pub struct StageCatalog {
    /// Ordered like `Stage::all_stages()`: canonical stages, then sinks.
    definitions: Vec<StageDefinition>,
    by_name: HashMap<&'static str, Stage>,
}

static STANDARD: OnceLock<StageCatalog> = OnceLock::new();

impl StageCatalog {
    /// Build a catalog, checking that every stage has exactly one definition
    /// and that no stage lists a prerequisite, stakeholder or integration twice.
    pub fn from_definitions(defs: Vec<StageDefinition>) -> Result<Self, LifecycleError> {
        let mut slots: Vec<Option<StageDefinition>> = Stage::all_stages().map(|_| None).collect();

        for def in defs {
            let slot = &mut slots[def.stage as usize];
            if slot.is_some() {
                return Err(LifecycleError::CatalogInvariant(format!(
                    "duplicate definition for stage {}",
                    def.stage
                )));
            }
            check_unique(def.stage, "prerequisite", def.prerequisites.iter())?;
            check_unique(def.stage, "stakeholder", def.key_stakeholders.iter())?;
            check_unique(def.stage, "integration", def.integrations.iter())?;
            *slot = Some(def);
        }

        let mut definitions = Vec::with_capacity(slots.len());
        for (stage, slot) in Stage::all_stages().zip(slots) {
            let def = slot.ok_or_else(|| {
                LifecycleError::CatalogInvariant(format!("missing definition for stage {stage}"))
            })?;
            definitions.push(def);
        }

        let by_name = definitions
            .iter()
            .map(|d| (d.stage.as_str(), d.stage))
            .collect();

        Ok(Self {
            definitions,
            by_name,
        })
    }

    /// The built-in catalog for energy-system hardware.
    pub fn standard() -> &'static StageCatalog {
        STANDARD.get_or_init(|| {
            Self::from_definitions(definitions::standard())
                .expect("built-in stage table is well-formed")
        })
    }

    /// Definition of a known stage.
    pub fn lookup(&self, stage: Stage) -> &StageDefinition {
        // `from_definitions` fills every slot, so the position always exists.
        &self.definitions[stage as usize]
    }

    /// Resolve a raw stage identifier.
    pub fn lookup_name(&self, name: &str) -> Result<&StageDefinition, LifecycleError> {
        self.by_name
            .get(name)
            .map(|stage| self.lookup(*stage))
            .ok_or_else(|| LifecycleError::UnknownStage {
                value: name.to_string(),
            })
    }

    /// Whether `stage` has a definition. Always true for a constructed catalog.
    pub fn contains(&self, stage: Stage) -> bool {
        self.by_name.contains_key(stage.as_str())
    }

    /// Canonical stages in progression order.
    pub fn all(&self) -> &[StageDefinition] {
        &self.definitions[..CANONICAL_STAGE_COUNT]
    }

    /// Exception sink definitions.
    pub fn exception_sinks(&self) -> &[StageDefinition] {
        &self.definitions[CANONICAL_STAGE_COUNT..]
    }

    /// Every definition: canonical stages, then sinks.
    pub fn iter(&self) -> impl Iterator<Item = &StageDefinition> {
        self.definitions.iter()
    }
}

fn check_unique<T>(
    stage: Stage,
    what: &str,
    items: impl Iterator<Item = T>,
) -> Result<(), LifecycleError>
where
    T: std::hash::Hash + Eq + std::fmt::Debug,
{
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item) {
            return Err(LifecycleError::CatalogInvariant(format!(
                "stage {stage} lists {what} more than once"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_builds() {
        let catalog = StageCatalog::standard();
        assert_eq!(catalog.all().len(), 19);
        assert_eq!(catalog.exception_sinks().len(), 3);
        assert_eq!(catalog.iter().count(), 22);
    }

    #[test]
    fn test_arena_order_matches_stage_order() {
        let catalog = StageCatalog::standard();
        for (def, stage) in catalog.iter().zip(Stage::all_stages()) {
            assert_eq!(def.stage, stage);
            assert_eq!(catalog.lookup(stage).stage, stage);
        }
        let canonical: Vec<Stage> = catalog.all().iter().map(|d| d.stage).collect();
        assert_eq!(canonical, Stage::canonical());
    }

    #[test]
    fn test_lookup_name() {
        let catalog = StageCatalog::standard();
        assert_eq!(catalog.lookup_name("rfq_open").unwrap().stage, Stage::RfqOpen);
        assert_eq!(
            catalog.lookup_name("quarantine").unwrap().stage,
            Stage::Quarantine
        );
        assert_eq!(
            catalog.lookup_name("launched").unwrap_err(),
            LifecycleError::UnknownStage {
                value: "launched".into()
            }
        );
        assert!(catalog.lookup_name("Draft").is_err());
    }

    #[test]
    fn test_every_definition_populated() {
        for def in StageCatalog::standard().iter() {
            assert!(!def.name.is_empty(), "{}", def.stage);
            assert!(!def.description.is_empty(), "{}", def.stage);
            assert!(!def.required_actions.is_empty(), "{}", def.stage);
            assert!(!def.key_stakeholders.is_empty(), "{}", def.stage);
            assert!(!def.outputs.is_empty(), "{}", def.stage);
            assert!(!def.estimated_duration.is_empty(), "{}", def.stage);
        }
    }

    #[test]
    fn test_duplicate_definition_rejected() {
        let mut defs = definitions::standard();
        defs.push(defs[0]);
        let err = StageCatalog::from_definitions(defs).unwrap_err();
        assert!(err.to_string().contains("duplicate definition for stage draft"));
    }

    #[test]
    fn test_missing_definition_rejected() {
        let defs: Vec<_> = definitions::standard()
            .into_iter()
            .filter(|d| d.stage != Stage::Recycling)
            .collect();
        let err = StageCatalog::from_definitions(defs).unwrap_err();
        assert!(err.to_string().contains("missing definition for stage recycling"));
    }

    #[test]
    fn test_repeated_prerequisite_rejected() {
        let mut defs = definitions::standard();
        defs[1].prerequisites = &[Prerequisite::BudgetAllocated, Prerequisite::BudgetAllocated];
        assert!(StageCatalog::from_definitions(defs).is_err());
    }

    #[test]
    fn test_definition_serializes_snake_case() {
        let json = serde_json::to_value(StageCatalog::standard().lookup(Stage::RfqOpen)).unwrap();
        assert_eq!(json["stage"], "rfq_open");
        assert_eq!(json["automation_level"], "semi_automated");
        assert_eq!(json["integrations"][0], "rfq_system");
        assert_eq!(json["prerequisites"][0], "rfq_documents_prepared");
    }
}
