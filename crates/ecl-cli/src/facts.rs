//! # Facts Files
//!
//! Prerequisite and integration facts for offline validation, read from
//! YAML (`.yaml`, `.yml`) or JSON (`.json`):
//!
//! ```yaml
//! prerequisites:
//!   technical_specifications_complete: true
//!   budget_allocated: false
//! integrations:
//!   rfq_system: true
//! ```
//!
//! Unknown prerequisite or integration names are rejected. Anything not
//! listed is unknown, which the engine treats as unmet or unreachable.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use ecl_core::IntegrationDomain;
use ecl_lifecycle::{FactSheet, IntegrationStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactsFile {
    #[serde(default)]
    pub prerequisites: FactSheet,
    #[serde(default)]
    pub integrations: BTreeMap<IntegrationDomain, bool>,
}

impl FactsFile {
    /// Load a facts file, choosing the parser by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read facts file {}", path.display()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML facts file {}", path.display())),
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON facts file {}", path.display())),
            _ => bail!(
                "unsupported facts file extension: {} (expected .yaml, .yml or .json)",
                path.display()
            ),
        }
    }

    /// Load `path` if given, otherwise an empty set of facts.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map(Self::load).transpose().map(Option::unwrap_or_default)
    }

    /// Integration flags; unlisted domains are unreachable.
    pub fn integration_status(&self) -> IntegrationStatus {
        let mut status = IntegrationStatus::default();
        for (domain, reachable) in &self.integrations {
            status.set(*domain, *reachable);
        }
        status
    }
}
