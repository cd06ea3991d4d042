//! # Identifier Newtypes
//!
//! `ComponentId` names a tracked hardware component; `TransitionId` names one
//! committed stage change. Distinct types keep the two from being swapped.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EclError;

/// Maximum length of a component identifier, in bytes.
pub const COMPONENT_ID_MAX_LEN: usize = 128;

/// Identifier of a hardware component, owned by the inventory collaborator.
///
/// Accepts ASCII letters, digits and `-`, `_`, `.`, `:`. Serial numbers,
/// asset tags and UUIDs all fit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentId(String);

impl ComponentId {
    /// Construct a validated component identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, EclError> {
        let value = value.into();
        if value.is_empty() {
            return Err(EclError::InvalidIdentifier(
                "component id must not be empty".into(),
            ));
        }
        if value.len() > COMPONENT_ID_MAX_LEN {
            return Err(EclError::InvalidIdentifier(format!(
                "component id exceeds {COMPONENT_ID_MAX_LEN} bytes"
            )));
        }
        if let Some(bad) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')))
        {
            return Err(EclError::InvalidIdentifier(format!(
                "component id {value:?} contains disallowed character {bad:?}"
            )));
        }
        Ok(Self(value))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ComponentId {
    type Error = EclError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ComponentId> for String {
    fn from(id: ComponentId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of a committed transition record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionId(pub Uuid);

impl TransitionId {
    /// Generate a new random transition identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransitionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_id_accepts_serials() {
        for raw in ["INV-2024-0042", "batt_pack.7", "urn:asset:77", "a"] {
            assert_eq!(ComponentId::new(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_component_id_rejects_empty() {
        assert!(ComponentId::new("").is_err());
    }

    #[test]
    fn test_component_id_rejects_bad_chars() {
        assert!(ComponentId::new("panel 1").is_err());
        assert!(ComponentId::new("panel/1").is_err());
        assert!(ComponentId::new("pänel").is_err());
    }

    #[test]
    fn test_component_id_rejects_overlong() {
        let long = "x".repeat(COMPONENT_ID_MAX_LEN + 1);
        assert!(ComponentId::new(long).is_err());
        let max = "x".repeat(COMPONENT_ID_MAX_LEN);
        assert!(ComponentId::new(max).is_ok());
    }

    #[test]
    fn test_component_id_serde_validates() {
        let id: ComponentId = serde_json::from_str("\"PV-001\"").unwrap();
        assert_eq!(id.to_string(), "PV-001");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"PV-001\"");
        assert!(serde_json::from_str::<ComponentId>("\"\"").is_err());
    }

    #[test]
    fn test_transition_ids_unique() {
        assert_ne!(TransitionId::new(), TransitionId::new());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn accepted_ids_roundtrip(raw in "[A-Za-z0-9_.:-]{1,128}") {
                let id = ComponentId::new(raw.clone()).unwrap();
                prop_assert_eq!(id.as_str(), raw.as_str());
            }

            #[test]
            fn whitespace_always_rejected(prefix in "[a-z]{0,8}", suffix in "[a-z]{0,8}") {
                let raw = format!("{prefix} {suffix}");
                prop_assert!(ComponentId::new(raw).is_err());
            }
        }
    }
}
