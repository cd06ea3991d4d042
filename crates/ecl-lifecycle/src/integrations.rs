//! # Integration Readiness
//!
//! Aggregates the health of the five collaborating subsystems into one
//! boolean per [`IntegrationDomain`]. The engine never talks to those
//! subsystems itself: each is represented by an [`IntegrationProbe`] that
//! answers synchronously from whatever the host last observed.
//!
//! A domain with no probe, or whose probe reports anything other than
//! [`IntegrationHealth::Healthy`], is reported as unreachable. Probe results
//! are data, never errors.

use serde::{Deserialize, Serialize};
use std::fmt;

use ecl_core::IntegrationDomain;

/// Health of one collaborating subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IntegrationHealth {
    /// Reachable and operational.
    Healthy,
    /// Reachable but impaired (slow responses, partial failures).
    Degraded {
        /// Human-readable reason.
        reason: String,
    },
    /// Not reachable, timed out, or not configured.
    Unavailable {
        /// Human-readable reason.
        reason: String,
    },
}

impl IntegrationHealth {
    /// Shorthand for an `Unavailable` value.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

impl fmt::Display for IntegrationHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded { reason } => write!(f, "degraded: {reason}"),
            Self::Unavailable { reason } => write!(f, "unavailable: {reason}"),
        }
    }
}

/// Reports the current health of one integration domain.
///
/// Implementations must answer without blocking. Hosts that need network
/// checks run them elsewhere and let the probe read the latest result.
pub trait IntegrationProbe: Send + Sync + fmt::Debug {
    /// The domain this probe speaks for.
    fn domain(&self) -> IntegrationDomain;

    /// Latest known health.
    fn health(&self) -> IntegrationHealth;
}

/// A probe with a fixed answer. Used for offline evaluation and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticProbe {
    domain: IntegrationDomain,
    health: IntegrationHealth,
}

impl StaticProbe {
    pub fn new(domain: IntegrationDomain, health: IntegrationHealth) -> Self {
        Self { domain, health }
    }

    pub fn healthy(domain: IntegrationDomain) -> Self {
        Self::new(domain, IntegrationHealth::Healthy)
    }
}

impl IntegrationProbe for StaticProbe {
    fn domain(&self) -> IntegrationDomain {
        self.domain
    }

    fn health(&self) -> IntegrationHealth {
        self.health.clone()
    }
}

/// Reachability flag per integration domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationStatus {
    pub rfq_system: bool,
    pub purchase_orders: bool,
    pub lifecycle_transitions: bool,
    pub media_management: bool,
    pub inventory_tracking: bool,
}

impl IntegrationStatus {
    /// Every domain reachable.
    pub fn all_reachable() -> Self {
        let mut status = Self::default();
        for domain in IntegrationDomain::all_domains() {
            status.set(*domain, true);
        }
        status
    }

    pub fn get(&self, domain: IntegrationDomain) -> bool {
        match domain {
            IntegrationDomain::RfqSystem => self.rfq_system,
            IntegrationDomain::PurchaseOrders => self.purchase_orders,
            IntegrationDomain::LifecycleTransitions => self.lifecycle_transitions,
            IntegrationDomain::MediaManagement => self.media_management,
            IntegrationDomain::InventoryTracking => self.inventory_tracking,
        }
    }

    pub fn set(&mut self, domain: IntegrationDomain, reachable: bool) {
        let slot = match domain {
            IntegrationDomain::RfqSystem => &mut self.rfq_system,
            IntegrationDomain::PurchaseOrders => &mut self.purchase_orders,
            IntegrationDomain::LifecycleTransitions => &mut self.lifecycle_transitions,
            IntegrationDomain::MediaManagement => &mut self.media_management,
            IntegrationDomain::InventoryTracking => &mut self.inventory_tracking,
        };
        *slot = reachable;
    }

    /// Domains currently reported unreachable, in reporting order.
    pub fn unreachable(&self) -> Vec<IntegrationDomain> {
        IntegrationDomain::all_domains()
            .iter()
            .copied()
            .filter(|d| !self.get(*d))
            .collect()
    }
}

/// Aggregates a set of probes into an [`IntegrationStatus`].
#[derive(Debug, Default)]
pub struct IntegrationStatusReporter {
    probes: Vec<Box<dyn IntegrationProbe>>,
}

impl IntegrationStatusReporter {
    pub fn new(probes: Vec<Box<dyn IntegrationProbe>>) -> Self {
        Self { probes }
    }

    /// A reporter that answers with a fixed status. Domains marked false are
    /// reported as unavailable.
    pub fn fixed(status: IntegrationStatus) -> Self {
        let probes = IntegrationDomain::all_domains()
            .iter()
            .map(|domain| {
                let health = if status.get(*domain) {
                    IntegrationHealth::Healthy
                } else {
                    IntegrationHealth::unavailable("marked unreachable")
                };
                Box::new(StaticProbe::new(*domain, health)) as Box<dyn IntegrationProbe>
            })
            .collect();
        Self { probes }
    }

    /// Add a probe.
    pub fn register(&mut self, probe: Box<dyn IntegrationProbe>) {
        self.probes.push(probe);
    }

    /// Every probe's domain and health, in registration order.
    pub fn probe_all(&self) -> Vec<(IntegrationDomain, IntegrationHealth)> {
        self.probes.iter().map(|p| (p.domain(), p.health())).collect()
    }

    /// One flag per domain. A domain is reachable only if it has at least one
    /// probe and every probe for it reports healthy.
    pub fn status(&self) -> IntegrationStatus {
        let mut status = IntegrationStatus::default();
        for domain in IntegrationDomain::all_domains() {
            let mut probes = self.probes.iter().filter(|p| p.domain() == *domain).peekable();
            let reachable = probes.peek().is_some() && probes.all(|p| p.health().is_healthy());
            status.set(*domain, reachable);
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(domain: IntegrationDomain, health: IntegrationHealth) -> Box<dyn IntegrationProbe> {
        Box::new(StaticProbe::new(domain, health))
    }

    #[test]
    fn test_no_probes_means_unreachable() {
        let status = IntegrationStatusReporter::default().status();
        assert_eq!(status, IntegrationStatus::default());
        assert_eq!(status.unreachable().len(), 5);
    }

    #[test]
    fn test_healthy_probe_reported() {
        let reporter = IntegrationStatusReporter::new(vec![boxed(
            IntegrationDomain::RfqSystem,
            IntegrationHealth::Healthy,
        )]);
        let status = reporter.status();
        assert!(status.rfq_system);
        assert!(!status.purchase_orders);
    }

    #[test]
    fn test_degraded_counts_as_unreachable() {
        let reporter = IntegrationStatusReporter::new(vec![boxed(
            IntegrationDomain::MediaManagement,
            IntegrationHealth::Degraded {
                reason: "slow".into(),
            },
        )]);
        assert!(!reporter.status().media_management);
    }

    #[test]
    fn test_any_unhealthy_probe_for_domain_fails_it() {
        let mut reporter = IntegrationStatusReporter::default();
        reporter.register(boxed(IntegrationDomain::InventoryTracking, IntegrationHealth::Healthy));
        reporter.register(boxed(
            IntegrationDomain::InventoryTracking,
            IntegrationHealth::unavailable("timeout"),
        ));
        assert!(!reporter.status().inventory_tracking);
        assert_eq!(reporter.probe_all().len(), 2);
    }

    #[test]
    fn test_fixed_reporter_roundtrips_status() {
        let mut wanted = IntegrationStatus::all_reachable();
        wanted.set(IntegrationDomain::PurchaseOrders, false);
        let reporter = IntegrationStatusReporter::fixed(wanted);
        assert_eq!(reporter.status(), wanted);
        assert_eq!(wanted.unreachable(), vec![IntegrationDomain::PurchaseOrders]);
    }

    #[test]
    fn test_status_serializes_five_named_flags() {
        let json = serde_json::to_value(IntegrationStatus::all_reachable()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        for domain in IntegrationDomain::all_domains() {
            assert_eq!(obj[domain.as_str()], true);
        }
    }

    #[test]
    fn test_health_display() {
        assert_eq!(IntegrationHealth::Healthy.to_string(), "healthy");
        assert_eq!(
            IntegrationHealth::unavailable("down").to_string(),
            "unavailable: down"
        );
    }
}
