//! # Integration Health Monitor
//!
//! The engine's [`IntegrationProbe`]s answer synchronously, so the network
//! side lives here: a background task GETs each configured health URL under
//! a timeout and writes the outcome into a shared [`HealthSnapshot`]. One
//! [`CachedProbe`] per domain reads that snapshot during validation.
//!
//! Probing is independent per domain. A slow or failing subsystem only
//! affects its own flag, and never turns into a request error.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::task::{JoinHandle, JoinSet};

use ecl_core::IntegrationDomain;
use ecl_lifecycle::{IntegrationHealth, IntegrationProbe, IntegrationStatusReporter};

use crate::state::AppConfig;

const NOT_PROBED: &str = "not probed yet";
const NOT_CONFIGURED: &str = "no health URL configured";
const PROBE_FAILED: &str = "probe task failed";

// -- Snapshot -----------------------------------------------------------------

/// Latest observed health per domain, shared between the monitor task and
/// request handlers.
#[derive(Debug, Clone, Default)]
pub struct HealthSnapshot {
    inner: Arc<RwLock<BTreeMap<IntegrationDomain, IntegrationHealth>>>,
}

impl HealthSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, domain: IntegrationDomain, health: IntegrationHealth) {
        self.inner.write().insert(domain, health);
    }

    /// Last recorded health, or unavailable if the domain was never probed.
    pub fn get(&self, domain: IntegrationDomain) -> IntegrationHealth {
        self.inner
            .read()
            .get(&domain)
            .cloned()
            .unwrap_or_else(|| IntegrationHealth::unavailable(NOT_PROBED))
    }

    /// One entry per domain, in reporting order.
    pub fn all(&self) -> Vec<(IntegrationDomain, IntegrationHealth)> {
        IntegrationDomain::all_domains()
            .iter()
            .map(|d| (*d, self.get(*d)))
            .collect()
    }

    /// A reporter with one [`CachedProbe`] per domain over this snapshot.
    pub fn reporter(&self) -> IntegrationStatusReporter {
        IntegrationStatusReporter::new(
            IntegrationDomain::all_domains()
                .iter()
                .map(|domain| {
                    Box::new(CachedProbe {
                        domain: *domain,
                        snapshot: self.clone(),
                    }) as Box<dyn IntegrationProbe>
                })
                .collect(),
        )
    }
}

/// Reads one domain's entry from a [`HealthSnapshot`].
#[derive(Debug, Clone)]
pub struct CachedProbe {
    domain: IntegrationDomain,
    snapshot: HealthSnapshot,
}

impl IntegrationProbe for CachedProbe {
    fn domain(&self) -> IntegrationDomain {
        self.domain
    }

    fn health(&self) -> IntegrationHealth {
        self.snapshot.get(self.domain)
    }
}

// -- Monitor ------------------------------------------------------------------

/// Polls configured health URLs and records results in a snapshot.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    client: reqwest::Client,
    targets: BTreeMap<IntegrationDomain, String>,
    timeout: Duration,
    snapshot: HealthSnapshot,
}

impl HealthMonitor {
    pub fn new(config: &AppConfig, snapshot: HealthSnapshot) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.probe_timeout)
            .build()?;
        Ok(Self {
            client,
            targets: config.health_urls.clone(),
            timeout: config.probe_timeout,
            snapshot,
        })
    }

    /// Probe every domain once. Unconfigured domains are marked unavailable.
    pub async fn refresh(&self) {
        let mut probes = JoinSet::new();
        let mut pending = BTreeSet::new();
        for domain in IntegrationDomain::all_domains() {
            match self.targets.get(domain) {
                Some(url) => {
                    let client = self.client.clone();
                    let url = url.clone();
                    let timeout = self.timeout;
                    let domain = *domain;
                    pending.insert(domain);
                    probes.spawn(async move { (domain, probe_once(&client, &url, timeout).await) });
                }
                None => self
                    .snapshot
                    .record(*domain, IntegrationHealth::unavailable(NOT_CONFIGURED)),
            }
        }

        self.collect(probes, pending).await;
    }

    /// Drain finished probes into the snapshot. Domains in `pending` whose
    /// task never reported (panicked or cancelled) are marked unavailable.
    async fn collect(
        &self,
        mut probes: JoinSet<(IntegrationDomain, IntegrationHealth)>,
        mut pending: BTreeSet<IntegrationDomain>,
    ) {
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok((domain, health)) => {
                    if !health.is_healthy() {
                        tracing::warn!(domain = %domain, health = %health, "integration not healthy");
                    }
                    pending.remove(&domain);
                    self.snapshot.record(domain, health);
                }
                Err(err) => tracing::error!(error = %err, "integration probe task failed"),
            }
        }
        for domain in pending {
            self.snapshot
                .record(domain, IntegrationHealth::unavailable(PROBE_FAILED));
        }
    }

    /// Refresh now and then every `interval` until the runtime shuts down.
    pub fn spawn(self, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.refresh().await;
            }
        })
    }
}

/// 2xx is healthy, 5xx unavailable, anything else degraded.
async fn probe_once(client: &reqwest::Client, url: &str, timeout: Duration) -> IntegrationHealth {
    match tokio::time::timeout(timeout, client.get(url).send()).await {
        Err(_) => IntegrationHealth::unavailable(format!(
            "timed out after {} ms",
            timeout.as_millis()
        )),
        Ok(Err(err)) => IntegrationHealth::unavailable(format!("request failed: {err}")),
        Ok(Ok(resp)) => {
            let status = resp.status();
            if status.is_success() {
                IntegrationHealth::Healthy
            } else if status.is_server_error() {
                IntegrationHealth::unavailable(format!("status {status}"))
            } else {
                IntegrationHealth::Degraded {
                    reason: format!("status {status}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_with(urls: &[(IntegrationDomain, String)], timeout_ms: u64) -> AppConfig {
        AppConfig {
            probe_timeout: Duration::from_millis(timeout_ms),
            health_urls: urls.iter().cloned().collect(),
            ..AppConfig::default()
        }
    }

    async fn server_returning(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn unprobed_domain_is_unavailable() {
        let snapshot = HealthSnapshot::new();
        assert!(!snapshot.get(IntegrationDomain::RfqSystem).is_healthy());
        assert_eq!(snapshot.reporter().status().unreachable().len(), 5);
    }

    #[test]
    fn reporter_reads_latest_snapshot() {
        let snapshot = HealthSnapshot::new();
        let reporter = snapshot.reporter();
        snapshot.record(IntegrationDomain::MediaManagement, IntegrationHealth::Healthy);
        assert!(reporter.status().media_management);
        snapshot.record(
            IntegrationDomain::MediaManagement,
            IntegrationHealth::unavailable("down"),
        );
        assert!(!reporter.status().media_management);
    }

    #[tokio::test]
    async fn refresh_records_each_domain_independently() {
        let ok = server_returning(200).await;
        let failing = server_returning(503).await;
        let limited = server_returning(429).await;
        let config = config_with(
            &[
                (IntegrationDomain::RfqSystem, ok.uri()),
                (IntegrationDomain::PurchaseOrders, failing.uri()),
                (IntegrationDomain::InventoryTracking, limited.uri()),
            ],
            2000,
        );
        let snapshot = HealthSnapshot::new();
        HealthMonitor::new(&config, snapshot.clone())
            .unwrap()
            .refresh()
            .await;

        assert!(snapshot.get(IntegrationDomain::RfqSystem).is_healthy());
        assert!(matches!(
            snapshot.get(IntegrationDomain::PurchaseOrders),
            IntegrationHealth::Unavailable { .. }
        ));
        assert!(matches!(
            snapshot.get(IntegrationDomain::InventoryTracking),
            IntegrationHealth::Degraded { .. }
        ));
        assert_eq!(
            snapshot.get(IntegrationDomain::MediaManagement),
            IntegrationHealth::unavailable(NOT_CONFIGURED)
        );
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;
        let config = config_with(&[(IntegrationDomain::RfqSystem, server.uri())], 50);
        let snapshot = HealthSnapshot::new();
        HealthMonitor::new(&config, snapshot.clone())
            .unwrap()
            .refresh()
            .await;
        assert!(!snapshot.get(IntegrationDomain::RfqSystem).is_healthy());
    }

    #[tokio::test]
    async fn crashed_probe_clears_previous_health() {
        let snapshot = HealthSnapshot::new();
        snapshot.record(IntegrationDomain::RfqSystem, IntegrationHealth::Healthy);
        snapshot.record(IntegrationDomain::PurchaseOrders, IntegrationHealth::Healthy);
        let monitor = HealthMonitor::new(&AppConfig::default(), snapshot.clone()).unwrap();

        let mut probes: JoinSet<(IntegrationDomain, IntegrationHealth)> = JoinSet::new();
        probes.spawn(async { panic!("probe crashed") });
        probes.spawn(async { (IntegrationDomain::PurchaseOrders, IntegrationHealth::Healthy) });
        let pending = [IntegrationDomain::RfqSystem, IntegrationDomain::PurchaseOrders]
            .into_iter()
            .collect();
        monitor.collect(probes, pending).await;

        assert_eq!(
            snapshot.get(IntegrationDomain::RfqSystem),
            IntegrationHealth::unavailable(PROBE_FAILED)
        );
        assert!(snapshot.get(IntegrationDomain::PurchaseOrders).is_healthy());
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        let config = config_with(
            &[(IntegrationDomain::LifecycleTransitions, "http://127.0.0.1:1".into())],
            500,
        );
        let snapshot = HealthSnapshot::new();
        HealthMonitor::new(&config, snapshot.clone())
            .unwrap()
            .refresh()
            .await;
        assert!(!snapshot.get(IntegrationDomain::LifecycleTransitions).is_healthy());
    }
}
