//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! - **Workflow**: the validation service over the standard catalog and
//!   graph, with integration probes backed by the [`HealthSnapshot`].
//! - **Components**: versioned component records, committed under a
//!   single write lock.
//! - **Config**: [`AppConfig`], read once from the environment.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;
use thiserror::Error;

use ecl_core::{ComponentId, IntegrationDomain};
use ecl_lifecycle::{ComponentMetricsSource, ComponentRecord, WorkflowValidationService};

use crate::integrations::HealthSnapshot;

// -- Component Store ----------------------------------------------------------

/// Thread-safe, cloneable in-memory component store.
///
/// The lock is `parking_lot` and is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct ComponentStore {
    data: Arc<RwLock<HashMap<ComponentId, ComponentRecord>>>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record unless one with the same id exists. Returns `false`
    /// on a duplicate.
    pub fn insert_new(&self, record: ComponentRecord) -> bool {
        let mut guard = self.data.write();
        if guard.contains_key(&record.id) {
            return false;
        }
        guard.insert(record.id.clone(), record);
        true
    }

    pub fn get(&self, id: &ComponentId) -> Option<ComponentRecord> {
        self.data.read().get(id).cloned()
    }

    /// Atomically read-validate-update a record.
    ///
    /// The closure runs under the write lock, so a validation and the commit
    /// it guards cannot interleave with another writer. `None` if the record
    /// does not exist.
    pub fn try_update<R, E>(
        &self,
        id: &ComponentId,
        f: impl FnOnce(&mut ComponentRecord) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// -- Configuration ------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: String,
        value: String,
        reason: String,
    },
}

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Install the Prometheus recorder and mount `/metrics`.
    pub metrics_enabled: bool,
    pub probe_timeout: Duration,
    pub probe_interval: Duration,
    /// Health URL per integration domain. Absent domains are reported
    /// unreachable.
    pub health_urls: BTreeMap<IntegrationDomain, String>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Read `ECL_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset variables. Set but unparseable values are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = lookup("ECL_HOST").unwrap_or(defaults.host);
        let port = parse_var(&lookup, "ECL_PORT", defaults.port)?;
        let metrics_enabled =
            parse_var(&lookup, "ECL_METRICS_ENABLED", defaults.metrics_enabled)?;
        let probe_timeout_ms: u64 = parse_var(
            &lookup,
            "ECL_PROBE_TIMEOUT_MS",
            duration_millis(defaults.probe_timeout),
        )?;
        let probe_interval_secs: u64 = parse_var(
            &lookup,
            "ECL_PROBE_INTERVAL_SECS",
            defaults.probe_interval.as_secs(),
        )?;
        if probe_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "ECL_PROBE_INTERVAL_SECS".into(),
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        let health_urls = IntegrationDomain::all_domains()
            .iter()
            .filter_map(|domain| {
                lookup(&format!("ECL_{}_HEALTH_URL", domain.env_token()))
                    .filter(|url| !url.trim().is_empty())
                    .map(|url| (*domain, url))
            })
            .collect();

        let log_format = match lookup("ECL_LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "ECL_LOG_FORMAT".into(),
                    value: other.into(),
                    reason: "expected \"pretty\" or \"json\"".into(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            metrics_enabled,
            probe_timeout: Duration::from_millis(probe_timeout_ms),
            probe_interval: Duration::from_secs(probe_interval_secs),
            health_urls,
            log_format,
        })
    }
}

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, var: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: var.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

// Health URLs can carry credentials in their query string.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("metrics_enabled", &self.metrics_enabled)
            .field("probe_timeout", &self.probe_timeout)
            .field("probe_interval", &self.probe_interval)
            .field(
                "health_urls",
                &self.health_urls.keys().map(|d| d.as_str()).collect::<Vec<_>>(),
            )
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            metrics_enabled: true,
            probe_timeout: Duration::from_millis(2000),
            probe_interval: Duration::from_secs(30),
            health_urls: BTreeMap::new(),
            log_format: LogFormat::Pretty,
        }
    }
}

// -- Application State --------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub workflow: Arc<WorkflowValidationService<'static>>,
    pub components: ComponentStore,
    pub integrations: HealthSnapshot,
    /// Present when the Prometheus recorder was installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State with default configuration and no metrics exporter.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let integrations = HealthSnapshot::new();
        let workflow = WorkflowValidationService::standard(integrations.reporter());
        Self {
            config: Arc::new(config),
            workflow: Arc::new(workflow),
            components: ComponentStore::new(),
            integrations,
            metrics: None,
        }
    }

    /// Attach the handle `/metrics` renders from.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentMetricsSource for AppState {
    fn component_metrics(&self, component_id: &ComponentId) -> Option<serde_json::Value> {
        self.components
            .get(component_id)
            .map(|record| record.metrics(&self.workflow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn config_defaults() {
        let config = AppConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.metrics_enabled);
        assert_eq!(config.probe_timeout, Duration::from_millis(2000));
        assert_eq!(config.probe_interval, Duration::from_secs(30));
        assert!(config.health_urls.is_empty());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn config_reads_overrides() {
        let config = AppConfig::from_lookup(env(&[
            ("ECL_PORT", "9090"),
            ("ECL_METRICS_ENABLED", "false"),
            ("ECL_PROBE_TIMEOUT_MS", "250"),
            ("ECL_RFQ_SYSTEM_HEALTH_URL", "http://rfq.internal/health"),
            ("ECL_LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert!(!config.metrics_enabled);
        assert_eq!(config.probe_timeout, Duration::from_millis(250));
        assert_eq!(
            config.health_urls.get(&IntegrationDomain::RfqSystem).map(String::as_str),
            Some("http://rfq.internal/health")
        );
        assert_eq!(config.health_urls.len(), 1);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn config_rejects_bad_numbers() {
        let err = AppConfig::from_lookup(env(&[("ECL_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "ECL_PORT"));
        assert!(AppConfig::from_lookup(env(&[("ECL_PROBE_INTERVAL_SECS", "0")])).is_err());
        assert!(AppConfig::from_lookup(env(&[("ECL_LOG_FORMAT", "xml")])).is_err());
    }

    #[test]
    fn config_debug_hides_urls() {
        let config = AppConfig::from_lookup(env(&[(
            "ECL_MEDIA_MANAGEMENT_HEALTH_URL",
            "http://media/health?token=s3cret",
        )]))
        .unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("media_management"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn store_rejects_duplicates() {
        let store = ComponentStore::new();
        let id = ComponentId::new("PV-001").unwrap();
        assert!(store.insert_new(ComponentRecord::new(id.clone())));
        assert!(!store.insert_new(ComponentRecord::new(id.clone())));
        assert_eq!(store.len(), 1);
        assert!(store.get(&id).is_some());
    }

    #[test]
    fn concurrent_updates_commit_once_per_version() {
        use ecl_core::Stage;
        use ecl_lifecycle::FactSheet;

        let state = AppState::new();
        let id = ComponentId::new("PV-003").unwrap();
        state.components.insert_new(ComponentRecord::new(id.clone()));

        let wins = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        state
                            .components
                            .try_update(&id, |record| {
                                record
                                    .try_transition(
                                        Stage::Cancelled,
                                        0,
                                        &state.workflow,
                                        &FactSheet::new(),
                                        None,
                                    )
                                    .map(|_| ())
                            })
                            .unwrap()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(Result::is_ok)
                .count()
        });

        assert_eq!(wins, 1);
        let record = state.components.get(&id).unwrap();
        assert_eq!(record.version, 1);
        assert_eq!(record.history().len(), 1);
    }

    #[test]
    fn metrics_source_reads_store() {
        let state = AppState::new();
        let id = ComponentId::new("PV-002").unwrap();
        assert!(state.component_metrics(&id).is_none());
        state.components.insert_new(ComponentRecord::new(id.clone()));
        let metrics = state.component_metrics(&id).unwrap();
        assert_eq!(metrics["current_stage"], "draft");
        assert_eq!(metrics["transition_count"], 0);
    }
}
