//! # Workflow Overview
//!
//! Whole-catalog summary for dashboards: the canonical stages, how
//! automated they are, and which stakeholders appear where. Per-component
//! history comes from an external [`ComponentMetricsSource`] and is passed
//! through opaquely.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use ecl_core::{ComponentId, IntegrationDomain, Stage};

use crate::catalog::{AutomationLevel, StageDefinition};
use crate::validation::WorkflowValidationService;

/// Optional parameters of an overview request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewRequest {
    #[serde(default)]
    pub component_id: Option<ComponentId>,
    #[serde(default)]
    pub include_metrics: bool,
}

/// Display subset of a [`StageDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSummary {
    pub stage: Stage,
    pub name: &'static str,
    pub description: &'static str,
    pub estimated_duration: &'static str,
    pub automation_level: AutomationLevel,
    pub key_stakeholders: &'static [&'static str],
    pub integrations: &'static [IntegrationDomain],
}

impl From<&StageDefinition> for StageSummary {
    fn from(def: &StageDefinition) -> Self {
        Self {
            stage: def.stage,
            name: def.name,
            description: def.description,
            estimated_duration: def.estimated_duration,
            automation_level: def.automation_level,
            key_stakeholders: def.key_stakeholders,
            integrations: def.integrations,
        }
    }
}

/// Number of canonical stages at each automation level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationSummary {
    pub manual: usize,
    pub semi_automated: usize,
    pub automated: usize,
}

impl AutomationSummary {
    fn record(&mut self, level: AutomationLevel) {
        match level {
            AutomationLevel::Manual => self.manual += 1,
            AutomationLevel::SemiAutomated => self.semi_automated += 1,
            AutomationLevel::Automated => self.automated += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.manual + self.semi_automated + self.automated
    }
}

/// Historical metrics for one component, owned by an analytics collaborator.
pub trait ComponentMetricsSource {
    /// `None` when the collaborator knows nothing about the component.
    fn component_metrics(&self, component_id: &ComponentId) -> Option<serde_json::Value>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowOverview {
    pub total_stages: usize,
    pub workflow_stages: Vec<StageSummary>,
    pub automation_summary: AutomationSummary,
    /// Stakeholder name → number of canonical stages naming them.
    pub stakeholder_involvement: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_metrics: Option<serde_json::Value>,
}

impl WorkflowValidationService<'_> {
    /// Summarise the canonical workflow. Metrics are attached only when the
    /// request names a component, asks for metrics, and a source is given.
    pub fn overview(
        &self,
        request: &OverviewRequest,
        metrics: Option<&dyn ComponentMetricsSource>,
    ) -> WorkflowOverview {
        let stages = self.catalog().all();
        let mut automation_summary = AutomationSummary::default();
        let mut stakeholder_involvement = BTreeMap::new();
        for def in stages {
            automation_summary.record(def.automation_level);
            for stakeholder in def.key_stakeholders {
                *stakeholder_involvement
                    .entry(stakeholder.to_string())
                    .or_insert(0) += 1;
            }
        }

        let component_metrics = match (&request.component_id, request.include_metrics, metrics) {
            (Some(id), true, Some(source)) => source.component_metrics(id),
            _ => None,
        };

        WorkflowOverview {
            total_stages: stages.len(),
            workflow_stages: stages.iter().map(StageSummary::from).collect(),
            automation_summary,
            stakeholder_involvement,
            component_metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::IntegrationStatusReporter;

    struct FixedMetrics;

    impl ComponentMetricsSource for FixedMetrics {
        fn component_metrics(&self, component_id: &ComponentId) -> Option<serde_json::Value> {
            (component_id.as_str() == "INV-1").then(|| serde_json::json!({"transition_count": 4}))
        }
    }

    fn service() -> WorkflowValidationService<'static> {
        WorkflowValidationService::standard(IntegrationStatusReporter::default())
    }

    #[test]
    fn test_overview_counts() {
        let overview = service().overview(&OverviewRequest::default(), None);
        assert_eq!(overview.total_stages, 19);
        assert_eq!(overview.workflow_stages.len(), 19);
        assert_eq!(overview.automation_summary.total(), 19);
        assert_eq!(overview.workflow_stages[0].stage, Stage::Draft);
        assert_eq!(overview.workflow_stages[18].stage, Stage::Archived);
        assert!(overview.component_metrics.is_none());
    }

    #[test]
    fn test_stakeholder_involvement_matches_catalog() {
        let svc = service();
        let overview = svc.overview(&OverviewRequest::default(), None);
        for (name, count) in &overview.stakeholder_involvement {
            let expected = svc
                .catalog()
                .all()
                .iter()
                .filter(|d| d.key_stakeholders.contains(&name.as_str()))
                .count();
            assert_eq!(*count, expected, "{name}");
        }
        assert_eq!(overview.stakeholder_involvement["Procurement"], 6);
    }

    #[test]
    fn test_metrics_attached_only_when_requested() {
        let svc = service();
        let id = ComponentId::new("INV-1").unwrap();
        let with = OverviewRequest {
            component_id: Some(id.clone()),
            include_metrics: true,
        };
        let without = OverviewRequest {
            component_id: Some(id),
            include_metrics: false,
        };
        assert_eq!(
            svc.overview(&with, Some(&FixedMetrics)).component_metrics,
            Some(serde_json::json!({"transition_count": 4}))
        );
        assert!(svc.overview(&without, Some(&FixedMetrics)).component_metrics.is_none());
        assert!(svc.overview(&with, None).component_metrics.is_none());
    }

    #[test]
    fn test_unknown_component_has_no_metrics() {
        let req = OverviewRequest {
            component_id: Some(ComponentId::new("INV-2").unwrap()),
            include_metrics: true,
        };
        assert!(service()
            .overview(&req, Some(&FixedMetrics))
            .component_metrics
            .is_none());
    }
}
