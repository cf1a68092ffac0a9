//! Live infrastructure state.
//!
//! A point-in-time view of what exists on the external providers, queried
//! fresh at the start of every reconciliation run. Checks are keyed by job
//! label, components by display name, metrics by their owning component.

use serde::{Deserialize, Serialize};

/// An existing synthetic check on the probing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveCheck {
    pub id: String,
    /// Job label, the stable key linking the check to config and metrics.
    pub job: String,
    /// Display name on the probing provider.
    #[serde(default)]
    pub name: String,
    /// Probe target URL.
    pub target: String,
    pub frequency_ms: u64,
    #[serde(default)]
    pub probes: Vec<String>,
}

/// An existing status-page component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveComponent {
    pub id: String,
    pub name: String,
}

/// An existing status-page metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveMetric {
    pub id: String,
    pub name: String,
    /// Owning component, when the provider reports the linkage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
}

/// Everything that currently exists, across both providers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureState {
    #[serde(default)]
    pub checks: Vec<LiveCheck>,
    #[serde(default)]
    pub components: Vec<LiveComponent>,
    #[serde(default)]
    pub metrics: Vec<LiveMetric>,
}

impl InfrastructureState {
    pub fn check_by_job(&self, job: &str) -> Option<&LiveCheck> {
        self.checks.iter().find(|c| c.job == job)
    }

    /// Adopt-by-name lookup. First match wins; duplicate names are the
    /// caller's concern to diagnose.
    pub fn component_by_name(&self, name: &str) -> Option<&LiveComponent> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn component_name_count(&self, name: &str) -> usize {
        self.components.iter().filter(|c| c.name == name).count()
    }

    /// Find the metric recorded for a component, preferring the provider's
    /// own linkage and falling back to the metric name convention.
    pub fn metric_for_component(
        &self,
        component_id: Option<&str>,
        metric_name: &str,
    ) -> Option<&LiveMetric> {
        if let Some(cid) = component_id {
            if let Some(metric) = self
                .metrics
                .iter()
                .find(|m| m.component_id.as_deref() == Some(cid))
            {
                return Some(metric);
            }
        }
        self.metrics.iter().find(|m| m.name == metric_name)
    }
}
