//! Monitored endpoint definitions.
//!
//! An endpoint is the unit of desired state: one synthetic check, optionally
//! one status-page component and one latency metric. The `job_label` is the
//! stable key linking the endpoint across the metrics backend, the check
//! provider and this configuration.

use serde::{Deserialize, Serialize};

use super::thresholds::ThresholdOverrides;

/// A monitored endpoint as declared in configuration.
///
/// Immutable for the duration of a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Stable key across metrics backend and check provider.
    pub job_label: String,
    /// Display name, also the status-page component name.
    pub name: String,
    /// Probe target.
    pub url: String,
    #[serde(default)]
    pub description: String,
    /// Probe frequency in milliseconds.
    #[serde(default = "default_frequency_ms")]
    pub frequency_ms: u64,
    /// Probe locations to run the check from.
    #[serde(default)]
    pub probes: Vec<String>,
    /// Whether this endpoint gets a status-page component.
    #[serde(default = "default_true")]
    pub component: bool,
    /// Whether this endpoint gets a latency metric (requires a component).
    #[serde(default = "default_true")]
    pub metric: bool,
    /// Per-endpoint threshold overrides, overlaid onto the global set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<ThresholdOverrides>,
}

impl Endpoint {
    /// Display name of this endpoint's latency metric.
    pub fn metric_name(&self) -> String {
        format!("{} Latency", self.name)
    }

    /// An endpoint without a probe target cannot be reconciled.
    pub fn has_target(&self) -> bool {
        !self.url.is_empty()
    }
}

fn default_frequency_ms() -> u64 {
    60_000
}

fn default_true() -> bool {
    true
}
