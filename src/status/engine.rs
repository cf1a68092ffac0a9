//! Sample classification and status aggregation.

use serde::{Deserialize, Serialize};

use crate::config::thresholds::ThresholdSet;

/// Health of one component, ordered best-to-worst so the worst status in a
/// set is simply the maximum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Operational,
    DegradedPerformance,
    MajorOutage,
}

impl ComponentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentStatus::Operational => "operational",
            ComponentStatus::DegradedPerformance => "degraded_performance",
            ComponentStatus::MajorOutage => "major_outage",
        }
    }

    pub fn is_operational(&self) -> bool {
        matches!(self, ComponentStatus::Operational)
    }
}

/// One endpoint's metrics over the query window.
///
/// `latency_ms` is `None` when the window returned no data; that is a
/// distinct condition, never treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub reachability_pct: f64,
    pub latency_ms: Option<f64>,
}

/// Classify a single sample against a resolved threshold set.
///
/// Absent latency data means the service could not be confirmed healthy, so
/// the result is `MajorOutage` regardless of reachability. Otherwise each
/// metric is rated independently and the worse of the two wins.
pub fn classify(sample: &Sample, thresholds: &ThresholdSet) -> ComponentStatus {
    let Some(latency) = sample.latency_ms else {
        log::warn!("STATUS_MISSING_DATA fail_safe=major_outage");
        return ComponentStatus::MajorOutage;
    };

    let reach_status = if sample.reachability_pct >= thresholds.reachability.operational_min {
        ComponentStatus::Operational
    } else if sample.reachability_pct >= thresholds.reachability.degraded_min {
        ComponentStatus::DegradedPerformance
    } else {
        ComponentStatus::MajorOutage
    };

    let latency_status = if latency <= thresholds.latency_ms.operational_max {
        ComponentStatus::Operational
    } else if latency <= thresholds.latency_ms.degraded_max {
        ComponentStatus::DegradedPerformance
    } else {
        ComponentStatus::MajorOutage
    };

    reach_status.max(latency_status)
}

/// The worst status across all components, or `None` when there are none.
pub fn aggregate<I>(statuses: I) -> Option<ComponentStatus>
where
    I: IntoIterator<Item = ComponentStatus>,
{
    statuses.into_iter().max()
}
