//! Status determination thresholds.
//!
//! Reachability is a percentage (0-100), higher is better. Latency is in
//! milliseconds, lower is better. A global `ThresholdSet` applies to every
//! endpoint unless the endpoint carries `ThresholdOverrides`, which are
//! overlaid field-by-field — overriding one field of a scale leaves the
//! other field inheriting from the global set.

use serde::{Deserialize, Serialize};

/// Reachability thresholds, percent of successful probes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReachabilityThresholds {
    /// At or above this the component is operational.
    #[serde(rename = "operational")]
    pub operational_min: f64,
    /// At or above this (but below operational) the component is degraded.
    #[serde(rename = "degraded")]
    pub degraded_min: f64,
}

/// Latency thresholds in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyThresholds {
    /// At or below this the component is operational.
    #[serde(rename = "operational")]
    pub operational_max: f64,
    /// At or below this (but above operational) the component is degraded.
    #[serde(rename = "degraded")]
    pub degraded_max: f64,
}

/// Fully-populated threshold set. Every field always has a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    pub reachability: ReachabilityThresholds,
    pub latency_ms: LatencyThresholds,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            reachability: ReachabilityThresholds {
                operational_min: 95.0,
                degraded_min: 75.0,
            },
            latency_ms: LatencyThresholds {
                operational_max: 200.0,
                degraded_max: 1000.0,
            },
        }
    }
}

/// Per-endpoint partial overrides. Absent fields inherit from the global set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOverrides {
    #[serde(default)]
    pub reachability: PartialScale,
    #[serde(default)]
    pub latency_ms: PartialScale,
}

/// One scale of a partial override: either bound may be set independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialScale {
    #[serde(default)]
    pub operational: Option<f64>,
    #[serde(default)]
    pub degraded: Option<f64>,
}

/// Overlay per-endpoint overrides onto the global threshold set.
///
/// Field-wise: each of the four scalar fields takes the override value when
/// present, the global value otherwise. Overrides that invert a scale
/// (operational looser than degraded) are accepted as configured; rejecting
/// them is a config-loading concern.
pub fn resolve(global: &ThresholdSet, overrides: Option<&ThresholdOverrides>) -> ThresholdSet {
    let Some(ov) = overrides else {
        return *global;
    };

    ThresholdSet {
        reachability: ReachabilityThresholds {
            operational_min: ov
                .reachability
                .operational
                .unwrap_or(global.reachability.operational_min),
            degraded_min: ov
                .reachability
                .degraded
                .unwrap_or(global.reachability.degraded_min),
        },
        latency_ms: LatencyThresholds {
            operational_max: ov
                .latency_ms
                .operational
                .unwrap_or(global.latency_ms.operational_max),
            degraded_max: ov
                .latency_ms
                .degraded
                .unwrap_or(global.latency_ms.degraded_max),
        },
    }
}
