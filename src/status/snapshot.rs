//! Status snapshot assembly and change detection.
//!
//! A snapshot is the per-run picture of every monitored endpoint: classified
//! status plus the raw readings for display. Snapshots are ephemeral and
//! recomputed on every run; change detection compares two snapshots on
//! status transitions only.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::endpoints::Endpoint;
use crate::config::thresholds::{resolve, ThresholdSet};
use crate::logging::RunContext;

use super::engine::{aggregate, classify, ComponentStatus, Sample};

/// Health of one endpoint at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub job_label: String,
    pub name: String,
    pub description: String,
    pub status: ComponentStatus,
    /// Rounded to two decimals for display; absent when the fetch failed.
    pub reachability_pct: Option<f64>,
    pub latency_ms: Option<f64>,
    pub checked_at: DateTime<Utc>,
}

/// Full status picture for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub generated_at: DateTime<Utc>,
    /// Worst component status, absent when no endpoint has a component.
    pub overall: Option<ComponentStatus>,
    pub components: Vec<ComponentHealth>,
}

/// Build a snapshot from endpoints and their samples.
///
/// Thresholds are resolved per endpoint (global set overlaid with the
/// endpoint's overrides). An endpoint with no sample at all gets the same
/// fail-safe treatment as a sample with no latency data: `MajorOutage`.
pub fn build_snapshot(
    endpoints: &[Endpoint],
    samples: &HashMap<String, Sample>,
    global: &ThresholdSet,
    now: DateTime<Utc>,
    ctx: &RunContext,
) -> StatusSnapshot {
    let mut components = Vec::with_capacity(endpoints.len());

    for endpoint in endpoints {
        let thresholds = resolve(global, endpoint.thresholds.as_ref());
        let sample = samples.get(&endpoint.job_label);

        let status = match sample {
            Some(s) => classify(s, &thresholds),
            None => {
                log::warn!(
                    "{} SNAPSHOT_NO_SAMPLE fail_safe=major_outage",
                    ctx.for_component(&endpoint.job_label)
                );
                ComponentStatus::MajorOutage
            }
        };

        log::debug!(
            "{} SNAPSHOT_COMPONENT status={}",
            ctx.for_component(&endpoint.job_label),
            status.as_str()
        );

        components.push(ComponentHealth {
            job_label: endpoint.job_label.clone(),
            name: endpoint.name.clone(),
            description: endpoint.description.clone(),
            status,
            reachability_pct: sample.map(|s| round2(s.reachability_pct)),
            latency_ms: sample.and_then(|s| s.latency_ms).map(round2),
            checked_at: now,
        });
    }

    let overall = aggregate(
        components
            .iter()
            .zip(endpoints)
            .filter(|(_, e)| e.component)
            .map(|(c, _)| c.status),
    );

    log::info!(
        "{} SNAPSHOT_BUILT components={} overall={}",
        ctx,
        components.len(),
        overall.map(|s| s.as_str()).unwrap_or("none")
    );

    StatusSnapshot {
        generated_at: now,
        overall,
        components,
    }
}

/// Whether any component's status (not just its readings) changed.
///
/// A missing previous snapshot always counts as changed.
pub fn has_status_changed(old: Option<&StatusSnapshot>, new: &StatusSnapshot) -> bool {
    let Some(old) = old else {
        return true;
    };

    if old.overall != new.overall {
        return true;
    }

    let old_statuses: HashMap<&str, ComponentStatus> = old
        .components
        .iter()
        .map(|c| (c.job_label.as_str(), c.status))
        .collect();
    let new_statuses: HashMap<&str, ComponentStatus> = new
        .components
        .iter()
        .map(|c| (c.job_label.as_str(), c.status))
        .collect();

    old_statuses != new_statuses
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
