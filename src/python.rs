//! PyO3 boundary for the Python orchestration layer.
//!
//! All entry points take and return JSON strings; the serde models in the
//! core modules are the wire contract. Keeping the boundary this thin means
//! the orchestration scripts marshal data once and the core stays free of
//! Python types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{Endpoint, IncidentConfig, ThresholdSet};
use crate::incident::{reconcile_incidents, ComponentState, Incident};
use crate::logging::RunContext;
use crate::reconcile::{plan, InfrastructureState};
use crate::status::{build_snapshot, Sample};

fn parse<T: DeserializeOwned>(what: &str, json: &str) -> PyResult<T> {
    serde_json::from_str(json)
        .map_err(|e| PyValueError::new_err(format!("invalid {what}: {e}")))
}

fn dump<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| PyValueError::new_err(e.to_string()))
}

fn parse_timestamp(value: &str) -> PyResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PyValueError::new_err(format!("invalid timestamp '{value}': {e}")))
}

/// Build a status snapshot from endpoints and their samples.
///
/// # Arguments
/// * `endpoints_json` - array of endpoint records
/// * `samples_json` - object mapping job_label to sample
/// * `thresholds_json` - optional global threshold set (defaults apply)
#[pyfunction]
#[pyo3(signature = (endpoints_json, samples_json, thresholds_json=None))]
fn build_status_snapshot(
    endpoints_json: String,
    samples_json: String,
    thresholds_json: Option<String>,
) -> PyResult<String> {
    crate::init_logger();

    let endpoints: Vec<Endpoint> = parse("endpoints", &endpoints_json)?;
    let samples: HashMap<String, Sample> = parse("samples", &samples_json)?;
    let global: ThresholdSet = match thresholds_json {
        Some(json) => parse("thresholds", &json)?,
        None => ThresholdSet::default(),
    };

    let ctx = RunContext::new();
    let snapshot = build_snapshot(&endpoints, &samples, &global, Utc::now(), &ctx);
    dump(&snapshot)
}

/// Compute the reconciliation plan for desired endpoints against live state.
///
/// Deletion operations appear in the plan regardless; `allow_deletions`
/// controls whether they are marked applicable.
#[pyfunction]
fn plan_reconciliation(
    desired_json: String,
    live_json: String,
    allow_deletions: bool,
) -> PyResult<String> {
    crate::init_logger();

    let desired: Vec<Endpoint> = parse("desired endpoints", &desired_json)?;
    let live: InfrastructureState = parse("live state", &live_json)?;

    let ctx = RunContext::new();
    let plan = plan(&desired, &live, allow_deletions, &ctx);
    dump(&plan)
}

/// Compute incident operations from component states and unresolved
/// incidents.
///
/// # Arguments
/// * `components_json` - array of {component_id, name, status}
/// * `incidents_json` - array of unresolved incidents from the status page
/// * `now_iso` - RFC 3339 evaluation timestamp
/// * `config_json` - optional incident settings (defaults apply)
#[pyfunction]
#[pyo3(signature = (components_json, incidents_json, now_iso, config_json=None))]
fn plan_incident_operations(
    components_json: String,
    incidents_json: String,
    now_iso: String,
    config_json: Option<String>,
) -> PyResult<String> {
    crate::init_logger();

    let components: Vec<ComponentState> = parse("components", &components_json)?;
    let incidents: Vec<Incident> = parse("incidents", &incidents_json)?;
    let now = parse_timestamp(&now_iso)?;
    let config: IncidentConfig = match config_json {
        Some(json) => parse("incident config", &json)?,
        None => IncidentConfig::default(),
    };

    let ctx = RunContext::new();
    let ops = reconcile_incidents(&components, &incidents, now, &config, &ctx);
    dump(&ops)
}

/// Python module definition
#[pymodule]
fn statuspilot_core(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(build_status_snapshot, m)?)?;
    m.add_function(wrap_pyfunction!(plan_reconciliation, m)?)?;
    m.add_function(wrap_pyfunction!(plan_incident_operations, m)?)?;
    Ok(())
}
