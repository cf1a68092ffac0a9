//! Reconciliation plan computation.
//!
//! Pure diff of desired endpoints against live state. The plan is ordered:
//! check operations first, then components, then metrics (a metric may
//! reference a component planned earlier in the same pass), then deletions.
//! Replanning against the post-application state yields no actionable
//! operations.

use serde::{Deserialize, Serialize};

use crate::config::endpoints::Endpoint;
use crate::logging::RunContext;

use super::live::InfrastructureState;

/// Status-page metric cap imposed by the external provider.
pub const MAX_PAGE_METRICS: usize = 2;

/// Desired shape of a synthetic check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSpec {
    pub job: String,
    pub name: String,
    pub target: String,
    pub frequency_ms: u64,
    pub probes: Vec<String>,
}

impl CheckSpec {
    fn for_endpoint(endpoint: &Endpoint) -> Self {
        Self {
            job: endpoint.job_label.clone(),
            name: endpoint.name.clone(),
            target: endpoint.url.clone(),
            frequency_ms: endpoint.frequency_ms,
            probes: endpoint.probes.clone(),
        }
    }
}

/// A single create/update/delete operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ReconcileAction {
    CreateCheck {
        spec: CheckSpec,
    },
    UpdateCheck {
        check_id: String,
        spec: CheckSpec,
    },
    DeleteCheck {
        check_id: String,
        job: String,
    },
    CreateComponent {
        job: String,
        name: String,
        description: String,
    },
    DeleteComponent {
        component_id: String,
        name: String,
    },
    CreateMetric {
        job: String,
        name: String,
        suffix: String,
        tooltip: String,
        /// Present when the component already exists live; absent when the
        /// component is being created in the same pass.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        component_id: Option<String>,
    },
    DeleteMetric {
        metric_id: String,
        name: String,
    },
}

impl ReconcileAction {
    /// Short human-readable key, used for apply bookkeeping and logs.
    pub fn describe(&self) -> String {
        match self {
            ReconcileAction::CreateCheck { spec } => format!("create_check {}", spec.job),
            ReconcileAction::UpdateCheck { spec, .. } => format!("update_check {}", spec.job),
            ReconcileAction::DeleteCheck { job, .. } => format!("delete_check {}", job),
            ReconcileAction::CreateComponent { name, .. } => {
                format!("create_component {}", name)
            }
            ReconcileAction::DeleteComponent { name, .. } => {
                format!("delete_component {}", name)
            }
            ReconcileAction::CreateMetric { name, .. } => format!("create_metric {}", name),
            ReconcileAction::DeleteMetric { name, .. } => format!("delete_metric {}", name),
        }
    }

    pub fn is_deletion(&self) -> bool {
        matches!(
            self,
            ReconcileAction::DeleteCheck { .. }
                | ReconcileAction::DeleteComponent { .. }
                | ReconcileAction::DeleteMetric { .. }
        )
    }
}

/// An operation plus whether the apply step may execute it. Deletions are
/// always planned for visibility but applicable only when deletions are
/// enabled for the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedOp {
    #[serde(flatten)]
    pub action: ReconcileAction,
    pub applicable: bool,
}

/// Non-fatal findings surfaced alongside the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanDiagnostic {
    /// Creating this metric would exceed the provider's page cap.
    MetricCapReached { job: String, metric_name: String },
    /// Adopt-by-name found more than one live component with this name;
    /// the first match was used.
    DuplicateComponentName { name: String, count: usize },
    /// Endpoint has no probe target and was skipped entirely.
    MissingTarget { job: String },
}

/// Ordered operations plus diagnostics for one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationPlan {
    pub ops: Vec<PlannedOp>,
    #[serde(default)]
    pub diagnostics: Vec<PlanDiagnostic>,
}

impl ReconciliationPlan {
    /// Operations the apply step may execute this run.
    pub fn actionable(&self) -> impl Iterator<Item = &PlannedOp> {
        self.ops.iter().filter(|op| op.applicable)
    }

    /// Deletions held back because deletions are disabled.
    pub fn held_deletions(&self) -> impl Iterator<Item = &PlannedOp> {
        self.ops.iter().filter(|op| !op.applicable)
    }

    /// True when the live state already matches desired state, apart from
    /// deletions held back by the safety flag.
    pub fn is_converged(&self) -> bool {
        self.actionable().next().is_none()
    }

    fn push(&mut self, action: ReconcileAction, applicable: bool) {
        self.ops.push(PlannedOp { action, applicable });
    }
}

/// Compute the reconciliation plan for one run.
///
/// Per endpoint: ensure the check exists and matches, ensure the component
/// exists (adopt-by-name), ensure the metric exists when wanted and under
/// the page cap. Then plan deletion of every orphaned live resource, tagged
/// applicable only when `allow_deletions` is set.
pub fn plan(
    desired: &[Endpoint],
    live: &InfrastructureState,
    allow_deletions: bool,
    ctx: &RunContext,
) -> ReconciliationPlan {
    let mut out = ReconciliationPlan::default();

    let reconcilable: Vec<&Endpoint> = desired
        .iter()
        .filter(|e| {
            if e.has_target() {
                true
            } else {
                log::warn!(
                    "{} PLAN_SKIP_ENDPOINT reason=missing_target",
                    ctx.for_component(&e.job_label)
                );
                out.diagnostics.push(PlanDiagnostic::MissingTarget {
                    job: e.job_label.clone(),
                });
                false
            }
        })
        .collect();

    // [1] Checks.
    for &endpoint in &reconcilable {
        let spec = CheckSpec::for_endpoint(endpoint);
        match live.check_by_job(&endpoint.job_label) {
            None => {
                log::info!(
                    "{} PLAN_CREATE_CHECK target={}",
                    ctx.for_component(&endpoint.job_label),
                    spec.target
                );
                out.push(ReconcileAction::CreateCheck { spec }, true);
            }
            Some(existing) => {
                if check_differs(existing, &spec) {
                    log::info!(
                        "{} PLAN_UPDATE_CHECK check_id={}",
                        ctx.for_component(&endpoint.job_label),
                        existing.id
                    );
                    out.push(
                        ReconcileAction::UpdateCheck {
                            check_id: existing.id.clone(),
                            spec,
                        },
                        true,
                    );
                } else {
                    log::debug!(
                        "{} PLAN_CHECK_CURRENT check_id={}",
                        ctx.for_component(&endpoint.job_label),
                        existing.id
                    );
                }
            }
        }
    }

    // [2] Components (adopt-by-name; first match wins).
    // Tracks the component each endpoint maps to after this pass: Some(id)
    // when adopted from live state, None when creation is planned.
    let mut component_of: Vec<(&Endpoint, Option<String>)> = Vec::new();

    for &endpoint in &reconcilable {
        if !endpoint.component {
            continue;
        }

        let duplicates = live.component_name_count(&endpoint.name);
        if duplicates > 1 {
            log::warn!(
                "{} PLAN_DUPLICATE_COMPONENT name={} count={}",
                ctx.for_component(&endpoint.job_label),
                endpoint.name,
                duplicates
            );
            out.diagnostics.push(PlanDiagnostic::DuplicateComponentName {
                name: endpoint.name.clone(),
                count: duplicates,
            });
        }

        match live.component_by_name(&endpoint.name) {
            Some(existing) => {
                log::debug!(
                    "{} PLAN_ADOPT_COMPONENT component_id={}",
                    ctx.for_component(&endpoint.job_label),
                    existing.id
                );
                component_of.push((endpoint, Some(existing.id.clone())));
            }
            None => {
                log::info!(
                    "{} PLAN_CREATE_COMPONENT name={}",
                    ctx.for_component(&endpoint.job_label),
                    endpoint.name
                );
                out.push(
                    ReconcileAction::CreateComponent {
                        job: endpoint.job_label.clone(),
                        name: endpoint.name.clone(),
                        description: endpoint.description.clone(),
                    },
                    true,
                );
                component_of.push((endpoint, None));
            }
        }
    }

    // [3] Metrics, capped by the provider limit.
    let mut metric_count = live.metrics.len();

    for (endpoint, component_id) in &component_of {
        if !endpoint.metric {
            continue;
        }

        let metric_name = endpoint.metric_name();
        let existing = live.metric_for_component(component_id.as_deref(), &metric_name);
        if existing.is_some() {
            continue;
        }

        if metric_count >= MAX_PAGE_METRICS {
            log::warn!(
                "{} PLAN_METRIC_CAPPED name={} cap={}",
                ctx.for_component(&endpoint.job_label),
                metric_name,
                MAX_PAGE_METRICS
            );
            out.diagnostics.push(PlanDiagnostic::MetricCapReached {
                job: endpoint.job_label.clone(),
                metric_name,
            });
            continue;
        }

        log::info!(
            "{} PLAN_CREATE_METRIC name={}",
            ctx.for_component(&endpoint.job_label),
            metric_name
        );
        out.push(
            ReconcileAction::CreateMetric {
                job: endpoint.job_label.clone(),
                name: metric_name,
                suffix: "ms".to_string(),
                tooltip: format!("Average response time for {}", endpoint.name),
                component_id: component_id.clone(),
            },
            true,
        );
        metric_count += 1;
    }

    // [4] Orphan deletions: anything live with no desired counterpart.
    // Metrics go before their components so children are removed first.
    let desired_jobs: Vec<&str> = desired.iter().map(|e| e.job_label.as_str()).collect();
    for check in &live.checks {
        if !desired_jobs.contains(&check.job.as_str()) {
            log_deletion(ctx, allow_deletions, "check", &check.job);
            out.push(
                ReconcileAction::DeleteCheck {
                    check_id: check.id.clone(),
                    job: check.job.clone(),
                },
                allow_deletions,
            );
        }
    }

    let desired_component_names: Vec<&str> = desired
        .iter()
        .filter(|e| e.component)
        .map(|e| e.name.as_str())
        .collect();
    let desired_metric_names: Vec<String> = desired
        .iter()
        .filter(|e| e.component && e.metric)
        .map(|e| e.metric_name())
        .collect();

    for metric in &live.metrics {
        let owner_name = metric
            .component_id
            .as_deref()
            .and_then(|cid| live.components.iter().find(|c| c.id == cid))
            .map(|c| format!("{} Latency", c.name));
        let wanted = desired_metric_names.contains(&metric.name)
            || owner_name
                .as_deref()
                .map(|n| desired_metric_names.iter().any(|d| d == n))
                .unwrap_or(false);
        if !wanted {
            log_deletion(ctx, allow_deletions, "metric", &metric.name);
            out.push(
                ReconcileAction::DeleteMetric {
                    metric_id: metric.id.clone(),
                    name: metric.name.clone(),
                },
                allow_deletions,
            );
        }
    }

    for component in &live.components {
        if !desired_component_names.contains(&component.name.as_str()) {
            log_deletion(ctx, allow_deletions, "component", &component.name);
            out.push(
                ReconcileAction::DeleteComponent {
                    component_id: component.id.clone(),
                    name: component.name.clone(),
                },
                allow_deletions,
            );
        }
    }

    log::info!(
        "{} PLAN_COMPLETE ops={} actionable={} diagnostics={}",
        ctx,
        out.ops.len(),
        out.actionable().count(),
        out.diagnostics.len()
    );

    out
}

fn check_differs(existing: &super::live::LiveCheck, spec: &CheckSpec) -> bool {
    if existing.name != spec.name
        || existing.target != spec.target
        || existing.frequency_ms != spec.frequency_ms
    {
        return true;
    }
    // Probe sets are order-insensitive.
    let mut a = existing.probes.clone();
    let mut b = spec.probes.clone();
    a.sort();
    b.sort();
    a != b
}

fn log_deletion(ctx: &RunContext, allowed: bool, kind: &str, key: &str) {
    if allowed {
        log::info!("{} PLAN_DELETE_{} key={}", ctx, kind.to_uppercase(), key);
    } else {
        log::warn!(
            "{} PLAN_DELETE_HELD kind={} key={} reason=deletions_disabled",
            ctx,
            kind,
            key
        );
    }
}
