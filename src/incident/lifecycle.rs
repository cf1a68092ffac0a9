//! Incident lifecycle state machine.
//!
//! Evaluated once per run against the current status snapshot and the
//! unresolved incidents queried from the status page. No local state: the
//! quiet-period decision is derived entirely from the incident's own last
//! update timestamp, so a re-run after a crash reaches the same decisions.
//!
//! An incident may cover several components (created by hand on the status
//! page); such incidents are evaluated as a group against the worst status
//! among their affected components. Components not covered by any
//! unresolved incident are evaluated individually.

use std::collections::BTreeMap;
use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::incidents::IncidentConfig;
use crate::logging::RunContext;
use crate::status::ComponentStatus;

use super::messages;
use super::model::{impact_for, Impact, Incident};
use super::postmortem;

/// Current status of one status-page component, joined from the snapshot
/// and the component mapping by the orchestration layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentState {
    /// Status-page component id, the key incidents reference.
    pub component_id: String,
    pub name: String,
    pub status: ComponentStatus,
}

/// An operation for the apply step to perform against the status page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum IncidentOperation {
    CreateIncident {
        component_id: String,
        name: String,
        body: String,
        impact: Impact,
        component_status: ComponentStatus,
        deliver_notifications: bool,
    },
    UpdateIncident {
        incident_id: String,
        name: String,
        body: String,
        impact: Impact,
        escalated: bool,
        component_statuses: BTreeMap<String, ComponentStatus>,
        deliver_notifications: bool,
    },
    ResolveIncident {
        incident_id: String,
        body: String,
        component_ids: Vec<String>,
        deliver_notifications: bool,
    },
    PublishPostmortem {
        incident_id: String,
        body: String,
        notify_subscribers: bool,
    },
}

/// Decide incident operations for one run.
///
/// Transition rules per component (or per multi-component incident,
/// evaluated against its worst affected status):
/// - healthy, no incident: nothing.
/// - unhealthy, no incident: create (minor for degraded, critical for outage).
/// - unhealthy, incident open: escalate immediately when impact worsens,
///   otherwise heartbeat when the quiet period has elapsed, otherwise
///   nothing.
/// - healthy, incident open: resolve, then postmortem when enabled.
pub fn reconcile_incidents(
    components: &[ComponentState],
    unresolved: &[Incident],
    now: DateTime<Utc>,
    config: &IncidentConfig,
    ctx: &RunContext,
) -> Vec<IncidentOperation> {
    if !config.auto_create {
        log::info!("{} INCIDENTS_DISABLED", ctx);
        return Vec::new();
    }

    let mut ops = Vec::new();
    let mut covered: HashSet<&str> = HashSet::new();

    for incident in unresolved {
        let affected: Vec<&ComponentState> = components
            .iter()
            .filter(|c| incident.affects(&c.component_id))
            .collect();

        if affected.is_empty() {
            log::debug!(
                "{} INCIDENT_NO_STATUS_DATA incident_id={}",
                ctx,
                incident.id
            );
            continue;
        }

        for c in &affected {
            covered.insert(c.component_id.as_str());
        }

        // Worst status among the incident's components drives the decision.
        let worst = affected
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(ComponentStatus::Operational);

        if worst.is_operational() {
            resolve_incident(&mut ops, incident, &affected, now, config, ctx);
        } else {
            update_incident(&mut ops, incident, &affected, worst, now, config, ctx);
        }
    }

    // Components not covered by any unresolved incident.
    for component in components {
        if covered.contains(component.component_id.as_str()) {
            continue;
        }
        if component.status.is_operational() {
            continue;
        }

        let impact = impact_for(component.status);
        log::info!(
            "{} INCIDENT_CREATE impact={} status={}",
            ctx.for_component(&component.component_id),
            impact.as_str(),
            component.status.as_str()
        );
        ops.push(IncidentOperation::CreateIncident {
            component_id: component.component_id.clone(),
            name: messages::incident_name(&component.name, component.status),
            body: messages::opening_body(&component.name, component.status),
            impact,
            component_status: component.status,
            deliver_notifications: config.notify_subscribers,
        });
    }

    log::info!("{} INCIDENT_SWEEP_COMPLETE ops={}", ctx, ops.len());
    ops
}

fn display_label(affected: &[&ComponentState]) -> String {
    affected
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn update_incident(
    ops: &mut Vec<IncidentOperation>,
    incident: &Incident,
    affected: &[&ComponentState],
    worst: ComponentStatus,
    now: DateTime<Utc>,
    config: &IncidentConfig,
    ctx: &RunContext,
) {
    let new_impact = impact_for(worst);
    let escalated = new_impact > incident.impact;

    // Escalations go out immediately; heartbeats respect the quiet period.
    if !escalated && config.quiet_period_minutes > 0 {
        if let Some(last_update) = incident.last_update_at() {
            let elapsed = now - last_update;
            if elapsed < Duration::minutes(config.quiet_period_minutes) {
                log::info!(
                    "{} INCIDENT_SUPPRESSED incident_id={} elapsed_min={} quiet_min={}",
                    ctx,
                    incident.id,
                    elapsed.num_minutes(),
                    config.quiet_period_minutes
                );
                return;
            }
        }
    }

    let label = display_label(affected);
    let body = if escalated {
        messages::escalation_body(&label)
    } else {
        messages::heartbeat_body(&label, worst)
    };

    if escalated {
        log::info!(
            "{} INCIDENT_ESCALATED incident_id={} from={} to={}",
            ctx,
            incident.id,
            incident.impact.as_str(),
            new_impact.as_str()
        );
    } else {
        log::info!("{} INCIDENT_HEARTBEAT incident_id={}", ctx, incident.id);
    }

    ops.push(IncidentOperation::UpdateIncident {
        incident_id: incident.id.clone(),
        name: messages::incident_name(&label, worst),
        body,
        impact: new_impact,
        escalated,
        component_statuses: affected
            .iter()
            .map(|c| (c.component_id.clone(), c.status))
            .collect(),
        deliver_notifications: escalated && config.notify_subscribers,
    });
}

fn resolve_incident(
    ops: &mut Vec<IncidentOperation>,
    incident: &Incident,
    affected: &[&ComponentState],
    now: DateTime<Utc>,
    config: &IncidentConfig,
    ctx: &RunContext,
) {
    let label = display_label(affected);
    log::info!("{} INCIDENT_RESOLVE incident_id={}", ctx, incident.id);
    ops.push(IncidentOperation::ResolveIncident {
        incident_id: incident.id.clone(),
        body: messages::resolve_body(&label),
        component_ids: affected.iter().map(|c| c.component_id.clone()).collect(),
        deliver_notifications: config.notify_subscribers,
    });

    // Follow-on, not a precondition: a postmortem failure downstream never
    // rolls back the resolution.
    if config.auto_postmortem && !incident.postmortem_published {
        log::info!("{} INCIDENT_POSTMORTEM incident_id={}", ctx, incident.id);
        ops.push(IncidentOperation::PublishPostmortem {
            incident_id: incident.id.clone(),
            body: postmortem::generate(incident, &label, now),
            notify_subscribers: config.notify_subscribers,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::model::{IncidentStatus, IncidentUpdate};
    use chrono::TimeZone;

    fn ctx() -> RunContext {
        RunContext::with_id("run-test")
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn component(id: &str, name: &str, status: ComponentStatus) -> ComponentState {
        ComponentState {
            component_id: id.to_string(),
            name: name.to_string(),
            status,
        }
    }

    fn incident(id: &str, component_ids: &[&str], impact: Impact) -> Incident {
        Incident {
            id: id.to_string(),
            name: "API experiencing issues".to_string(),
            affected_component_ids: component_ids.iter().map(|s| s.to_string()).collect(),
            impact,
            status: IncidentStatus::Investigating,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
            incident_updates: vec![],
            postmortem_published: false,
        }
    }

    fn with_last_update(mut incident: Incident, minutes_ago: i64) -> Incident {
        incident.incident_updates.insert(
            0,
            IncidentUpdate {
                status: IncidentStatus::Investigating,
                body: "update".to_string(),
                created_at: now() - Duration::minutes(minutes_ago),
            },
        );
        incident
    }

    #[test]
    fn test_all_operational_no_ops() {
        let components = vec![component("comp-1", "API", ComponentStatus::Operational)];
        let ops = reconcile_incidents(&components, &[], now(), &IncidentConfig::default(), &ctx());
        assert!(ops.is_empty());
    }

    #[test]
    fn test_degraded_creates_minor_incident() {
        let components = vec![component(
            "comp-1",
            "API",
            ComponentStatus::DegradedPerformance,
        )];
        let ops = reconcile_incidents(&components, &[], now(), &IncidentConfig::default(), &ctx());

        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            IncidentOperation::CreateIncident {
                component_id,
                impact: Impact::Minor,
                deliver_notifications: true,
                ..
            } if component_id == "comp-1"
        ));
    }

    #[test]
    fn test_outage_creates_critical_incident() {
        let components = vec![component("comp-1", "API", ComponentStatus::MajorOutage)];
        let ops = reconcile_incidents(&components, &[], now(), &IncidentConfig::default(), &ctx());

        match &ops[0] {
            IncidentOperation::CreateIncident { impact, name, .. } => {
                assert_eq!(*impact, Impact::Critical);
                assert_eq!(name, "API experiencing a major outage");
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn test_notify_subscribers_disabled() {
        let components = vec![component("comp-1", "API", ComponentStatus::MajorOutage)];
        let config = IncidentConfig {
            notify_subscribers: false,
            ..Default::default()
        };
        let ops = reconcile_incidents(&components, &[], now(), &config, &ctx());
        assert!(matches!(
            &ops[0],
            IncidentOperation::CreateIncident {
                deliver_notifications: false,
                ..
            }
        ));
    }

    #[test]
    fn test_auto_create_disabled_emits_nothing() {
        let components = vec![component("comp-1", "API", ComponentStatus::MajorOutage)];
        let config = IncidentConfig {
            auto_create: false,
            ..Default::default()
        };
        let ops = reconcile_incidents(&components, &[], now(), &config, &ctx());
        assert!(ops.is_empty());
    }

    #[test]
    fn test_quiet_period_suppresses_heartbeat() {
        let components = vec![component(
            "comp-1",
            "API",
            ComponentStatus::DegradedPerformance,
        )];
        let open = with_last_update(incident("inc-1", &["comp-1"], Impact::Minor), 45);

        let ops = reconcile_incidents(
            &components,
            &[open],
            now(),
            &IncidentConfig::default(),
            &ctx(),
        );
        assert!(ops.is_empty());
    }

    #[test]
    fn test_elapsed_quiet_period_posts_heartbeat() {
        let components = vec![component(
            "comp-1",
            "API",
            ComponentStatus::DegradedPerformance,
        )];
        let open = with_last_update(incident("inc-1", &["comp-1"], Impact::Minor), 61);

        let ops = reconcile_incidents(
            &components,
            &[open],
            now(),
            &IncidentConfig::default(),
            &ctx(),
        );
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            IncidentOperation::UpdateIncident {
                incident_id,
                escalated: false,
                deliver_notifications: false,
                ..
            } if incident_id == "inc-1"
        ));
    }

    #[test]
    fn test_zero_quiet_period_always_posts() {
        let components = vec![component(
            "comp-1",
            "API",
            ComponentStatus::DegradedPerformance,
        )];
        let open = with_last_update(incident("inc-1", &["comp-1"], Impact::Minor), 1);
        let config = IncidentConfig {
            quiet_period_minutes: 0,
            ..Default::default()
        };

        let ops = reconcile_incidents(&components, &[open], now(), &config, &ctx());
        assert_eq!(ops.len(), 1);
    }

    #[test]
    fn test_no_prior_update_posts_heartbeat() {
        let components = vec![component(
            "comp-1",
            "API",
            ComponentStatus::DegradedPerformance,
        )];
        let open = incident("inc-1", &["comp-1"], Impact::Minor);

        let ops = reconcile_incidents(
            &components,
            &[open],
            now(),
            &IncidentConfig::default(),
            &ctx(),
        );
        assert_eq!(ops.len(), 1);
    }

    #[test]
    fn test_escalation_bypasses_quiet_period() {
        let components = vec![component("comp-1", "API", ComponentStatus::MajorOutage)];
        // Updated one minute ago: a heartbeat would be suppressed.
        let open = with_last_update(incident("inc-1", &["comp-1"], Impact::Minor), 1);

        let ops = reconcile_incidents(
            &components,
            &[open],
            now(),
            &IncidentConfig::default(),
            &ctx(),
        );
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            IncidentOperation::UpdateIncident {
                escalated: true,
                impact: Impact::Critical,
                deliver_notifications: true,
                ..
            }
        ));
    }

    #[test]
    fn test_impact_improvement_is_not_escalation() {
        // Outage incident, component now merely degraded: heartbeat path,
        // impact stays as computed from current status.
        let components = vec![component(
            "comp-1",
            "API",
            ComponentStatus::DegradedPerformance,
        )];
        let open = with_last_update(incident("inc-1", &["comp-1"], Impact::Critical), 1);

        let ops = reconcile_incidents(
            &components,
            &[open],
            now(),
            &IncidentConfig::default(),
            &ctx(),
        );
        assert!(ops.is_empty(), "suppressed by quiet period, not escalated");
    }

    #[test]
    fn test_recovery_resolves_then_postmortems() {
        let components = vec![component("comp-1", "API", ComponentStatus::Operational)];
        let open = incident("inc-1", &["comp-1"], Impact::Minor);

        let ops = reconcile_incidents(
            &components,
            &[open],
            now(),
            &IncidentConfig::default(),
            &ctx(),
        );
        assert_eq!(ops.len(), 2);
        assert!(matches!(
            &ops[0],
            IncidentOperation::ResolveIncident { incident_id, .. } if incident_id == "inc-1"
        ));
        assert!(matches!(
            &ops[1],
            IncidentOperation::PublishPostmortem { incident_id, body, .. }
                if incident_id == "inc-1" && body.contains("### Timeline")
        ));
    }

    #[test]
    fn test_postmortem_disabled() {
        let components = vec![component("comp-1", "API", ComponentStatus::Operational)];
        let open = incident("inc-1", &["comp-1"], Impact::Minor);
        let config = IncidentConfig {
            auto_postmortem: false,
            ..Default::default()
        };

        let ops = reconcile_incidents(&components, &[open], now(), &config, &ctx());
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], IncidentOperation::ResolveIncident { .. }));
    }

    #[test]
    fn test_postmortem_published_once() {
        let components = vec![component("comp-1", "API", ComponentStatus::Operational)];
        let mut open = incident("inc-1", &["comp-1"], Impact::Minor);
        open.postmortem_published = true;

        let ops = reconcile_incidents(
            &components,
            &[open],
            now(),
            &IncidentConfig::default(),
            &ctx(),
        );
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], IncidentOperation::ResolveIncident { .. }));
    }

    #[test]
    fn test_multi_component_incident_uses_worst_status() {
        let components = vec![
            component("comp-1", "API", ComponentStatus::Operational),
            component("comp-2", "Web", ComponentStatus::MajorOutage),
        ];
        let open = with_last_update(
            incident("inc-1", &["comp-1", "comp-2"], Impact::Minor),
            120,
        );

        let ops = reconcile_incidents(
            &components,
            &[open],
            now(),
            &IncidentConfig::default(),
            &ctx(),
        );
        // Escalated to critical (worst affected is an outage); no separate
        // create for comp-1 even though it is healthy.
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            IncidentOperation::UpdateIncident {
                escalated,
                impact,
                component_statuses,
                ..
            } => {
                assert!(*escalated);
                assert_eq!(*impact, Impact::Critical);
                assert_eq!(component_statuses.len(), 2);
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_multi_component_incident_resolves_when_all_recover() {
        let components = vec![
            component("comp-1", "API", ComponentStatus::Operational),
            component("comp-2", "Web", ComponentStatus::Operational),
        ];
        let open = incident("inc-1", &["comp-1", "comp-2"], Impact::Critical);

        let ops = reconcile_incidents(
            &components,
            &[open],
            now(),
            &IncidentConfig::default(),
            &ctx(),
        );
        assert!(matches!(
            &ops[0],
            IncidentOperation::ResolveIncident { component_ids, body, .. }
                if component_ids.len() == 2 && body.contains("API, Web")
        ));
    }

    #[test]
    fn test_independent_components_independent_incidents() {
        let components = vec![
            component("comp-1", "API", ComponentStatus::MajorOutage),
            component("comp-2", "Web", ComponentStatus::Operational),
            component("comp-3", "Docs", ComponentStatus::DegradedPerformance),
        ];
        let ops = reconcile_incidents(&components, &[], now(), &IncidentConfig::default(), &ctx());

        assert_eq!(ops.len(), 2);
        let keys: Vec<&str> = ops
            .iter()
            .filter_map(|op| match op {
                IncidentOperation::CreateIncident { component_id, .. } => {
                    Some(component_id.as_str())
                }
                _ => None,
            })
            .collect();
        assert_eq!(keys, vec!["comp-1", "comp-3"]);
    }

    #[test]
    fn test_incident_without_status_data_untouched() {
        // The incident references a component we have no data for this run;
        // leave it alone rather than resolving on absence of evidence.
        let components = vec![component("comp-1", "API", ComponentStatus::Operational)];
        let open = incident("inc-9", &["comp-other"], Impact::Minor);

        let ops = reconcile_incidents(
            &components,
            &[open],
            now(),
            &IncidentConfig::default(),
            &ctx(),
        );
        assert!(ops.is_empty());
    }
}
