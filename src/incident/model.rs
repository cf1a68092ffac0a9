//! Incident data model, mirroring what the status-page provider returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::ComponentStatus;

/// Incident impact, ordered so escalation is a simple comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Minor,
    Critical,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Minor => "minor",
            Impact::Critical => "critical",
        }
    }
}

/// Lifecycle state of an incident on the status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Investigating,
    Monitoring,
    Resolved,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Investigating => "investigating",
            IncidentStatus::Monitoring => "monitoring",
            IncidentStatus::Resolved => "resolved",
        }
    }
}

/// One posted update on an incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentUpdate {
    pub status: IncidentStatus,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// An incident as queried from the status page.
///
/// `incident_updates` is newest-first, matching the provider's ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub name: String,
    /// Component keys this incident covers. Several components may share
    /// one incident.
    #[serde(default)]
    pub affected_component_ids: Vec<String>,
    pub impact: Impact,
    pub status: IncidentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub incident_updates: Vec<IncidentUpdate>,
    #[serde(default)]
    pub postmortem_published: bool,
}

impl Incident {
    /// Timestamp of the most recent update, the sole input to the
    /// quiet-period decision. Absent when no update was ever posted.
    pub fn last_update_at(&self) -> Option<DateTime<Utc>> {
        self.incident_updates.first().map(|u| u.created_at)
    }

    pub fn affects(&self, component_id: &str) -> bool {
        self.affected_component_ids
            .iter()
            .any(|id| id == component_id)
    }
}

/// Impact for a non-operational status. Degraded performance maps to a
/// minor incident, an outage to a critical one.
pub fn impact_for(status: ComponentStatus) -> Impact {
    match status {
        ComponentStatus::MajorOutage => Impact::Critical,
        _ => Impact::Minor,
    }
}
