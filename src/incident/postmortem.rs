//! Templated postmortem generation.
//!
//! Produces a structured markdown retrospective from the incident's own
//! timeline. Published once, after resolution; a publish failure never rolls
//! back the resolve.

use chrono::{DateTime, Utc};

use super::model::Incident;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Generate the postmortem body for a resolved incident.
pub fn generate(incident: &Incident, component_label: &str, resolved_at: DateTime<Utc>) -> String {
    let started = incident.created_at.format(TIME_FORMAT);
    let resolved = resolved_at.format(TIME_FORMAT);

    // Provider ordering is newest-first; the timeline reads oldest-first.
    let timeline = if incident.incident_updates.is_empty() {
        "- No detailed updates were recorded.".to_string()
    } else {
        incident
            .incident_updates
            .iter()
            .rev()
            .map(|update| {
                format!(
                    "- **{}** [{}]: {}",
                    update.created_at.format(TIME_FORMAT),
                    update.status.as_str(),
                    update.body
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "## Postmortem: {name}\n\
         \n\
         ### Summary\n\
         \n\
         **Component:** {component_label}\n\
         **Impact:** {impact}\n\
         **Started:** {started}\n\
         **Resolved:** {resolved}\n\
         \n\
         This incident was detected automatically by synthetic monitoring and \
         closed when the service returned to normal operation.\n\
         \n\
         ### Timeline\n\
         \n\
         {timeline}\n\
         \n\
         ### Root Cause\n\
         \n\
         Automated monitoring observed a service degradation that recovered \
         without manual intervention. If further investigation is needed, a \
         manual follow-up will be added here.\n\
         \n\
         ### Resolution\n\
         \n\
         The service returned to normal operation and the incident was marked \
         resolved automatically.\n\
         \n\
         ### Preventive Measures\n\
         \n\
         - Continuous automated monitoring remains active\n\
         - Alerting thresholds are reviewed periodically\n\
         - This postmortem was generated automatically and may be amended\n",
        name = incident.name,
        impact = incident.impact.as_str(),
    )
}
